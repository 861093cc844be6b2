/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::fmt;
use std::str::FromStr;

use super::ParseError;

/// Reductions the daemon applies to numeric samples within one report period.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NumericAgg {
    /// Minimum value seen during the period.
    Min,
    /// Maximum value seen during the period.
    Max,
    /// Sum of all values seen during the period.
    Sum,
    /// Mean value seen during the period.
    Mean,
    /// Number of values seen during the period.
    Count,
    /// The latest value reported for this metric.
    LatestValue,
    /// Number of times the value dropped compared to the previous sample.
    ValueDrop,
    ExpMovingAvg,
    ExpMovingAvgRssi,
}

impl NumericAgg {
    const ALL: [NumericAgg; 9] = [
        NumericAgg::Min,
        NumericAgg::Max,
        NumericAgg::Sum,
        NumericAgg::Mean,
        NumericAgg::Count,
        NumericAgg::LatestValue,
        NumericAgg::ValueDrop,
        NumericAgg::ExpMovingAvg,
        NumericAgg::ExpMovingAvgRssi,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            NumericAgg::Min => "MIN",
            NumericAgg::Max => "MAX",
            NumericAgg::Sum => "SUM",
            NumericAgg::Mean => "MEAN",
            NumericAgg::Count => "COUNT",
            NumericAgg::LatestValue => "LATEST_VALUE",
            NumericAgg::ValueDrop => "VALUE_DROP",
            NumericAgg::ExpMovingAvg => "EXP_MOVING_AVG",
            NumericAgg::ExpMovingAvgRssi => "EXP_MOVING_AVG_RSSI",
        }
    }

    pub fn lookup(token: &str) -> Option<Self> {
        NumericAgg::ALL.into_iter().find(|agg| agg.as_str() == token)
    }
}

/// Reductions over the time spent in each state of a state tracker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StateAgg {
    /// Metric per state, reporting time spent in that state during the period.
    TimeTotals,
    /// Metric per state, reporting time spent in that state during the period (per hour).
    TimePerHour,
    /// The latest value reported for this property.
    LatestValue,
}

impl StateAgg {
    const ALL: [StateAgg; 3] = [
        StateAgg::TimeTotals,
        StateAgg::TimePerHour,
        StateAgg::LatestValue,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            StateAgg::TimeTotals => "TIME_TOTALS",
            StateAgg::TimePerHour => "TIME_PER_HOUR",
            StateAgg::LatestValue => "LATEST_VALUE",
        }
    }

    pub fn lookup(token: &str) -> Option<Self> {
        StateAgg::ALL.into_iter().find(|agg| agg.as_str() == token)
    }
}

/// Any aggregation that may travel in the `aggregations` wire array.
///
/// `LATEST_VALUE` is spelled the same in both families, so the token alone
/// can not tell them apart. [`AggregationType::lookup`] resolves the state
/// family first and only then the numeric one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AggregationType {
    Numeric(NumericAgg),
    State(StateAgg),
}

impl AggregationType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            AggregationType::Numeric(agg) => agg.as_str(),
            AggregationType::State(agg) => agg.as_str(),
        }
    }

    pub fn lookup(token: &str) -> Option<Self> {
        StateAgg::lookup(token)
            .map(AggregationType::State)
            .or_else(|| NumericAgg::lookup(token).map(AggregationType::Numeric))
    }

    pub fn is_numeric(&self, agg: NumericAgg) -> bool {
        matches!(self, AggregationType::Numeric(a) if *a == agg)
    }
}

impl From<NumericAgg> for AggregationType {
    fn from(agg: NumericAgg) -> Self {
        AggregationType::Numeric(agg)
    }
}

impl From<StateAgg> for AggregationType {
    fn from(agg: StateAgg) -> Self {
        AggregationType::State(agg)
    }
}

impl FromStr for AggregationType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AggregationType::lookup(s).ok_or_else(|| ParseError::UnknownAggregation(s.to_string()))
    }
}

impl fmt::Display for AggregationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
