/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::fmt;
use std::str::FromStr;

use super::{AggregationType, NumericAgg, ParseError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MetricType {
    Counter,
    Gauge,
    Property,
    Event,
}

impl MetricType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            MetricType::Counter => "counter",
            MetricType::Gauge => "gauge",
            MetricType::Property => "property",
            MetricType::Event => "event",
        }
    }

    pub fn lookup(token: &str) -> Option<Self> {
        match token {
            "counter" => Some(MetricType::Counter),
            "gauge" => Some(MetricType::Gauge),
            "property" => Some(MetricType::Property),
            "event" => Some(MetricType::Event),
            _ => None,
        }
    }

    /// Guess the metric type of a record that predates the `metricType` field.
    pub fn infer_from_aggregations(aggregations: &[AggregationType]) -> Self {
        let has = |agg: NumericAgg| aggregations.iter().any(|a| a.is_numeric(agg));

        if has(NumericAgg::Count) {
            MetricType::Counter
        } else if has(NumericAgg::Min)
            || has(NumericAgg::Mean)
            || has(NumericAgg::Max)
            || has(NumericAgg::Sum)
        {
            MetricType::Gauge
        } else {
            MetricType::Property
        }
    }
}

impl FromStr for MetricType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MetricType::lookup(s).ok_or_else(|| ParseError::UnknownMetricType(s.to_string()))
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
