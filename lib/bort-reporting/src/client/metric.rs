/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::sync::Arc;

use log::error;

use bort_types::metrics::{
    AggregationType, DataType, MetricType, MetricValue, NumericAgg, StateAgg,
};

use super::ReportingService;
use crate::delivery::DeliveryOutcome;
use crate::dispatch::Pending;
use crate::record::{MetricDefinition, MetricRecord, RecordError};

/// What a metric measures, which fixes how its samples are typed and
/// aggregated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MetricKind {
    Counter {
        sum_in_report: bool,
    },
    Distribution {
        aggregations: Vec<NumericAgg>,
    },
    StateTracker {
        aggregations: Vec<StateAgg>,
    },
    BoolStateTracker {
        aggregations: Vec<StateAgg>,
    },
    StringProperty {
        add_latest_to_report: bool,
    },
    NumberProperty {
        add_latest_to_report: bool,
    },
    Event {
        count_in_report: bool,
        latest_in_report: bool,
    },
}

impl MetricKind {
    pub fn metric_type(&self) -> MetricType {
        match self {
            MetricKind::Counter { .. } => MetricType::Counter,
            MetricKind::Distribution { .. } => MetricType::Gauge,
            MetricKind::StateTracker { .. }
            | MetricKind::BoolStateTracker { .. }
            | MetricKind::StringProperty { .. }
            | MetricKind::NumberProperty { .. } => MetricType::Property,
            MetricKind::Event { .. } => MetricType::Event,
        }
    }

    pub fn data_type(&self) -> DataType {
        match self {
            MetricKind::Counter { .. }
            | MetricKind::Distribution { .. }
            | MetricKind::NumberProperty { .. } => DataType::Double,
            MetricKind::StateTracker { .. }
            | MetricKind::StringProperty { .. }
            | MetricKind::Event { .. } => DataType::String,
            MetricKind::BoolStateTracker { .. } => DataType::Boolean,
        }
    }

    /// Whether the last value is carried into the next report period.
    pub fn carry_over_value(&self) -> bool {
        matches!(
            self,
            MetricKind::StateTracker { .. }
                | MetricKind::BoolStateTracker { .. }
                | MetricKind::StringProperty { .. }
                | MetricKind::NumberProperty { .. }
        )
    }

    pub fn aggregations(&self) -> Vec<AggregationType> {
        match self {
            MetricKind::Counter { sum_in_report } => {
                if *sum_in_report {
                    vec![NumericAgg::Sum.into()]
                } else {
                    vec![]
                }
            }
            MetricKind::Distribution { aggregations } => {
                aggregations.iter().map(|a| (*a).into()).collect()
            }
            MetricKind::StateTracker { aggregations }
            | MetricKind::BoolStateTracker { aggregations } => {
                aggregations.iter().map(|a| (*a).into()).collect()
            }
            MetricKind::StringProperty {
                add_latest_to_report,
            } => {
                if *add_latest_to_report {
                    vec![StateAgg::LatestValue.into()]
                } else {
                    vec![]
                }
            }
            MetricKind::NumberProperty {
                add_latest_to_report,
            } => {
                if *add_latest_to_report {
                    vec![NumericAgg::LatestValue.into()]
                } else {
                    vec![]
                }
            }
            MetricKind::Event {
                count_in_report,
                latest_in_report,
            } => {
                let mut aggregations: Vec<AggregationType> = Vec::with_capacity(2);
                if *count_in_report {
                    aggregations.push(NumericAgg::Count.into());
                }
                if *latest_in_report {
                    aggregations.push(StateAgg::LatestValue.into());
                }
                aggregations
            }
        }
    }
}

/// A metric bound to a report, ready to record samples.
#[derive(Clone)]
pub struct MetricHandle {
    service: Arc<ReportingService>,
    definition: Arc<MetricDefinition>,
}

impl MetricHandle {
    pub(crate) fn new(
        service: Arc<ReportingService>,
        report_type: &str,
        report_name: Option<&str>,
        name: &str,
        internal: bool,
        kind: &MetricKind,
    ) -> Self {
        let definition = MetricDefinition {
            event_name: name.to_string(),
            report_type: report_type.to_string(),
            report_name: report_name.map(str::to_string),
            aggregations: kind.aggregations(),
            internal,
            metric_type: kind.metric_type(),
            data_type: kind.data_type(),
            carry_over_value: kind.carry_over_value(),
        };
        MetricHandle {
            service,
            definition: Arc::new(definition),
        }
    }

    #[inline]
    pub fn definition(&self) -> &MetricDefinition {
        &self.definition
    }

    /// Record one sample.
    ///
    /// Fails only if the value does not fit the metric. Delivery problems are
    /// reported through the returned outcome.
    pub fn emit(
        &self,
        value: MetricValue,
        timestamp_ms: i64,
    ) -> Result<Pending<DeliveryOutcome>, RecordError> {
        let record = MetricRecord::new(self.definition.clone(), value, timestamp_ms)?;
        Ok(self.service.record(record))
    }

    pub(crate) fn emit_or_drop(
        &self,
        value: MetricValue,
        timestamp_ms: i64,
    ) -> Pending<DeliveryOutcome> {
        self.emit(value, timestamp_ms).unwrap_or_else(|e| {
            error!("metric {} not recorded: {e}", self.definition.event_name);
            Pending::ready(DeliveryOutcome::Dropped)
        })
    }
}
