/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::sync::Arc;

use thiserror::Error;

use bort_types::metrics::{AggregationType, DataType, DataTypeMismatch, MetricType, MetricValue};

mod decode;
pub use decode::SchemaComplianceError;

mod encode;
pub use encode::EncodeError;

mod report;
pub use report::{FinishReport, StartReport};

/// Schema version of the records built by this library.
pub const REPORTING_CLIENT_VERSION: u32 = 2;

pub(crate) mod field {
    pub(crate) const VERSION: &str = "version";
    pub(crate) const TIMESTAMP_MS: &str = "timestampMs";
    pub(crate) const REPORT_TYPE: &str = "reportType";
    pub(crate) const REPORT_NAME: &str = "reportName";
    pub(crate) const EVENT_NAME: &str = "eventName";
    pub(crate) const INTERNAL: &str = "internal";
    pub(crate) const AGGREGATIONS: &str = "aggregations";
    pub(crate) const VALUE: &str = "value";
    pub(crate) const METRIC_TYPE: &str = "metricType";
    pub(crate) const DATA_TYPE: &str = "dataType";
    pub(crate) const CARRY_OVER: &str = "carryOver";
    pub(crate) const START_NEXT_REPORT: &str = "startNextReport";
}

#[derive(Debug, Error)]
pub enum RecordError {
    #[error(transparent)]
    DataTypeMismatch(#[from] DataTypeMismatch),
    #[error("metric name must not be blank")]
    BlankEventName,
}

/// The part of a metric that stays the same for every sample.
#[derive(Clone, Debug, PartialEq)]
pub struct MetricDefinition {
    pub event_name: String,
    pub report_type: String,
    pub report_name: Option<String>,
    pub aggregations: Vec<AggregationType>,
    pub internal: bool,
    pub metric_type: MetricType,
    pub data_type: DataType,
    pub carry_over_value: bool,
}

/// One sample of a metric, as it travels on the wire.
///
/// A record is immutable once built. The value always matches the declared
/// data type, which is checked when the record is constructed.
#[derive(Clone, Debug, PartialEq)]
pub struct MetricRecord {
    definition: Arc<MetricDefinition>,
    timestamp_ms: i64,
    value: MetricValue,
    version: u32,
}

impl MetricRecord {
    pub fn new(
        definition: Arc<MetricDefinition>,
        value: MetricValue,
        timestamp_ms: i64,
    ) -> Result<Self, RecordError> {
        MetricRecord::with_version(definition, value, timestamp_ms, REPORTING_CLIENT_VERSION)
    }

    pub fn with_version(
        definition: Arc<MetricDefinition>,
        value: MetricValue,
        timestamp_ms: i64,
        version: u32,
    ) -> Result<Self, RecordError> {
        if definition.event_name.trim().is_empty() {
            return Err(RecordError::BlankEventName);
        }
        definition.data_type.verify(&value)?;
        Ok(MetricRecord {
            definition,
            timestamp_ms,
            value,
            version,
        })
    }

    #[inline]
    pub fn definition(&self) -> &MetricDefinition {
        &self.definition
    }

    #[inline]
    pub fn event_name(&self) -> &str {
        &self.definition.event_name
    }

    #[inline]
    pub fn report_type(&self) -> &str {
        &self.definition.report_type
    }

    #[inline]
    pub fn report_name(&self) -> Option<&str> {
        self.definition.report_name.as_deref()
    }

    #[inline]
    pub fn aggregations(&self) -> &[AggregationType] {
        &self.definition.aggregations
    }

    #[inline]
    pub fn internal(&self) -> bool {
        self.definition.internal
    }

    #[inline]
    pub fn metric_type(&self) -> MetricType {
        self.definition.metric_type
    }

    #[inline]
    pub fn data_type(&self) -> DataType {
        self.definition.data_type
    }

    #[inline]
    pub fn carry_over_value(&self) -> bool {
        self.definition.carry_over_value
    }

    #[inline]
    pub fn timestamp_ms(&self) -> i64 {
        self.timestamp_ms
    }

    #[inline]
    pub fn value(&self) -> &MetricValue {
        &self.value
    }

    #[inline]
    pub fn version(&self) -> u32 {
        self.version
    }
}
