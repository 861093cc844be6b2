/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use thiserror::Error;

mod aggregation;
pub use aggregation::{AggregationType, NumericAgg, StateAgg};

mod data_type;
pub use data_type::{DataType, DataTypeMismatch};

mod metric_type;
pub use metric_type::MetricType;

mod report;
pub use report::{
    HEARTBEAT_REPORT, RESERVED_REPORT_NAMES, SESSION_NAME_MAX_LEN, SESSION_NAME_PATTERN,
    SESSION_REPORT, SessionNameError, check_session_name, is_session_report,
    validate_session_name,
};

mod value;
pub use value::MetricValue;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown aggregation type: {0}")]
    UnknownAggregation(String),
    #[error("unknown data type: {0}")]
    UnknownDataType(String),
    #[error("unknown metric type: {0}")]
    UnknownMetricType(String),
}
