/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::fmt;

use super::DataType;

/// The single payload carried by a metric sample.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    String(String),
    Double(f64),
    Boolean(bool),
}

impl MetricValue {
    pub fn data_type(&self) -> DataType {
        match self {
            MetricValue::String(_) => DataType::String,
            MetricValue::Double(_) => DataType::Double,
            MetricValue::Boolean(_) => DataType::Boolean,
        }
    }
}

impl From<String> for MetricValue {
    fn from(s: String) -> Self {
        MetricValue::String(s)
    }
}

impl From<&str> for MetricValue {
    fn from(s: &str) -> Self {
        MetricValue::String(s.to_string())
    }
}

impl From<f64> for MetricValue {
    fn from(f: f64) -> Self {
        MetricValue::Double(f)
    }
}

impl From<bool> for MetricValue {
    fn from(b: bool) -> Self {
        MetricValue::Boolean(b)
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::String(s) => write!(f, "\"{s}\""),
            MetricValue::Double(v) => write!(f, "{v}"),
            MetricValue::Boolean(b) => write!(f, "{b}"),
        }
    }
}
