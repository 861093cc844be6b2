/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use serde::{Serialize, Serializer};
use thiserror::Error;

use bort_types::metrics::MetricValue;

use super::MetricRecord;

/// Integral doubles up to this magnitude are written without a fraction.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0; // 2^53

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("non-finite number {0} can not be encoded")]
    NonFiniteNumber(f64),
    #[error("json serialize failed: {0}")]
    Json(#[from] serde_json::Error),
}

// Key order of the wire form is fixed and consumers compare it byte by byte.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireMetric<'a> {
    report_type: &'a str,
    metric_type: &'static str,
    #[serde(skip_serializing_if = "is_false")]
    internal: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    report_name: Option<&'a str>,
    data_type: &'static str,
    event_name: &'a str,
    carry_over: bool,
    version: u32,
    aggregations: Vec<&'static str>,
    value: WireValue<'a>,
    timestamp_ms: i64,
}

fn is_false(b: &bool) -> bool {
    !*b
}

struct WireValue<'a>(&'a MetricValue);

impl Serialize for WireValue<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            MetricValue::String(s) => serializer.serialize_str(s),
            MetricValue::Boolean(b) => serializer.serialize_str(if *b { "1" } else { "0" }),
            MetricValue::Double(f) => {
                if f.fract() == 0.0 && f.abs() <= MAX_EXACT_INTEGER {
                    serializer.serialize_i64(*f as i64)
                } else {
                    serializer.serialize_f64(*f)
                }
            }
        }
    }
}

impl MetricRecord {
    /// Encode this record in the wire form of its own schema version.
    pub fn encode(&self) -> Result<String, EncodeError> {
        if let MetricValue::Double(f) = self.value() {
            if !f.is_finite() {
                return Err(EncodeError::NonFiniteNumber(*f));
            }
        }

        let wire = WireMetric {
            report_type: self.report_type(),
            metric_type: self.metric_type().as_str(),
            internal: self.internal(),
            report_name: self.report_name(),
            data_type: self.data_type().as_str(),
            event_name: self.event_name(),
            carry_over: self.carry_over_value(),
            version: self.version(),
            aggregations: self.aggregations().iter().map(|a| a.as_str()).collect(),
            value: WireValue(self.value()),
            timestamp_ms: self.timestamp_ms(),
        };
        let json = serde_json::to_string(&wire)?;
        Ok(json)
    }
}
