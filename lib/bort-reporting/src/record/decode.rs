/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::sync::Arc;

use anyhow::{Context, anyhow};
use serde_json::{Map, Value};
use thiserror::Error;

use bort_types::metrics::{
    AggregationType, DataType, MetricType, MetricValue, NumericAgg, StateAgg,
};

use super::{MetricDefinition, MetricRecord, field};

#[derive(Debug, Error)]
pub enum SchemaComplianceError {
    #[error("invalid json document: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("invalid record envelope: {0:#}")]
    InvalidEnvelope(anyhow::Error),
    #[error("record is not compliant with schema v{version}: {reason:#}")]
    NotCompliant { version: u32, reason: anyhow::Error },
}

impl SchemaComplianceError {
    /// The schema version the record claimed, if it got that far.
    pub fn version(&self) -> Option<u32> {
        match self {
            SchemaComplianceError::NotCompliant { version, .. } => Some(*version),
            _ => None,
        }
    }
}

/// Parse the json object and its integer `version` field.
pub(super) fn read_envelope(
    json: &str,
) -> Result<(Map<String, Value>, u32), SchemaComplianceError> {
    let doc: Value = serde_json::from_str(json)?;
    let Value::Object(map) = doc else {
        return Err(SchemaComplianceError::InvalidEnvelope(anyhow!(
            "json document should be an object"
        )));
    };
    let version = bort_json::map_get_required(&map, field::VERSION)
        .and_then(bort_json::value::as_u32)
        .context(format!("invalid value for key {}", field::VERSION))
        .map_err(SchemaComplianceError::InvalidEnvelope)?;
    Ok((map, version))
}

impl MetricRecord {
    /// Decode a record written under any schema version this library knows.
    pub fn decode(json: &str) -> Result<Self, SchemaComplianceError> {
        let (map, version) = read_envelope(json)?;
        let r = match version {
            0 | 1 => decode_v1(&map, version),
            _ => decode_v2(&map, version),
        };
        r.map_err(|reason| SchemaComplianceError::NotCompliant { version, reason })
    }
}

fn decode_event_name(map: &Map<String, Value>) -> anyhow::Result<String> {
    let name = bort_json::get_required_str(map, field::EVENT_NAME)?;
    if name.trim().is_empty() {
        return Err(anyhow!("blank value for key {}", field::EVENT_NAME));
    }
    Ok(name.to_string())
}

fn decode_aggregations(map: &Map<String, Value>) -> anyhow::Result<Vec<AggregationType>> {
    let v = bort_json::map_get_required(map, field::AGGREGATIONS)?;
    bort_json::value::as_aggregation_list(v)
        .context(format!("invalid value for key {}", field::AGGREGATIONS))
}

// LATEST_VALUE is shared by both families. Lookup picks the state one, which
// is wrong for numeric metrics.
fn resolve_latest_value(
    mut aggregations: Vec<AggregationType>,
    data_type: DataType,
) -> Vec<AggregationType> {
    if data_type == DataType::Double {
        for agg in aggregations.iter_mut() {
            if *agg == AggregationType::State(StateAgg::LatestValue) {
                *agg = AggregationType::Numeric(NumericAgg::LatestValue);
            }
        }
    }
    aggregations
}

fn decode_v1(map: &Map<String, Value>, version: u32) -> anyhow::Result<MetricRecord> {
    let timestamp_ms = bort_json::get_required_i64(map, field::TIMESTAMP_MS)?;
    let report_type = bort_json::get_required_str(map, field::REPORT_TYPE)?;
    let event_name = decode_event_name(map)?;
    let internal = bort_json::get_optional_bool(map, field::INTERNAL)?.unwrap_or(false);
    let aggregations = decode_aggregations(map)?;

    let value = match bort_json::map_get_required(map, field::VALUE)? {
        Value::Bool(b) => MetricValue::Boolean(*b),
        Value::Number(n) => n
            .as_f64()
            .map(MetricValue::Double)
            .ok_or_else(|| anyhow!("out of range number for key {}", field::VALUE))?,
        Value::String(s) => MetricValue::String(s.to_string()),
        _ => {
            return Err(anyhow!(
                "value for key {} should be a boolean, number or string",
                field::VALUE
            ));
        }
    };
    let metric_type = MetricType::infer_from_aggregations(&aggregations);

    let definition = MetricDefinition {
        event_name,
        report_type: report_type.to_string(),
        report_name: None,
        aggregations,
        internal,
        metric_type,
        data_type: value.data_type(),
        carry_over_value: false,
    };
    let record = MetricRecord::with_version(Arc::new(definition), value, timestamp_ms, version)?;
    Ok(record)
}

fn decode_typed_value(data_type: DataType, v: &Value) -> anyhow::Result<MetricValue> {
    match (data_type, v) {
        (DataType::String, Value::String(s)) => Ok(MetricValue::String(s.to_string())),
        (DataType::Double, Value::Number(n)) => n
            .as_f64()
            .map(MetricValue::Double)
            .ok_or_else(|| anyhow!("out of range number for key {}", field::VALUE)),
        (DataType::Boolean, Value::Bool(b)) => Ok(MetricValue::Boolean(*b)),
        (DataType::Boolean, Value::String(s)) => match s.as_str() {
            "1" => Ok(MetricValue::Boolean(true)),
            "0" => Ok(MetricValue::Boolean(false)),
            _ => Err(anyhow!("invalid boolean string {s} for key {}", field::VALUE)),
        },
        _ => Err(anyhow!(
            "value {v} for key {} does not match data type {data_type}",
            field::VALUE
        )),
    }
}

fn decode_v2(map: &Map<String, Value>, version: u32) -> anyhow::Result<MetricRecord> {
    let timestamp_ms = bort_json::get_required_i64(map, field::TIMESTAMP_MS)?;
    let report_type = bort_json::get_required_str(map, field::REPORT_TYPE)?;
    let report_name = bort_json::get_optional_str(map, field::REPORT_NAME)?;
    let event_name = decode_event_name(map)?;
    let internal = bort_json::get_optional_bool(map, field::INTERNAL)?.unwrap_or(false);
    let aggregations = decode_aggregations(map)?;

    let v = bort_json::map_get_required(map, field::DATA_TYPE)?;
    let data_type = bort_json::value::as_data_type(v)?;
    let aggregations = resolve_latest_value(aggregations, data_type);
    let v = bort_json::map_get_required(map, field::METRIC_TYPE)?;
    let metric_type = bort_json::value::as_metric_type(v)?;
    let carry_over_value = bort_json::get_required_bool(map, field::CARRY_OVER)?;

    let v = bort_json::map_get_required(map, field::VALUE)?;
    let value = decode_typed_value(data_type, v)?;

    let definition = MetricDefinition {
        event_name,
        report_type: report_type.to_string(),
        report_name: report_name.map(str::to_string),
        aggregations,
        internal,
        metric_type,
        data_type,
        carry_over_value,
    };
    let record = MetricRecord::with_version(Arc::new(definition), value, timestamp_ms, version)?;
    Ok(record)
}
