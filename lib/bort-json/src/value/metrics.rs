/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::str::FromStr;

use anyhow::anyhow;
use serde_json::Value;

use bort_types::metrics::{AggregationType, DataType, MetricType};

/// Parse the `aggregations` array.
///
/// Tokens unknown to this build are skipped, so that a record written by a
/// newer client still decodes with the aggregations we do understand.
pub fn as_aggregation_list(v: &Value) -> anyhow::Result<Vec<AggregationType>> {
    let tokens = super::as_string_list(v)?;
    Ok(tokens
        .into_iter()
        .filter_map(AggregationType::lookup)
        .collect())
}

pub fn as_data_type(v: &Value) -> anyhow::Result<DataType> {
    if let Value::String(s) = v {
        DataType::from_str(s).map_err(|e| anyhow!("invalid data type: {e}"))
    } else {
        Err(anyhow!("json value type for 'data type' should be 'string'"))
    }
}

pub fn as_metric_type(v: &Value) -> anyhow::Result<MetricType> {
    if let Value::String(s) = v {
        MetricType::from_str(s).map_err(|e| anyhow!("invalid metric type: {e}"))
    } else {
        Err(anyhow!(
            "json value type for 'metric type' should be 'string'"
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bort_types::metrics::{NumericAgg, StateAgg};
    use serde_json::json;

    #[test]
    fn aggregation_list() {
        let v = json!(["TIME_TOTALS", "MEAN", "LATEST_VALUE"]);
        assert_eq!(
            as_aggregation_list(&v).unwrap(),
            vec![
                AggregationType::State(StateAgg::TimeTotals),
                AggregationType::Numeric(NumericAgg::Mean),
                AggregationType::State(StateAgg::LatestValue),
            ]
        );
    }

    #[test]
    fn aggregation_list_skip_unknown() {
        let v = json!(["P95", "SUM", "HISTOGRAM"]);
        assert_eq!(
            as_aggregation_list(&v).unwrap(),
            vec![AggregationType::Numeric(NumericAgg::Sum)]
        );
        assert!(as_aggregation_list(&json!([true])).is_err());
    }

    #[test]
    fn data_type() {
        assert_eq!(as_data_type(&json!("string")).unwrap(), DataType::String);
        assert!(as_data_type(&json!("int")).is_err());
        assert!(as_data_type(&json!(1)).is_err());
    }

    #[test]
    fn metric_type() {
        assert_eq!(as_metric_type(&json!("event")).unwrap(), MetricType::Event);
        assert!(as_metric_type(&json!("timer")).is_err());
        assert!(as_metric_type(&Value::Null).is_err());
    }
}
