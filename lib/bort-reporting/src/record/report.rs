/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use anyhow::anyhow;
use serde::Serialize;
use serde_json::{Map, Value};

use super::decode::read_envelope;
use super::{EncodeError, REPORTING_CLIENT_VERSION, SchemaComplianceError, field};

/// Marks the beginning of a report period.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StartReport {
    pub timestamp_ms: i64,
    pub version: u32,
    pub report_type: String,
    pub report_name: Option<String>,
}

/// Marks the end of a report period.
///
/// With `start_next_report` set, the aggregating side opens a new period of
/// the same type right away.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FinishReport {
    pub timestamp_ms: i64,
    pub version: u32,
    pub report_type: String,
    pub start_next_report: bool,
    pub report_name: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireStart<'a> {
    report_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    report_name: Option<&'a str>,
    version: u32,
    timestamp_ms: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireFinish<'a> {
    report_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    report_name: Option<&'a str>,
    #[serde(skip_serializing_if = "is_false")]
    start_next_report: bool,
    version: u32,
    timestamp_ms: i64,
}

fn is_false(b: &bool) -> bool {
    !*b
}

// Report lifecycle records are only checked against the v1 shape, whatever
// version they claim.
fn decode_common(map: &Map<String, Value>) -> anyhow::Result<(i64, String, Option<String>)> {
    let timestamp_ms = bort_json::get_required_i64(map, field::TIMESTAMP_MS)?;
    if timestamp_ms < 0 {
        return Err(anyhow!(
            "negative value {timestamp_ms} for key {}",
            field::TIMESTAMP_MS
        ));
    }
    let report_type = bort_json::get_required_str(map, field::REPORT_TYPE)?;
    let report_name = bort_json::get_optional_str(map, field::REPORT_NAME)?;
    Ok((
        timestamp_ms,
        report_type.to_string(),
        report_name.map(str::to_string),
    ))
}

impl StartReport {
    pub fn new(report_type: &str, report_name: Option<&str>, timestamp_ms: i64) -> Self {
        StartReport {
            timestamp_ms,
            version: REPORTING_CLIENT_VERSION,
            report_type: report_type.to_string(),
            report_name: report_name.map(str::to_string),
        }
    }

    pub fn encode(&self) -> Result<String, EncodeError> {
        let wire = WireStart {
            report_type: &self.report_type,
            report_name: self.report_name.as_deref(),
            version: self.version,
            timestamp_ms: self.timestamp_ms,
        };
        Ok(serde_json::to_string(&wire)?)
    }

    pub fn decode(json: &str) -> Result<Self, SchemaComplianceError> {
        let (map, version) = read_envelope(json)?;
        let (timestamp_ms, report_type, report_name) = decode_common(&map)
            .map_err(|reason| SchemaComplianceError::NotCompliant { version, reason })?;
        Ok(StartReport {
            timestamp_ms,
            version,
            report_type,
            report_name,
        })
    }
}

impl FinishReport {
    pub fn new(
        report_type: &str,
        report_name: Option<&str>,
        start_next_report: bool,
        timestamp_ms: i64,
    ) -> Self {
        FinishReport {
            timestamp_ms,
            version: REPORTING_CLIENT_VERSION,
            report_type: report_type.to_string(),
            start_next_report,
            report_name: report_name.map(str::to_string),
        }
    }

    pub fn encode(&self) -> Result<String, EncodeError> {
        let wire = WireFinish {
            report_type: &self.report_type,
            report_name: self.report_name.as_deref(),
            start_next_report: self.start_next_report,
            version: self.version,
            timestamp_ms: self.timestamp_ms,
        };
        Ok(serde_json::to_string(&wire)?)
    }

    pub fn decode(json: &str) -> Result<Self, SchemaComplianceError> {
        let (map, version) = read_envelope(json)?;
        let (timestamp_ms, report_type, report_name, start_next_report) = decode_common(&map)
            .and_then(|(ts, report_type, report_name)| {
                let next = bort_json::get_optional_bool(&map, field::START_NEXT_REPORT)?;
                Ok((ts, report_type, report_name, next.unwrap_or(false)))
            })
            .map_err(|reason| SchemaComplianceError::NotCompliant { version, reason })?;
        Ok(FinishReport {
            timestamp_ms,
            version,
            report_type,
            start_next_report,
            report_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bort_types::metrics::SESSION_REPORT;

    #[test]
    fn finish() {
        let report = FinishReport {
            timestamp_ms: 123456,
            version: 3,
            report_type: "heartbeat".to_string(),
            start_next_report: false,
            report_name: None,
        };
        assert_eq!(
            report.encode().unwrap(),
            r#"{"reportType":"heartbeat","version":3,"timestampMs":123456}"#
        );
    }

    #[test]
    fn rolling_finish() {
        let report = FinishReport {
            timestamp_ms: 123456,
            version: 3,
            report_type: "heartbeat".to_string(),
            start_next_report: true,
            report_name: None,
        };
        let json = report.encode().unwrap();
        assert_eq!(
            json,
            r#"{"reportType":"heartbeat","startNextReport":true,"version":3,"timestampMs":123456}"#
        );
        assert_eq!(FinishReport::decode(&json).unwrap(), report);
    }

    #[test]
    fn session_start() {
        let report = StartReport::new(SESSION_REPORT, Some("camera"), 99);
        let json = report.encode().unwrap();
        assert_eq!(
            json,
            r#"{"reportType":"Session","reportName":"camera","version":2,"timestampMs":99}"#
        );
        assert_eq!(StartReport::decode(&json).unwrap(), report);
    }

    #[test]
    fn decode_violations() {
        let e = FinishReport::decode(r#"{"version":2,"timestampMs":1,"reportType":"Heartbeat","startNextReport":"yes"}"#)
            .unwrap_err();
        assert_eq!(e.version(), Some(2));
        let e = StartReport::decode(r#"{"version":2,"timestampMs":-1,"reportType":"Heartbeat"}"#)
            .unwrap_err();
        assert_eq!(e.version(), Some(2));
        let e = StartReport::decode(r#"{"version":2,"timestampMs":1,"reportType":1}"#).unwrap_err();
        assert_eq!(e.version(), Some(2));
        assert!(StartReport::decode(r#"{"timestampMs":1,"reportType":"Heartbeat"}"#).is_err());
    }
}
