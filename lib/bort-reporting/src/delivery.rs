/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use anyhow::anyhow;
use log::{error, warn};

use bort_types::metrics::{check_session_name, is_session_report};

use crate::record::{EncodeError, FinishReport, MetricRecord, StartReport};
use crate::sink::{Endpoint, PersistentEndpoints, PersistentSink, RemoteSink, RemoteSinkCache};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// Stored by the persistent sink.
    DeliveredPrimary,
    /// Handed to the remote sink.
    DeliveredFallback,
    /// Neither sink took it.
    Dropped,
    /// Refused before any sink was tried.
    Rejected,
}

impl DeliveryOutcome {
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            DeliveryOutcome::DeliveredPrimary | DeliveryOutcome::DeliveredFallback
        )
    }
}

/// Session records need a valid session name before any sink is tried.
pub(crate) fn admit_record(record: &MetricRecord) -> bool {
    if is_session_report(record.report_type()) {
        if let Err(e) = check_session_name(record.report_name()) {
            warn!("metric {} rejected: {e}", record.event_name());
            return false;
        }
    }
    true
}

pub(crate) fn admit_report(report_type: &str, report_name: Option<&str>) -> bool {
    if is_session_report(report_type) {
        if let Err(e) = check_session_name(report_name) {
            warn!("{report_type} report rejected: {e}");
            return false;
        }
    }
    true
}

/// Delivers encoded records, trying the persistent sink before the remote one.
pub struct DeliveryRouter {
    persistent: Option<Arc<dyn PersistentSink>>,
    endpoints: PersistentEndpoints,
    remote: RemoteSinkCache,

    create_instant: Instant,
    error_report_interval: u64,
    last_error_report: AtomicU64,
}

impl DeliveryRouter {
    pub fn new(
        persistent: Option<Arc<dyn PersistentSink>>,
        endpoints: PersistentEndpoints,
        remote: RemoteSinkCache,
        error_report_interval: Duration,
    ) -> Self {
        DeliveryRouter {
            persistent,
            endpoints,
            remote,
            create_instant: Instant::now(),
            error_report_interval: error_report_interval.as_secs().max(1),
            last_error_report: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn remote(&self) -> &RemoteSinkCache {
        &self.remote
    }

    pub fn deliver(&self, record: &MetricRecord) -> DeliveryOutcome {
        if !admit_record(record) {
            return DeliveryOutcome::Rejected;
        }

        let json = match record.encode() {
            Ok(json) => json,
            Err(e) => {
                error!("failed to encode metric {}: {e}", record.event_name());
                return DeliveryOutcome::Dropped;
            }
        };

        self.route(Endpoint::AddMetric, &json, |sink, json| sink.add_value(json))
    }

    pub fn start_report(&self, report: &StartReport) -> bool {
        if !admit_report(&report.report_type, report.report_name.as_deref()) {
            return false;
        }
        self.route_report(Endpoint::StartReport, report.encode(), |sink, json| {
            sink.start_report(json)
        })
    }

    pub fn finish_report(&self, report: &FinishReport) -> bool {
        if !admit_report(&report.report_type, report.report_name.as_deref()) {
            return false;
        }
        self.route_report(Endpoint::FinishReport, report.encode(), |sink, json| {
            sink.finish_report(json)
        })
    }

    fn route_report<F>(
        &self,
        endpoint: Endpoint,
        encoded: Result<String, EncodeError>,
        remote_call: F,
    ) -> bool
    where
        F: Fn(&dyn RemoteSink, &str) -> anyhow::Result<()>,
    {
        match encoded {
            Ok(json) => self.route(endpoint, &json, remote_call).is_success(),
            Err(e) => {
                error!("failed to encode report: {e}");
                false
            }
        }
    }

    fn route<F>(&self, endpoint: Endpoint, json: &str, remote_call: F) -> DeliveryOutcome
    where
        F: Fn(&dyn RemoteSink, &str) -> anyhow::Result<()>,
    {
        match self.insert_persistent(endpoint, json) {
            Ok(()) => return DeliveryOutcome::DeliveredPrimary,
            Err(e) => self.report_unavailable(endpoint, e),
        }

        let Some(sink) = self.remote.get() else {
            warn!(
                "{endpoint:?} record dropped: remote service {} not available",
                self.remote.service_name()
            );
            return DeliveryOutcome::Dropped;
        };
        match remote_call(sink.as_ref(), json) {
            Ok(()) => DeliveryOutcome::DeliveredFallback,
            Err(e) => {
                warn!("{endpoint:?} record dropped: {e:?}");
                DeliveryOutcome::Dropped
            }
        }
    }

    fn insert_persistent(&self, endpoint: Endpoint, json: &str) -> anyhow::Result<()> {
        let Some(sink) = &self.persistent else {
            return Err(anyhow!("no persistent sink configured"));
        };
        let uri = self.endpoints.uri(endpoint);
        match sink.insert(&uri, &self.endpoints.value_key, json)? {
            Some(_) => Ok(()),
            None => Err(anyhow!("no row inserted at {uri}")),
        }
    }

    fn report_unavailable(&self, endpoint: Endpoint, e: anyhow::Error) {
        let time_slice = self.create_instant.elapsed().as_secs() / self.error_report_interval + 1;
        if self.last_error_report.swap(time_slice, Ordering::Relaxed) != time_slice {
            warn!("persistent sink unavailable for {endpoint:?}, falling back to remote: {e:?}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::MetricDefinition;
    use crate::sink::test::{SinkMode, TestPersistentSink, TestResolver};
    use bort_types::metrics::{
        AggregationType, DataType, HEARTBEAT_REPORT, MetricType, MetricValue, NumericAgg,
        SESSION_REPORT,
    };

    const ADD_URI: &str = "content://com.memfault.bort.metrics/add";

    fn build_router(persistent: SinkMode, remote: SinkMode) -> (DeliveryRouter, Rows, Rows) {
        let (persistent, persistent_rows) = TestPersistentSink::new(persistent);
        let (resolver, remote_rows) = TestResolver::new(remote);
        let router = DeliveryRouter::new(
            Some(persistent),
            PersistentEndpoints::default(),
            RemoteSinkCache::new("memfault_structured", Some(resolver)),
            Duration::from_secs(64),
        );
        (router, persistent_rows, remote_rows)
    }

    type Rows = Arc<std::sync::Mutex<Vec<(String, String)>>>;

    fn record(report_type: &str, report_name: Option<&str>) -> MetricRecord {
        let definition = MetricDefinition {
            event_name: "battery_drain".to_string(),
            report_type: report_type.to_string(),
            report_name: report_name.map(str::to_string),
            aggregations: vec![AggregationType::Numeric(NumericAgg::Sum)],
            internal: false,
            metric_type: MetricType::Counter,
            data_type: DataType::Double,
            carry_over_value: false,
        };
        MetricRecord::new(Arc::new(definition), MetricValue::Double(3.0), 1000).unwrap()
    }

    #[test]
    fn primary() {
        let (router, persistent, remote) = build_router(SinkMode::Accept, SinkMode::Accept);
        let r = record(HEARTBEAT_REPORT, None);
        assert_eq!(router.deliver(&r), DeliveryOutcome::DeliveredPrimary);

        let persistent = persistent.lock().unwrap();
        assert_eq!(persistent.len(), 1);
        assert_eq!(persistent[0].0, ADD_URI);
        assert_eq!(persistent[0].1, r.encode().unwrap());
        assert!(remote.lock().unwrap().is_empty());
        assert!(!router.remote().is_cached());
    }

    #[test]
    fn fallback() {
        for mode in [SinkMode::Ignore, SinkMode::Fail] {
            let (router, persistent, remote) = build_router(mode, SinkMode::Accept);
            let r = record(HEARTBEAT_REPORT, None);
            assert_eq!(router.deliver(&r), DeliveryOutcome::DeliveredFallback);
            assert!(persistent.lock().unwrap().is_empty());

            let remote = remote.lock().unwrap();
            assert_eq!(remote.len(), 1);
            assert_eq!(remote[0].0, "add_value");
            assert_eq!(remote[0].1, r.encode().unwrap());
        }
    }

    #[test]
    fn no_persistent_sink() {
        let (resolver, remote) = TestResolver::new(SinkMode::Accept);
        let router = DeliveryRouter::new(
            None,
            PersistentEndpoints::default(),
            RemoteSinkCache::new("memfault_structured", Some(resolver)),
            Duration::from_secs(64),
        );
        let r = record(HEARTBEAT_REPORT, None);
        assert_eq!(router.deliver(&r), DeliveryOutcome::DeliveredFallback);
        assert_eq!(router.deliver(&r), DeliveryOutcome::DeliveredFallback);
        assert_eq!(remote.lock().unwrap().len(), 2);
        assert!(router.remote().is_cached());
    }

    #[test]
    fn dropped() {
        let (router, _, _) = build_router(SinkMode::Fail, SinkMode::Fail);
        let r = record(HEARTBEAT_REPORT, None);
        assert_eq!(router.deliver(&r), DeliveryOutcome::Dropped);

        let (router, _, _) = build_router(SinkMode::Ignore, SinkMode::Ignore);
        assert_eq!(router.deliver(&r), DeliveryOutcome::Dropped);
        assert!(!router.remote().is_cached());
    }

    #[test]
    fn invalid_session() {
        let (router, persistent, remote) = build_router(SinkMode::Accept, SinkMode::Accept);
        for name in [None, Some("heartbeat"), Some("test metric")] {
            let r = record(SESSION_REPORT, name);
            assert_eq!(router.deliver(&r), DeliveryOutcome::Rejected);
        }
        assert!(persistent.lock().unwrap().is_empty());
        assert!(remote.lock().unwrap().is_empty());

        let r = record(SESSION_REPORT, Some("camera"));
        assert_eq!(router.deliver(&r), DeliveryOutcome::DeliveredPrimary);
    }

    #[test]
    fn reports() {
        let (router, persistent, remote) = build_router(SinkMode::Ignore, SinkMode::Accept);
        let start = StartReport::new(SESSION_REPORT, Some("camera"), 5);
        assert!(router.start_report(&start));
        let finish = FinishReport::new(SESSION_REPORT, Some("camera"), false, 6);
        assert!(router.finish_report(&finish));

        let start = StartReport::new(SESSION_REPORT, Some("daily-heartbeat"), 7);
        assert!(!router.start_report(&start));
        let finish = FinishReport::new(SESSION_REPORT, None, false, 8);
        assert!(!router.finish_report(&finish));
        assert!(persistent.lock().unwrap().is_empty());

        let remote = remote.lock().unwrap();
        let calls: Vec<&str> = remote.iter().map(|(call, _)| call.as_str()).collect();
        assert_eq!(calls, ["start_report", "finish_report"]);
        assert_eq!(
            remote[0].1,
            r#"{"reportType":"Session","reportName":"camera","version":2,"timestampMs":5}"#
        );

        let (router, persistent, _) = build_router(SinkMode::Accept, SinkMode::Fail);
        assert!(router.finish_report(&FinishReport::new(HEARTBEAT_REPORT, None, true, 9)));
        let persistent = persistent.lock().unwrap();
        assert_eq!(
            persistent[0].0,
            "content://com.memfault.bort.metrics/finish-report"
        );

        let (router, _, _) = build_router(SinkMode::Fail, SinkMode::Fail);
        assert!(!router.start_report(&StartReport::new(HEARTBEAT_REPORT, None, 10)));
    }

    #[test]
    fn encode_defect() {
        let (router, persistent, remote) = build_router(SinkMode::Accept, SinkMode::Accept);
        let definition = MetricDefinition {
            event_name: "ratio".to_string(),
            report_type: HEARTBEAT_REPORT.to_string(),
            report_name: None,
            aggregations: vec![],
            internal: false,
            metric_type: MetricType::Gauge,
            data_type: DataType::Double,
            carry_over_value: false,
        };
        let r = MetricRecord::new(Arc::new(definition), f64::NAN.into(), 1).unwrap();
        assert_eq!(router.deliver(&r), DeliveryOutcome::Dropped);
        assert!(persistent.lock().unwrap().is_empty());
        assert!(remote.lock().unwrap().is_empty());
    }
}
