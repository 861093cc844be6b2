/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::ops::Deref;
use std::sync::Arc;

use anyhow::Context;

use bort_types::metrics::{HEARTBEAT_REPORT, NumericAgg, SESSION_REPORT, StateAgg};

use crate::config::ReportingClientConfig;
use crate::delivery::{DeliveryOutcome, DeliveryRouter, admit_record, admit_report};
use crate::dispatch::{Dispatcher, Pending};
use crate::record::{FinishReport, MetricRecord, RecordError, StartReport};
use crate::sink::{PersistentSink, RemoteSinkCache, RemoteSinkResolver};

mod kinds;
pub use kinds::{
    BoolStateTracker, Counter, Distribution, Event, NumberProperty, StateTracker, StringProperty,
    SuccessOrFailure,
};

mod metric;
pub use metric::{MetricHandle, MetricKind};

const SYNC_METRIC_NAME: &str = "sync";

pub(crate) fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// The collaborators records are delivered to. Either may be absent.
#[derive(Default)]
pub struct ReportingSinks {
    pub persistent: Option<Arc<dyn PersistentSink>>,
    pub remote_resolver: Option<Box<dyn RemoteSinkResolver>>,
}

pub(crate) struct ReportingService {
    router: DeliveryRouter,
    dispatcher: Dispatcher,
}

impl ReportingService {
    fn record(self: &Arc<Self>, record: MetricRecord) -> Pending<DeliveryOutcome> {
        if !admit_record(&record) {
            return Pending::ready(DeliveryOutcome::Rejected);
        }
        let service = Arc::clone(self);
        self.dispatcher
            .submit(DeliveryOutcome::Dropped, move || service.router.deliver(&record))
    }

    fn start_report(self: &Arc<Self>, report: StartReport) -> Pending<bool> {
        if !admit_report(&report.report_type, report.report_name.as_deref()) {
            return Pending::ready(false);
        }
        let service = Arc::clone(self);
        self.dispatcher
            .submit(false, move || service.router.start_report(&report))
    }

    fn finish_report(self: &Arc<Self>, report: FinishReport) -> Pending<bool> {
        if !admit_report(&report.report_type, report.report_name.as_deref()) {
            return Pending::ready(false);
        }
        let service = Arc::clone(self);
        self.dispatcher
            .submit(false, move || service.router.finish_report(&report))
    }
}

/// Entry point for recording metrics.
#[derive(Clone)]
pub struct ReportingClient {
    service: Arc<ReportingService>,
}

impl ReportingClient {
    pub fn new(config: &ReportingClientConfig, sinks: ReportingSinks) -> anyhow::Result<Self> {
        let remote = RemoteSinkCache::new(&config.remote_service, sinks.remote_resolver);
        let router = DeliveryRouter::new(
            sinks.persistent,
            config.persistent.clone(),
            remote,
            config.error_report_interval,
        );
        let dispatcher =
            Dispatcher::new(&config.dispatch).context("failed to create reporting dispatcher")?;
        Ok(ReportingClient {
            service: Arc::new(ReportingService { router, dispatcher }),
        })
    }

    /// Metrics aggregated into the periodic heartbeat report.
    pub fn report(&self) -> Report {
        Report::new(self.service.clone(), HEARTBEAT_REPORT, None)
    }

    /// Metrics aggregated into a named session report.
    ///
    /// The name is checked when something is recorded, not here.
    pub fn session(&self, name: &str) -> SessionReport {
        SessionReport(Report::new(self.service.clone(), SESSION_REPORT, Some(name)))
    }

    pub fn start_session(&self, name: &str, timestamp_ms: i64) -> Pending<bool> {
        self.session(name).start_at(timestamp_ms)
    }

    pub fn finish_session(&self, name: &str, timestamp_ms: i64) -> Pending<bool> {
        self.session(name).finish_at(timestamp_ms)
    }

    /// Deliver a record built elsewhere.
    pub fn record(&self, record: MetricRecord) -> Pending<DeliveryOutcome> {
        self.service.record(record)
    }

    /// Stop processing. Queued work is finished, later work is ignored.
    pub fn shutdown(&self) {
        self.service.dispatcher.shutdown();
    }
}

/// A report that metric handles are bound to.
#[derive(Clone)]
pub struct Report {
    service: Arc<ReportingService>,
    report_type: String,
    report_name: Option<String>,
    internal: bool,
}

impl Report {
    fn new(service: Arc<ReportingService>, report_type: &str, report_name: Option<&str>) -> Self {
        Report {
            service,
            report_type: report_type.to_string(),
            report_name: report_name.map(str::to_string),
            internal: false,
        }
    }

    #[inline]
    pub fn report_type(&self) -> &str {
        &self.report_type
    }

    #[inline]
    pub fn report_name(&self) -> Option<&str> {
        self.report_name.as_deref()
    }

    /// The same report, with every metric created from it marked internal.
    pub fn internal(&self) -> Report {
        Report {
            internal: true,
            ..self.clone()
        }
    }

    pub fn metric(&self, name: &str, kind: &MetricKind) -> MetricHandle {
        MetricHandle::new(
            self.service.clone(),
            &self.report_type,
            self.report_name.as_deref(),
            name,
            self.internal,
            kind,
        )
    }

    pub fn counter(&self, name: &str, sum_in_report: bool) -> Counter {
        Counter(self.metric(name, &MetricKind::Counter { sum_in_report }))
    }

    /// Two counters, `<name>_successful` and `<name>_failure`.
    pub fn success_or_failure(
        &self,
        name: &str,
        sum_in_report: bool,
    ) -> Result<SuccessOrFailure, RecordError> {
        if name.trim().is_empty() {
            return Err(RecordError::BlankEventName);
        }
        Ok(SuccessOrFailure {
            success: self.counter(&format!("{name}_successful"), sum_in_report),
            failure: self.counter(&format!("{name}_failure"), sum_in_report),
        })
    }

    /// Success and failure counters for sync-like operations.
    pub fn sync(&self, sum_in_report: bool) -> SuccessOrFailure {
        SuccessOrFailure {
            success: self.counter(&format!("{SYNC_METRIC_NAME}_successful"), sum_in_report),
            failure: self.counter(&format!("{SYNC_METRIC_NAME}_failure"), sum_in_report),
        }
    }

    pub fn distribution(&self, name: &str, aggregations: &[NumericAgg]) -> Distribution {
        let kind = MetricKind::Distribution {
            aggregations: aggregations.to_vec(),
        };
        Distribution(self.metric(name, &kind))
    }

    pub fn state_tracker(&self, name: &str, aggregations: &[StateAgg]) -> StateTracker {
        let kind = MetricKind::StateTracker {
            aggregations: aggregations.to_vec(),
        };
        StateTracker(self.metric(name, &kind))
    }

    pub fn bool_state_tracker(&self, name: &str, aggregations: &[StateAgg]) -> BoolStateTracker {
        let kind = MetricKind::BoolStateTracker {
            aggregations: aggregations.to_vec(),
        };
        BoolStateTracker(self.metric(name, &kind))
    }

    pub fn string_property(&self, name: &str, add_latest_to_report: bool) -> StringProperty {
        let kind = MetricKind::StringProperty {
            add_latest_to_report,
        };
        StringProperty(self.metric(name, &kind))
    }

    pub fn number_property(&self, name: &str, add_latest_to_report: bool) -> NumberProperty {
        let kind = MetricKind::NumberProperty {
            add_latest_to_report,
        };
        NumberProperty(self.metric(name, &kind))
    }

    pub fn event(&self, name: &str, count_in_report: bool, latest_in_report: bool) -> Event {
        let kind = MetricKind::Event {
            count_in_report,
            latest_in_report,
        };
        Event(self.metric(name, &kind))
    }
}

/// A named session, which is started and finished explicitly.
#[derive(Clone)]
pub struct SessionReport(Report);

impl SessionReport {
    fn name(&self) -> Option<&str> {
        self.0.report_name.as_deref()
    }

    pub fn start(&self) -> Pending<bool> {
        self.start_at(now_ms())
    }

    pub fn start_at(&self, timestamp_ms: i64) -> Pending<bool> {
        let report = StartReport::new(SESSION_REPORT, self.name(), timestamp_ms);
        self.0.service.start_report(report)
    }

    pub fn finish(&self) -> Pending<bool> {
        self.finish_at(now_ms())
    }

    pub fn finish_at(&self, timestamp_ms: i64) -> Pending<bool> {
        let report = FinishReport::new(SESSION_REPORT, self.name(), false, timestamp_ms);
        self.0.service.finish_report(report)
    }
}

impl Deref for SessionReport {
    type Target = Report;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
