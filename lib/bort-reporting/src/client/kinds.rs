/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use bort_types::metrics::MetricValue;

use super::{MetricHandle, now_ms};
use crate::delivery::DeliveryOutcome;
use crate::dispatch::Pending;

macro_rules! impl_handle {
    ($name:ident) => {
        impl $name {
            #[inline]
            pub fn handle(&self) -> &MetricHandle {
                &self.0
            }
        }
    };
}

/// Counts occurrences, summed over the report period.
#[derive(Clone)]
pub struct Counter(pub(super) MetricHandle);
impl_handle!(Counter);

impl Counter {
    pub fn increment(&self) -> Pending<DeliveryOutcome> {
        self.increment_by_at(1.0, now_ms())
    }

    pub fn increment_at(&self, timestamp_ms: i64) -> Pending<DeliveryOutcome> {
        self.increment_by_at(1.0, timestamp_ms)
    }

    pub fn increment_by(&self, by: f64) -> Pending<DeliveryOutcome> {
        self.increment_by_at(by, now_ms())
    }

    pub fn increment_by_at(&self, by: f64, timestamp_ms: i64) -> Pending<DeliveryOutcome> {
        self.0.emit_or_drop(MetricValue::Double(by), timestamp_ms)
    }
}

/// Counts successes and failures of the same operation as two counters.
#[derive(Clone)]
pub struct SuccessOrFailure {
    pub(super) success: Counter,
    pub(super) failure: Counter,
}

impl SuccessOrFailure {
    pub fn record(&self, successful: bool) -> Pending<DeliveryOutcome> {
        self.record_at(successful, now_ms())
    }

    pub fn record_at(&self, successful: bool, timestamp_ms: i64) -> Pending<DeliveryOutcome> {
        if successful {
            self.success.increment_at(timestamp_ms)
        } else {
            self.failure.increment_at(timestamp_ms)
        }
    }

    pub fn success(&self) -> Pending<DeliveryOutcome> {
        self.success.increment()
    }

    pub fn failure(&self) -> Pending<DeliveryOutcome> {
        self.failure.increment()
    }
}

#[derive(Clone)]
pub struct Distribution(pub(super) MetricHandle);
impl_handle!(Distribution);

impl Distribution {
    pub fn record(&self, value: f64) -> Pending<DeliveryOutcome> {
        self.record_at(value, now_ms())
    }

    pub fn record_at(&self, value: f64, timestamp_ms: i64) -> Pending<DeliveryOutcome> {
        self.0.emit_or_drop(MetricValue::Double(value), timestamp_ms)
    }
}

/// Tracks time spent in each named state. `None` records an empty state.
#[derive(Clone)]
pub struct StateTracker(pub(super) MetricHandle);
impl_handle!(StateTracker);

impl StateTracker {
    pub fn state(&self, state: Option<&str>) -> Pending<DeliveryOutcome> {
        self.state_at(state, now_ms())
    }

    pub fn state_at(&self, state: Option<&str>, timestamp_ms: i64) -> Pending<DeliveryOutcome> {
        let value = MetricValue::String(state.unwrap_or_default().to_string());
        self.0.emit_or_drop(value, timestamp_ms)
    }
}

#[derive(Clone)]
pub struct BoolStateTracker(pub(super) MetricHandle);
impl_handle!(BoolStateTracker);

impl BoolStateTracker {
    pub fn state(&self, state: bool) -> Pending<DeliveryOutcome> {
        self.state_at(state, now_ms())
    }

    pub fn state_at(&self, state: bool, timestamp_ms: i64) -> Pending<DeliveryOutcome> {
        self.0.emit_or_drop(MetricValue::Boolean(state), timestamp_ms)
    }
}

#[derive(Clone)]
pub struct StringProperty(pub(super) MetricHandle);
impl_handle!(StringProperty);

impl StringProperty {
    pub fn update(&self, value: Option<&str>) -> Pending<DeliveryOutcome> {
        self.update_at(value, now_ms())
    }

    pub fn update_at(&self, value: Option<&str>, timestamp_ms: i64) -> Pending<DeliveryOutcome> {
        let value = MetricValue::String(value.unwrap_or_default().to_string());
        self.0.emit_or_drop(value, timestamp_ms)
    }
}

#[derive(Clone)]
pub struct NumberProperty(pub(super) MetricHandle);
impl_handle!(NumberProperty);

impl NumberProperty {
    pub fn update(&self, value: f64) -> Pending<DeliveryOutcome> {
        self.update_at(value, now_ms())
    }

    pub fn update_at(&self, value: f64, timestamp_ms: i64) -> Pending<DeliveryOutcome> {
        self.0.emit_or_drop(MetricValue::Double(value), timestamp_ms)
    }

    /// Booleans are stored as `1` and `0`.
    pub fn update_bool(&self, value: bool) -> Pending<DeliveryOutcome> {
        self.update_bool_at(value, now_ms())
    }

    pub fn update_bool_at(&self, value: bool, timestamp_ms: i64) -> Pending<DeliveryOutcome> {
        self.update_at(if value { 1.0 } else { 0.0 }, timestamp_ms)
    }
}

/// Individual occurrences, each with a free form description.
#[derive(Clone)]
pub struct Event(pub(super) MetricHandle);
impl_handle!(Event);

impl Event {
    pub fn add(&self, value: &str) -> Pending<DeliveryOutcome> {
        self.add_at(value, now_ms())
    }

    pub fn add_at(&self, value: &str, timestamp_ms: i64) -> Pending<DeliveryOutcome> {
        self.0
            .emit_or_drop(MetricValue::String(value.to_string()), timestamp_ms)
    }
}
