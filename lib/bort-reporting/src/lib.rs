/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

mod client;
pub use client::{
    BoolStateTracker, Counter, Distribution, Event, MetricHandle, MetricKind, NumberProperty,
    Report, ReportingClient, ReportingSinks, SessionReport, StateTracker, StringProperty,
    SuccessOrFailure,
};

mod config;
pub use config::{
    BackgroundDispatchConfig, DEFAULT_REMOTE_SERVICE, DispatchMode, ReportingClientConfig,
};

mod delivery;
pub use delivery::{DeliveryOutcome, DeliveryRouter};

mod dispatch;
pub use dispatch::Pending;

pub mod record;

pub mod sink;
