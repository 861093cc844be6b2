/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::num::NonZeroUsize;
use std::time::Duration;

use crate::sink::PersistentEndpoints;

#[cfg(feature = "yaml")]
mod yaml;

pub const DEFAULT_REMOTE_SERVICE: &str = "memfault_structured";

const DEFAULT_THREAD_NAME: &str = "bort-reporting";
const DEFAULT_CHANNEL_CAPACITY: NonZeroUsize = NonZeroUsize::new(1024).unwrap();
const DEFAULT_ERROR_REPORT_INTERVAL: Duration = Duration::from_secs(64);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackgroundDispatchConfig {
    pub thread_name: String,
    pub channel_capacity: NonZeroUsize,
}

impl Default for BackgroundDispatchConfig {
    fn default() -> Self {
        BackgroundDispatchConfig {
            thread_name: DEFAULT_THREAD_NAME.to_string(),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

/// Where delivery work runs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DispatchMode {
    /// On the calling thread.
    Immediate,
    /// On one dedicated thread, in submission order.
    Background(BackgroundDispatchConfig),
}

impl Default for DispatchMode {
    fn default() -> Self {
        DispatchMode::Background(BackgroundDispatchConfig::default())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportingClientConfig {
    pub dispatch: DispatchMode,
    pub persistent: PersistentEndpoints,
    pub remote_service: String,
    pub error_report_interval: Duration,
}

impl Default for ReportingClientConfig {
    fn default() -> Self {
        ReportingClientConfig {
            dispatch: DispatchMode::default(),
            persistent: PersistentEndpoints::default(),
            remote_service: DEFAULT_REMOTE_SERVICE.to_string(),
            error_report_interval: DEFAULT_ERROR_REPORT_INTERVAL,
        }
    }
}

impl ReportingClientConfig {
    /// Deliver on the calling thread, for callers that already run on a
    /// worker of their own.
    pub fn immediate() -> Self {
        ReportingClientConfig {
            dispatch: DispatchMode::Immediate,
            ..Default::default()
        }
    }

    pub fn set_thread_name(&mut self, name: String) {
        match &mut self.dispatch {
            DispatchMode::Background(config) => config.thread_name = name,
            DispatchMode::Immediate => {
                self.dispatch = DispatchMode::Background(BackgroundDispatchConfig {
                    thread_name: name,
                    ..Default::default()
                });
            }
        }
    }

    pub fn set_channel_capacity(&mut self, capacity: NonZeroUsize) {
        match &mut self.dispatch {
            DispatchMode::Background(config) => config.channel_capacity = capacity,
            DispatchMode::Immediate => {
                self.dispatch = DispatchMode::Background(BackgroundDispatchConfig {
                    channel_capacity: capacity,
                    ..Default::default()
                });
            }
        }
    }
}
