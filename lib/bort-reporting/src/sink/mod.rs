/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

mod remote;
pub use remote::{DisconnectNotifier, RemoteSink, RemoteSinkCache, RemoteSinkResolver};

#[cfg(test)]
pub(crate) mod test;

const DEFAULT_AUTHORITY: &str = "com.memfault.bort.metrics";
const DEFAULT_ADD_PATH: &str = "add";
const DEFAULT_START_REPORT_PATH: &str = "start-report";
const DEFAULT_FINISH_REPORT_PATH: &str = "finish-report";
const DEFAULT_VALUE_KEY: &str = "custom_metric";

/// A store that persists encoded records, addressed by content uri.
///
/// `Ok(None)` means the store accepted the call but did not keep the row,
/// which the caller treats the same as an unavailable store.
pub trait PersistentSink: Send + Sync {
    fn insert(&self, uri: &str, key: &str, json: &str) -> anyhow::Result<Option<String>>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
    AddMetric,
    StartReport,
    FinishReport,
}

/// Where each kind of record lands in the persistent store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PersistentEndpoints {
    pub authority: String,
    pub add_path: String,
    pub start_report_path: String,
    pub finish_report_path: String,
    pub value_key: String,
}

impl Default for PersistentEndpoints {
    fn default() -> Self {
        PersistentEndpoints {
            authority: DEFAULT_AUTHORITY.to_string(),
            add_path: DEFAULT_ADD_PATH.to_string(),
            start_report_path: DEFAULT_START_REPORT_PATH.to_string(),
            finish_report_path: DEFAULT_FINISH_REPORT_PATH.to_string(),
            value_key: DEFAULT_VALUE_KEY.to_string(),
        }
    }
}

impl PersistentEndpoints {
    pub fn uri(&self, endpoint: Endpoint) -> String {
        let path = match endpoint {
            Endpoint::AddMetric => &self.add_path,
            Endpoint::StartReport => &self.start_report_path,
            Endpoint::FinishReport => &self.finish_report_path,
        };
        format!("content://{}/{path}", self.authority)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_uri() {
        let endpoints = PersistentEndpoints::default();
        assert_eq!(
            endpoints.uri(Endpoint::AddMetric),
            "content://com.memfault.bort.metrics/add"
        );
        assert_eq!(
            endpoints.uri(Endpoint::StartReport),
            "content://com.memfault.bort.metrics/start-report"
        );
        assert_eq!(
            endpoints.uri(Endpoint::FinishReport),
            "content://com.memfault.bort.metrics/finish-report"
        );
        assert_eq!(endpoints.value_key, "custom_metric");
    }
}
