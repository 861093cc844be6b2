/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::sync::{Arc, Mutex};

use anyhow::anyhow;

use super::{DisconnectNotifier, PersistentSink, RemoteSink, RemoteSinkResolver};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SinkMode {
    Accept,
    Ignore,
    Fail,
}

type Rows = Arc<Mutex<Vec<(String, String)>>>;

/// Keeps `(uri or call, json)` pairs in memory.
pub(crate) struct TestPersistentSink {
    mode: SinkMode,
    rows: Rows,
}

impl TestPersistentSink {
    pub(crate) fn new(mode: SinkMode) -> (Arc<Self>, Rows) {
        let rows = Rows::default();
        let sink = TestPersistentSink {
            mode,
            rows: rows.clone(),
        };
        (Arc::new(sink), rows)
    }
}

impl PersistentSink for TestPersistentSink {
    fn insert(&self, uri: &str, key: &str, json: &str) -> anyhow::Result<Option<String>> {
        assert_eq!(key, "custom_metric");
        match self.mode {
            SinkMode::Accept => {
                let mut rows = self.rows.lock().unwrap();
                rows.push((uri.to_string(), json.to_string()));
                Ok(Some(format!("{uri}/{}", rows.len())))
            }
            SinkMode::Ignore => Ok(None),
            SinkMode::Fail => Err(anyhow!("content provider not found")),
        }
    }
}

pub(crate) struct TestRemoteSink {
    mode: SinkMode,
    rows: Rows,
}

impl TestRemoteSink {
    fn push(&self, call: &str, json: &str) -> anyhow::Result<()> {
        match self.mode {
            SinkMode::Accept | SinkMode::Ignore => {
                let mut rows = self.rows.lock().unwrap();
                rows.push((call.to_string(), json.to_string()));
                Ok(())
            }
            SinkMode::Fail => Err(anyhow!("remote peer died")),
        }
    }
}

impl RemoteSink for TestRemoteSink {
    fn add_value(&self, json: &str) -> anyhow::Result<()> {
        self.push("add_value", json)
    }

    fn start_report(&self, json: &str) -> anyhow::Result<()> {
        self.push("start_report", json)
    }

    fn finish_report(&self, json: &str) -> anyhow::Result<()> {
        self.push("finish_report", json)
    }
}

/// Resolves to a [`TestRemoteSink`], or to nothing if `mode` is `Ignore`.
pub(crate) struct TestResolver {
    mode: SinkMode,
    rows: Rows,
}

impl TestResolver {
    pub(crate) fn new(mode: SinkMode) -> (Box<Self>, Rows) {
        let rows = Rows::default();
        let resolver = TestResolver {
            mode,
            rows: rows.clone(),
        };
        (Box::new(resolver), rows)
    }
}

impl RemoteSinkResolver for TestResolver {
    fn resolve(
        &self,
        _service_name: &str,
        _notifier: DisconnectNotifier,
    ) -> anyhow::Result<Option<Arc<dyn RemoteSink>>> {
        if self.mode == SinkMode::Ignore {
            return Ok(None);
        }
        Ok(Some(Arc::new(TestRemoteSink {
            mode: self.mode,
            rows: self.rows.clone(),
        })))
    }
}
