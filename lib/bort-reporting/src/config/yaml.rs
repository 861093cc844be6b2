/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::path::Path;

use anyhow::{Context, anyhow};
use yaml_rust::Yaml;

use super::{DispatchMode, ReportingClientConfig};
use crate::sink::PersistentEndpoints;

impl DispatchMode {
    pub fn parse_yaml(v: &Yaml) -> anyhow::Result<Self> {
        match v {
            Yaml::String(s) => match bort_yaml::key::normalize(s).as_str() {
                "immediate" | "direct" => Ok(DispatchMode::Immediate),
                "background" | "thread" => Ok(DispatchMode::default()),
                _ => Err(anyhow!("invalid dispatch mode {s}")),
            },
            Yaml::Hash(map) => {
                let mut config = ReportingClientConfig::default();
                bort_yaml::foreach_kv(map, |k, v| match bort_yaml::key::normalize(k).as_str() {
                    "thread_name" => {
                        let name = bort_yaml::value::as_nonempty_string(v)
                            .context(format!("invalid string value for key {k}"))?;
                        config.set_thread_name(name);
                        Ok(())
                    }
                    "channel_capacity" => {
                        let capacity = bort_yaml::value::as_nonzero_usize(v)
                            .context(format!("invalid nonzero usize value for key {k}"))?;
                        config.set_channel_capacity(capacity);
                        Ok(())
                    }
                    _ => Err(anyhow!("invalid key {k}")),
                })?;
                Ok(config.dispatch)
            }
            _ => Err(anyhow!(
                "yaml value type for 'dispatch mode' should be 'string' or 'map'"
            )),
        }
    }
}

impl PersistentEndpoints {
    pub fn parse_yaml(v: &Yaml) -> anyhow::Result<Self> {
        match v {
            Yaml::Hash(map) => {
                let mut endpoints = PersistentEndpoints::default();
                bort_yaml::foreach_kv(map, |k, v| {
                    let value = bort_yaml::value::as_nonempty_string(v)
                        .context(format!("invalid string value for key {k}"))?;
                    match bort_yaml::key::normalize(k).as_str() {
                        "authority" => endpoints.authority = value,
                        "add_path" | "add" => endpoints.add_path = value,
                        "start_report_path" | "start_report" => {
                            endpoints.start_report_path = value
                        }
                        "finish_report_path" | "finish_report" => {
                            endpoints.finish_report_path = value
                        }
                        "value_key" | "key" => endpoints.value_key = value,
                        _ => return Err(anyhow!("invalid key {k}")),
                    }
                    Ok(())
                })?;
                Ok(endpoints)
            }
            Yaml::String(_) => {
                let authority = bort_yaml::value::as_nonempty_string(v)?;
                Ok(PersistentEndpoints {
                    authority,
                    ..Default::default()
                })
            }
            _ => Err(anyhow!(
                "yaml value type for 'persistent endpoints' should be 'map' or 'string'"
            )),
        }
    }
}

impl ReportingClientConfig {
    pub fn parse_yaml(v: &Yaml) -> anyhow::Result<Self> {
        if let Yaml::Hash(map) = v {
            let mut config = ReportingClientConfig::default();
            bort_yaml::foreach_kv(map, |k, v| config.set_by_yaml_kv(k, v))?;
            Ok(config)
        } else {
            Err(anyhow!(
                "yaml value type for 'reporting client config' should be 'map'"
            ))
        }
    }

    pub fn load_yaml_file(path: &Path) -> anyhow::Result<Self> {
        let doc = bort_yaml::load_doc(path)?;
        ReportingClientConfig::parse_yaml(&doc)
            .context(format!("invalid reporting client config in {}", path.display()))
    }

    fn set_by_yaml_kv(&mut self, k: &str, v: &Yaml) -> anyhow::Result<()> {
        match bort_yaml::key::normalize(k).as_str() {
            "dispatch" => {
                self.dispatch =
                    DispatchMode::parse_yaml(v).context(format!("invalid value for key {k}"))?;
            }
            "immediate" => {
                let immediate = bort_yaml::value::as_bool(v)
                    .context(format!("invalid bool value for key {k}"))?;
                if immediate {
                    self.dispatch = DispatchMode::Immediate;
                } else if self.dispatch == DispatchMode::Immediate {
                    self.dispatch = DispatchMode::default();
                }
            }
            "thread_name" => {
                let name = bort_yaml::value::as_nonempty_string(v)
                    .context(format!("invalid string value for key {k}"))?;
                self.set_thread_name(name);
            }
            "channel_capacity" => {
                let capacity = bort_yaml::value::as_nonzero_usize(v)
                    .context(format!("invalid nonzero usize value for key {k}"))?;
                self.set_channel_capacity(capacity);
            }
            "persistent" | "provider" => {
                self.persistent = PersistentEndpoints::parse_yaml(v)
                    .context(format!("invalid value for key {k}"))?;
            }
            "remote_service" | "service" => {
                self.remote_service = bort_yaml::value::as_nonempty_string(v)
                    .context(format!("invalid string value for key {k}"))?;
            }
            "error_report_interval" => {
                self.error_report_interval = bort_yaml::humanize::as_duration(v)
                    .context(format!("invalid humanize duration value for key {k}"))?;
            }
            _ => return Err(anyhow!("invalid key {k}")),
        }
        Ok(())
    }
}
