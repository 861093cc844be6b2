/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use anyhow::anyhow;
use serde_json::{Map, Value};

pub fn get_required<'a>(map: &'a Map<String, Value>, k: &str) -> anyhow::Result<&'a Value> {
    match map.get(k) {
        Some(v) => Ok(v),
        None => Err(anyhow!("no key {k} found in this map")),
    }
}

pub fn get_required_str<'a>(map: &'a Map<String, Value>, k: &str) -> anyhow::Result<&'a str> {
    match map.get(k) {
        Some(v) => match v {
            Value::String(s) => Ok(s),
            _ => Err(anyhow!("invalid string value for key {k}")),
        },
        None => Err(anyhow!("no key {k} found in this map")),
    }
}

pub fn get_required_i64(map: &Map<String, Value>, k: &str) -> anyhow::Result<i64> {
    match map.get(k) {
        Some(Value::Number(n)) => n
            .as_i64()
            .ok_or_else(|| anyhow!("invalid integer value for key {k}")),
        Some(_) => Err(anyhow!("invalid integer value for key {k}")),
        None => Err(anyhow!("no key {k} found in this map")),
    }
}

pub fn get_required_bool(map: &Map<String, Value>, k: &str) -> anyhow::Result<bool> {
    match map.get(k) {
        Some(Value::Bool(b)) => Ok(*b),
        Some(_) => Err(anyhow!("invalid boolean value for key {k}")),
        None => Err(anyhow!("no key {k} found in this map")),
    }
}

/// A missing key and an explicit `null` are both treated as absent.
pub fn get_optional_str<'a>(
    map: &'a Map<String, Value>,
    k: &str,
) -> anyhow::Result<Option<&'a str>> {
    match map.get(k) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(_) => Err(anyhow!("invalid string value for key {k}")),
    }
}

pub fn get_optional_bool(map: &Map<String, Value>, k: &str) -> anyhow::Result<Option<bool>> {
    match map.get(k) {
        None => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(_) => Err(anyhow!("invalid boolean value for key {k}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Map<String, Value> {
        let Value::Object(map) = json!({
            "eventName": "screen_on",
            "timestampMs": 123456,
            "carryOver": true,
            "ratio": 0.5,
            "reportName": null,
        }) else {
            unreachable!()
        };
        map
    }

    #[test]
    fn required() {
        let map = sample();
        assert!(get_required(&map, "eventName").is_ok());
        assert!(get_required(&map, "missing").is_err());

        assert_eq!(get_required_str(&map, "eventName").unwrap(), "screen_on");
        assert!(get_required_str(&map, "timestampMs").is_err());

        assert_eq!(get_required_i64(&map, "timestampMs").unwrap(), 123456);
        assert!(get_required_i64(&map, "ratio").is_err());
        assert!(get_required_i64(&map, "missing").is_err());

        assert!(get_required_bool(&map, "carryOver").unwrap());
        assert!(get_required_bool(&map, "eventName").is_err());
    }

    #[test]
    fn optional() {
        let map = sample();
        assert_eq!(get_optional_str(&map, "reportName").unwrap(), None);
        assert_eq!(get_optional_str(&map, "missing").unwrap(), None);
        assert_eq!(
            get_optional_str(&map, "eventName").unwrap(),
            Some("screen_on")
        );
        assert!(get_optional_str(&map, "ratio").is_err());

        assert_eq!(get_optional_bool(&map, "internal").unwrap(), None);
        assert_eq!(get_optional_bool(&map, "carryOver").unwrap(), Some(true));
        assert!(get_optional_bool(&map, "eventName").is_err());
    }
}
