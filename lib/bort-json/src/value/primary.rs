/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use anyhow::anyhow;
use serde_json::Value;

// Wire records are produced by other programs, so unlike config values there
// is no coercion between json types here.

pub fn as_u32(v: &Value) -> anyhow::Result<u32> {
    match v {
        Value::Number(n) => {
            if let Some(n) = n.as_u64() {
                Ok(u32::try_from(n)?)
            } else {
                Err(anyhow!("out of range json value for u32"))
            }
        }
        _ => Err(anyhow!(
            "json value type for 'u32' should be 'positive integer'"
        )),
    }
}

pub fn as_string_list(v: &Value) -> anyhow::Result<Vec<&str>> {
    match v {
        Value::Array(seq) => {
            let mut vec = Vec::with_capacity(seq.len());
            for (i, v) in seq.iter().enumerate() {
                match v {
                    Value::String(s) => vec.push(s.as_str()),
                    _ => return Err(anyhow!("list element #{i} should be 'string'")),
                }
            }
            Ok(vec)
        }
        _ => Err(anyhow!("json value type should be 'string array'")),
    }
}
