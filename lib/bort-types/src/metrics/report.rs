/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use thiserror::Error;

pub const HEARTBEAT_REPORT: &str = "Heartbeat";
pub const SESSION_REPORT: &str = "Session";

pub const RESERVED_REPORT_NAMES: [&str; 2] = ["heartbeat", "daily-heartbeat"];
pub const SESSION_NAME_PATTERN: &str = "^[a-zA-Z0-9-_.]{1,64}$";
pub const SESSION_NAME_MAX_LEN: usize = 64;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionNameError {
    #[error("Session name must not be null")]
    Missing,
    #[error("Session name [{0}] must match the '{pattern}' regex.", pattern = SESSION_NAME_PATTERN)]
    InvalidFormat(String),
    #[error(
        "Session name [{0}] must not be in the list of reserved names ({names:?}).",
        names = RESERVED_REPORT_NAMES
    )]
    Reserved(String),
}

pub fn is_session_report(report_type: &str) -> bool {
    report_type == SESSION_REPORT
}

fn chars_allowed_in_session_name(s: &str) -> bool {
    if s.is_empty() || s.len() > SESSION_NAME_MAX_LEN {
        return false;
    }
    s.bytes()
        .all(|c| matches!(c, b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_' | b'.'))
}

pub fn check_session_name(name: Option<&str>) -> Result<(), SessionNameError> {
    let Some(name) = name else {
        return Err(SessionNameError::Missing);
    };
    if !chars_allowed_in_session_name(name) {
        return Err(SessionNameError::InvalidFormat(name.to_string()));
    }
    if RESERVED_REPORT_NAMES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(name))
    {
        return Err(SessionNameError::Reserved(name.to_string()));
    }
    Ok(())
}

/// Returns the error message if the session name is not acceptable.
pub fn validate_session_name(name: Option<&str>) -> Option<String> {
    check_session_name(name).err().map(|e| e.to_string())
}
