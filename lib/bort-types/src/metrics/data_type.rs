/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::{MetricValue, ParseError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DataType {
    Double,
    String,
    Boolean,
}

#[derive(Debug, Clone, Error, PartialEq)]
#[error("value {value} does not match data type {expected}")]
pub struct DataTypeMismatch {
    pub value: MetricValue,
    pub expected: DataType,
}

impl DataType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            DataType::Double => "double",
            DataType::String => "string",
            DataType::Boolean => "boolean",
        }
    }

    pub fn lookup(token: &str) -> Option<Self> {
        match token {
            "double" => Some(DataType::Double),
            "string" => Some(DataType::String),
            "boolean" => Some(DataType::Boolean),
            _ => None,
        }
    }

    /// Check that `value` carries the kind declared by this data type.
    pub fn verify(&self, value: &MetricValue) -> Result<(), DataTypeMismatch> {
        if value.data_type() == *self {
            Ok(())
        } else {
            Err(DataTypeMismatch {
                value: value.clone(),
                expected: *self,
            })
        }
    }
}

impl FromStr for DataType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DataType::lookup(s).ok_or_else(|| ParseError::UnknownDataType(s.to_string()))
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
