/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

mod map;

pub mod value;

pub use map::{
    get_optional_bool, get_optional_str, get_required as map_get_required, get_required_bool,
    get_required_i64, get_required_str,
};
