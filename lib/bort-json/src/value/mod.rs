/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

mod primary;
pub use primary::{as_string_list, as_u32};

mod metrics;
pub use metrics::{as_aggregation_list, as_data_type, as_metric_type};
