/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

pub fn normalize(raw: &str) -> String {
    raw.to_lowercase().replace('-', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t() {
        assert_eq!(normalize("Thread-Name"), "thread_name");
        assert_eq!(normalize("REMOTE_SERVICE"), "remote_service");
        assert_eq!(normalize("channel-Capacity"), "channel_capacity");
    }
}
