/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::path::Path;

use anyhow::{Context, anyhow};
use yaml_rust::{Yaml, YamlLoader};

/// Load the first document of a yaml file.
pub fn load_doc(path: &Path) -> anyhow::Result<Yaml> {
    let content = std::fs::read_to_string(path)
        .context(format!("failed to read file {}", path.display()))?;
    let docs = YamlLoader::load_from_str(&content)
        .map_err(|e| anyhow!("invalid yaml file {}: {e}", path.display()))?;
    docs.into_iter()
        .next()
        .ok_or_else(|| anyhow!("no yaml document found in file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_file() {
        assert!(load_doc(Path::new("/nonexistent/bort-reporting.yaml")).is_err());
    }
}
