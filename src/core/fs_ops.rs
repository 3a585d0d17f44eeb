// src/core/fs_ops.rs
//! File system helpers for the JSON side files

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use tokio::fs;
use tracing::info;

pub struct FsOps;

impl FsOps {
    pub async fn ensure_dir_exists(path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path)
                .await
                .with_context(|| format!("Failed to create directory: {}", path.display()))?;
            info!("Created directory: {}", path.display());
        }
        Ok(())
    }

    pub async fn read_file_safe(path: &Path) -> Result<String> {
        fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read file: {}", path.display()))
    }

    pub async fn write_file_safe(path: &Path, content: &str) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            Self::ensure_dir_exists(parent).await?;
        }

        fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write file: {}", path.display()))?;

        info!("Written file: {}", path.display());
        Ok(())
    }

    /// Read a JSON array file; a missing file is an empty array
    pub async fn read_json_array<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = Self::read_file_safe(path).await?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid JSON array in {}", path.display()))
    }

    /// Append records to a JSON array file, creating it if absent.
    /// The whole array is rewritten pretty-printed.
    pub async fn append_json_records<T: Serialize>(path: &Path, records: &[T]) -> Result<usize> {
        let mut existing: Vec<serde_json::Value> = Self::read_json_array(path).await?;
        for record in records {
            existing.push(serde_json::to_value(record).context("Failed to serialize record")?);
        }

        let content =
            serde_json::to_string_pretty(&existing).context("Failed to serialize JSON array")?;
        Self::write_file_safe(path, &content).await?;
        Ok(existing.len())
    }

    /// Append strings to a JSON array file, skipping values already present.
    /// Returns how many were added.
    pub async fn append_unique_strings(path: &Path, values: &[String]) -> Result<usize> {
        let mut existing: Vec<String> = Self::read_json_array(path).await?;
        let mut seen: HashSet<String> = existing.iter().cloned().collect();

        let before = existing.len();
        for value in values {
            if seen.insert(value.clone()) {
                existing.push(value.clone());
            }
        }

        let added = existing.len() - before;
        if added > 0 {
            let content =
                serde_json::to_string_pretty(&existing).context("Failed to serialize JSON array")?;
            Self::write_file_safe(path, &content).await?;
        }
        Ok(added)
    }

    /// Load a JSON object of string keys to string values
    pub async fn read_json_map(path: &Path) -> Result<BTreeMap<String, String>> {
        let content = Self::read_file_safe(path).await?;
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid JSON object in {}", path.display()))
    }
}
