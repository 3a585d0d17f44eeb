// src/environment.rs
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// File locations for one deployment environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    pub data_path: PathBuf,
    pub model_path: PathBuf,
    pub taxonomy_path: PathBuf,
    pub rules_path: PathBuf,
    pub jobs_json_path: PathBuf,
    pub database_path: PathBuf,
    pub answers_path: PathBuf,
    pub unanswered_questions_path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    local: EnvironmentConfig,
    production: EnvironmentConfig,
}

impl EnvironmentConfig {
    /// Load configuration based on environment
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let environment = Self::get_environment();
        info!("Loading configuration for environment: {}", environment);

        let config_path = config_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        Self::load_from_file(&config_path, &environment)
    }

    pub fn get_environment() -> String {
        std::env::var("JOBSCOUT_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .or_else(|_| std::env::var("ENV"))
            .unwrap_or_else(|_| "local".to_string())
    }

    fn load_from_file(config_path: &Path, environment: &str) -> Result<Self> {
        if !config_path.exists() {
            anyhow::bail!(
                "{} not found. Cannot start without configuration.",
                config_path.display()
            );
        }

        let config_content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        Self::from_yaml_str(&config_content, environment)
            .with_context(|| format!("Failed to parse {}", config_path.display()))
    }

    fn from_yaml_str(content: &str, environment: &str) -> Result<Self> {
        let config_file: ConfigFile = serde_yaml::from_str(content)?;

        let env_config = match environment {
            "production" => config_file.production,
            _ => config_file.local,
        };

        // Make paths absolute
        Ok(Self {
            data_path: Self::resolve_path(&env_config.data_path)?,
            model_path: Self::resolve_path(&env_config.model_path)?,
            taxonomy_path: Self::resolve_path(&env_config.taxonomy_path)?,
            rules_path: Self::resolve_path(&env_config.rules_path)?,
            jobs_json_path: Self::resolve_path(&env_config.jobs_json_path)?,
            database_path: Self::resolve_path(&env_config.database_path)?,
            answers_path: Self::resolve_path(&env_config.answers_path)?,
            unanswered_questions_path: Self::resolve_path(&env_config.unanswered_questions_path)?,
        })
    }

    fn resolve_path(path: &Path) -> Result<PathBuf> {
        if path.is_absolute() {
            Ok(path.to_path_buf())
        } else {
            let current_dir = std::env::current_dir().context("Failed to get current directory")?;
            Ok(current_dir.join(path))
        }
    }
}
