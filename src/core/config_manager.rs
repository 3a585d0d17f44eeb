// src/core/config_manager.rs
//! Loads the environment paths and the rules file they point to

use anyhow::{Context, Result};
use std::path::Path;

use crate::config::{RuleConfiguration, RulesFile, SearchOptions, TranslatorSettings};
use crate::environment::EnvironmentConfig;

#[derive(Debug, Clone)]
pub struct ConfigManager {
    pub environment: EnvironmentConfig,
    pub rules: RuleConfiguration,
    pub options: SearchOptions,
    pub translator: TranslatorSettings,
}

impl ConfigManager {
    /// Load all configurations
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let environment = EnvironmentConfig::load(config_path)?;
        Self::from_environment(environment)
    }

    pub fn from_environment(environment: EnvironmentConfig) -> Result<Self> {
        let rules_file = RulesFile::load(&environment.rules_path).with_context(|| {
            format!(
                "Failed to load rules from {}",
                environment.rules_path.display()
            )
        })?;

        Ok(Self {
            environment,
            rules: rules_file.rules,
            options: rules_file.options,
            translator: rules_file.translator,
        })
    }

    /// Ensure all required directories exist
    pub async fn ensure_directories(&self) -> Result<()> {
        use crate::core::FsOps;

        FsOps::ensure_dir_exists(&self.environment.data_path).await?;

        for path in [
            &self.environment.database_path,
            &self.environment.jobs_json_path,
            &self.environment.unanswered_questions_path,
        ] {
            if let Some(parent) = path.parent() {
                FsOps::ensure_dir_exists(parent).await?;
            }
        }

        Ok(())
    }
}
