use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main configuration structure for run control
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RunControlConfig {
    /// Logging settings
    pub observability: ObservabilityConfig,
    /// Transition runner settings
    pub runner: RunnerConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level or full `EnvFilter` directive
    pub log_level: String,
    /// Emit JSON lines instead of compact text
    pub json_logs: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Check for pause/stop before every step, not only before every transition
    pub pause_point_per_step: bool,
    /// End the run at the first transition that evaluates to false
    pub stop_on_failure: bool,
    /// Stop the run after this many seconds (no limit when unset)
    pub run_timeout_seconds: Option<u64>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            pause_point_per_step: true,
            stop_on_failure: false,
            run_timeout_seconds: None,
        }
    }
}

impl RunnerConfig {
    pub fn run_timeout(&self) -> Option<Duration> {
        self.run_timeout_seconds.map(Duration::from_secs)
    }
}

impl RunControlConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration file (run-control.toml)
    /// 3. Environment variables (prefixed with RUN_CONTROL_)
    pub fn load() -> Result<Self> {
        let mut builder = Config::builder();

        if Path::new("run-control.toml").exists() {
            builder = builder.add_source(File::with_name("run-control"));
        }

        // RUN_CONTROL_RUNNER__STOP_ON_FAILURE=true
        builder = builder.add_source(
            Environment::with_prefix("RUN_CONTROL")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Load configuration from an explicit file, still honoring environment overrides
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("RUN_CONTROL")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        Ok(config.try_deserialize()?)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::info!("Loaded environment variables from .env file");
        }
        Ok(())
    }
}
