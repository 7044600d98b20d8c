//! Configuration management for create-creator.
//!
//! This module handles loading and merging configuration from multiple sources,
//! in increasing precedence:
//! - Built-in defaults
//! - Config file (`<config dir>/create-creator/config.yaml`, or `CREATOR_CONFIG`)
//! - Environment variables
//! - Command-line flags
//!
//! Process-wide lookups (working directory, home directory) happen here once,
//! so the scaffolding logic only ever sees explicit values.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Directory name used under the platform config dir.
const APP_DIR: &str = "create-creator";

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory that becomes the new project root
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Directory that replaces the embedded template trees
    pub templates: Option<PathBuf>,

    /// Plan file to run instead of the built-in plan
    pub plan: Option<PathBuf>,

    /// Home directory used to locate `.gitconfig`
    pub home: Option<PathBuf>,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,

    /// Accept every default without prompting
    pub assume_yes: bool,

    /// Report what would be written and run without doing it
    pub dry_run: bool,
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    templates: Option<String>,
    plan: Option<String>,
    logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            templates: None,
            plan: None,
            home: dirs::home_dir(),
            log_level: None,
            verbose: false,
            no_color: false,
            assume_yes: false,
            dry_run: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from the config file, environment variables and defaults.
    ///
    /// Environment variables:
    /// - `CREATOR_WORKSPACE`: Override the target directory
    /// - `CREATOR_CONFIG`: Path to config file
    /// - `CREATOR_TEMPLATES`: Templates root
    /// - `CREATOR_PLAN`: Plan file
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use creator_core::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load config");
    /// println!("Scaffolding into {:?}", config.workspace);
    /// ```
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        if let Ok(workspace) = std::env::var("CREATOR_WORKSPACE") {
            config.workspace = PathBuf::from(workspace);
        }

        if let Ok(config_file) = std::env::var("CREATOR_CONFIG") {
            config.config_file = Some(PathBuf::from(config_file));
        }

        // An explicitly named config file must exist; the default one is optional.
        match config.config_file.clone() {
            Some(path) => config = config.merge_yaml(&path)?,
            None => {
                if let Some(path) = default_config_path().filter(|p| p.exists()) {
                    config = config.merge_yaml(&path)?;
                }
            }
        }

        if let Ok(templates) = std::env::var("CREATOR_TEMPLATES") {
            config.templates = Some(PathBuf::from(templates));
        }

        if let Ok(plan) = std::env::var("CREATOR_PLAN") {
            config.plan = Some(PathBuf::from(plan));
        }

        if let Ok(level) = std::env::var("RUST_LOG") {
            config.log_level = Some(level);
        }

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into this config.
    fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();
        result.config_file = Some(path.to_path_buf());

        // Relative paths in the file are relative to the file itself.
        let base = path.parent().unwrap_or_else(|| Path::new("."));

        if let Some(templates) = config_file.templates {
            result.templates = Some(base.join(templates));
        }

        if let Some(plan) = config_file.plan {
            result.plan = Some(base.join(plan));
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// Flags take precedence over the config file and environment variables.
    #[allow(clippy::too_many_arguments)]
    pub fn with_overrides(
        mut self,
        workspace: Option<PathBuf>,
        config_file: Option<PathBuf>,
        templates: Option<PathBuf>,
        plan: Option<PathBuf>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> AppResult<Self> {
        if let Some(config_file) = config_file {
            if self.config_file.as_ref() != Some(&config_file) {
                self = self.merge_yaml(&config_file)?;
            }
        }

        if let Some(workspace) = workspace {
            self.workspace = workspace;
        }

        if let Some(templates) = templates {
            self.templates = Some(templates);
        }

        if let Some(plan) = plan {
            self.plan = Some(plan);
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        Ok(self)
    }

    /// Path to `.gitconfig` in the configured home directory.
    pub fn gitconfig_path(&self) -> Option<PathBuf> {
        self.home.as_ref().map(|home| home.join(".gitconfig"))
    }

    /// Validate that the directories a run depends on exist.
    pub fn validate(&self) -> AppResult<()> {
        if !self.workspace.is_dir() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                self.workspace
            )));
        }

        if let Some(ref templates) = self.templates {
            if !templates.is_dir() {
                return Err(AppError::Config(format!(
                    "Templates directory does not exist: {:?}",
                    templates
                )));
            }
        }

        if let Some(ref plan) = self.plan {
            if !plan.is_file() {
                return Err(AppError::Config(format!(
                    "Plan file does not exist: {:?}",
                    plan
                )));
            }
        }

        Ok(())
    }
}

/// `<config dir>/create-creator/config.yaml`, when the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.yaml"))
}
