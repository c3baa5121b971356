use std::{
    env, fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use thiserror::Error;

pub const BUILTIN_INTERPRETER_CONFIG: &str = include_str!("data/interpreter_config.json");

/// Environment variable naming a JSON config file.
pub const CONFIG_PATH_ENV: &str = "DINO_CONFIG_PATH";

/// Runtime knobs for a script run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InterpreterConfig {
    /// Draw the grid after setup and after each successful command.
    pub display: bool,
    /// Pause after each drawn frame. Zero also disables per-command frames.
    pub refresh_interval_secs: u64,
    /// Write the final grid to the output file.
    pub save_output: bool,
    /// `EXEC` fails once this many nested levels are active.
    pub max_nesting_depth: u32,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            display: true,
            refresh_interval_secs: 1,
            save_output: true,
            max_nesting_depth: 10,
        }
    }
}

impl InterpreterConfig {
    pub fn builtin() -> Self {
        serde_json::from_str(BUILTIN_INTERPRETER_CONFIG)
            .expect("builtin interpreter config should parse")
    }

    /// Settings for library use and tests: no frames, no pauses, no dump.
    pub fn headless() -> Self {
        Self {
            display: false,
            refresh_interval_secs: 0,
            save_output: false,
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let config = InterpreterConfig::from_json_str(&contents)?;
        Ok(config)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    /// True when successful commands should draw and pause.
    pub fn paces_commands(&self) -> bool {
        self.display && self.refresh_interval_secs > 0
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse interpreter config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read interpreter config from {path:?}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Resolve the config from `explicit`, then `DINO_CONFIG_PATH`, then the
/// builtin defaults. Returns the file actually used, if any.
pub fn load_interpreter_config(explicit: Option<&Path>) -> (InterpreterConfig, Option<PathBuf>) {
    let candidate = explicit
        .map(Path::to_path_buf)
        .or_else(|| env::var_os(CONFIG_PATH_ENV).map(PathBuf::from));

    if let Some(path) = candidate {
        match InterpreterConfig::from_file(&path) {
            Ok(config) => {
                tracing::info!(
                    target: "dino::config",
                    path = %path.display(),
                    "interpreter_config.loaded=file"
                );
                return (config, Some(path));
            }
            Err(err) => {
                tracing::warn!(
                    target: "dino::config",
                    path = %path.display(),
                    error = %err,
                    "interpreter_config.load_failed"
                );
            }
        }
    }

    tracing::info!(target: "dino::config", "interpreter_config.loaded=builtin");
    (InterpreterConfig::builtin(), None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_matches_default() {
        assert_eq!(InterpreterConfig::builtin(), InterpreterConfig::default());
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config = InterpreterConfig::from_json_str(r#"{ "display": false }"#).unwrap();
        assert!(!config.display);
        assert_eq!(config.max_nesting_depth, 10);
        assert_eq!(config.refresh_interval(), Duration::from_secs(1));
        assert!(!config.paces_commands());
    }

    #[test]
    fn zero_interval_disables_pacing() {
        let config = InterpreterConfig {
            refresh_interval_secs: 0,
            ..InterpreterConfig::default()
        };
        assert!(config.display);
        assert!(!config.paces_commands());
    }

    #[test]
    fn unreadable_file_reports_path() {
        let err = InterpreterConfig::from_file(Path::new("/definitely/not/here.json"))
            .expect_err("missing file");
        assert!(matches!(err, ConfigError::ReadFailed { .. }));
        assert!(err.to_string().contains("here.json"));
    }

    #[test]
    fn explicit_bad_path_falls_back_to_builtin() {
        let (config, used) = load_interpreter_config(Some(Path::new("/definitely/not/here.json")));
        assert_eq!(config, InterpreterConfig::builtin());
        assert_eq!(used, None);
    }
}
