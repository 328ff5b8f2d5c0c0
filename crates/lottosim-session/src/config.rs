//! Configuration loading and typed config structures for Lottosim.
//!
//! The configuration lives in `lottosim-config.yaml` in the working
//! directory. Every field has a default, so an empty or partial file is
//! valid and a missing file can be replaced by [`LottosimConfig::default`].

use std::path::Path;

use serde::Deserialize;

use lottosim_engine::{
    DEFAULT_ROUNDS_PER_WEEK, GuessInput, GuessSource, LotterySource, SimulationRequest,
};

/// Environment variable that overrides `logging.level`.
pub const LOG_LEVEL_ENV: &str = "LOTTOSIM_LOG_LEVEL";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level Lottosim configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LottosimConfig {
    /// Engine defaults.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Session service limits.
    #[serde(default)]
    pub service: ServiceConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Sessions the runner plays through.
    #[serde(default)]
    pub runner: RunnerConfig,
}

impl LottosimConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `LOTTOSIM_LOG_LEVEL` overrides `logging.level` when set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not to an empty mapping.
        if yaml.trim().is_empty() {
            let mut config = Self::default();
            config.logging.apply_env_overrides();
            return Ok(config);
        }
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.logging.apply_env_overrides();
        Ok(config)
    }
}

/// Engine defaults applied by the session service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EngineConfig {
    /// Rounds per week for requests that do not specify one.
    #[serde(default = "default_rounds_per_week")]
    pub default_rounds_per_week: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_rounds_per_week: default_rounds_per_week(),
        }
    }
}

/// Limits enforced by the session service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceConfig {
    /// Upper bound on years played by one advance request.
    #[serde(default = "default_max_years_per_request")]
    pub max_years_per_request: u32,

    /// Years played when an advance request names none.
    #[serde(default = "default_years")]
    pub default_years: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_years_per_request: default_max_years_per_request(),
            default_years: default_years(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error) or a full filter directive.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl LoggingConfig {
    /// Apply environment variable overrides.
    ///
    /// `LOTTOSIM_LOG_LEVEL` replaces `level` when set.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var(LOG_LEVEL_ENV) {
            self.level = val;
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Sessions and pacing for the runner binary.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RunnerConfig {
    /// Sessions to create at startup.
    #[serde(default = "default_sessions")]
    pub sessions: Vec<SessionSpec>,

    /// Number of advance steps per session.
    #[serde(default = "default_steps")]
    pub steps: u32,

    /// Years requested by each step.
    #[serde(default = "default_years_per_step")]
    pub years_per_step: u32,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            sessions: default_sessions(),
            steps: default_steps(),
            years_per_step: default_years_per_step(),
        }
    }
}

/// One session the runner creates.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SessionSpec {
    /// Session id; generated when absent.
    #[serde(default)]
    pub id: Option<String>,

    /// Catalog lottery name.
    #[serde(default = "default_lottery")]
    pub lottery: String,

    /// Player numbers, flat or per pool; generated when absent.
    #[serde(default)]
    pub guess: Option<GuessInput>,

    /// Rounds per week; the engine default when absent.
    #[serde(default)]
    pub rounds_per_week: Option<u32>,

    /// Seed for reproducible runs.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl SessionSpec {
    /// Build the engine request this entry describes.
    #[must_use]
    pub fn to_request(&self) -> SimulationRequest {
        SimulationRequest {
            lottery: LotterySource::Named(self.lottery.clone()),
            guess: self
                .guess
                .clone()
                .map_or(GuessSource::Generate, GuessSource::Provided),
            rounds_per_week: self.rounds_per_week,
            seed: self.seed,
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

const fn default_rounds_per_week() -> u32 {
    DEFAULT_ROUNDS_PER_WEEK
}

const fn default_max_years_per_request() -> u32 {
    200
}

const fn default_years() -> u32 {
    1
}

fn default_log_level() -> String {
    "info".to_owned()
}

fn default_lottery() -> String {
    "lotto".to_owned()
}

fn default_sessions() -> Vec<SessionSpec> {
    vec![SessionSpec {
        id: None,
        lottery: default_lottery(),
        guess: None,
        rounds_per_week: None,
        seed: None,
    }]
}

const fn default_steps() -> u32 {
    5
}

const fn default_years_per_step() -> u32 {
    10
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_documented_values() {
        let config = LottosimConfig::default();
        assert_eq!(config.engine.default_rounds_per_week, 3);
        assert_eq!(config.service.max_years_per_request, 200);
        assert_eq!(config.service.default_years, 1);
        assert!(!config.logging.json);
        assert_eq!(config.runner.steps, 5);
        assert_eq!(config.runner.years_per_step, 10);
        assert_eq!(config.runner.sessions.len(), 1);
        assert_eq!(config.runner.sessions.first().unwrap().lottery, "lotto");
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
engine:
  default_rounds_per_week: 2

service:
  max_years_per_request: 50
  default_years: 3

logging:
  json: true

runner:
  steps: 2
  years_per_step: 25
  sessions:
    - id: "alice"
      lottery: "eurojackpot"
      guess: [[1, 2, 3, 4, 5], [1, 2]]
      seed: 42
    - lottery: "mini_lotto"
      guess: [3, 7, 12, 30, 41]
      rounds_per_week: 1
"#;

        let config = LottosimConfig::parse(yaml).unwrap();

        assert_eq!(config.engine.default_rounds_per_week, 2);
        assert_eq!(config.service.max_years_per_request, 50);
        assert_eq!(config.service.default_years, 3);
        assert!(config.logging.json);
        assert_eq!(config.runner.steps, 2);
        assert_eq!(config.runner.years_per_step, 25);
        assert_eq!(config.runner.sessions.len(), 2);

        let alice = config.runner.sessions.first().unwrap();
        assert_eq!(alice.id.as_deref(), Some("alice"));
        assert_eq!(
            alice.guess,
            Some(GuessInput::Nested(vec![vec![1, 2, 3, 4, 5], vec![1, 2]]))
        );
        assert_eq!(alice.seed, Some(42));

        let mini = config.runner.sessions.get(1).unwrap();
        assert_eq!(mini.id, None);
        assert_eq!(mini.guess, Some(GuessInput::Flat(vec![3, 7, 12, 30, 41])));
        assert_eq!(mini.rounds_per_week, Some(1));
    }

    #[test]
    fn parse_minimal_yaml() {
        let yaml = "service:\n  max_years_per_request: 10\n";
        let config = LottosimConfig::parse(yaml).unwrap();

        // Overridden
        assert_eq!(config.service.max_years_per_request, 10);
        // Everything else uses defaults
        assert_eq!(config.service.default_years, 1);
        assert_eq!(config.engine.default_rounds_per_week, 3);
        assert_eq!(config.runner.sessions.len(), 1);
    }

    #[test]
    fn parse_empty_yaml() {
        let config = LottosimConfig::parse("");
        assert!(config.is_ok());
    }

    #[test]
    fn parse_rejects_wrong_types() {
        let yaml = "service:\n  max_years_per_request: many\n";
        let config = LottosimConfig::parse(yaml);
        assert!(matches!(config, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn missing_file_is_io_error() {
        let config = LottosimConfig::from_file(Path::new("does-not-exist.yaml"));
        assert!(matches!(config, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn session_spec_builds_request() {
        let spec = SessionSpec {
            id: None,
            lottery: "lotto".to_owned(),
            guess: None,
            rounds_per_week: Some(4),
            seed: Some(9),
        };
        let request = spec.to_request();
        assert_eq!(request.lottery, LotterySource::Named("lotto".to_owned()));
        assert_eq!(request.guess, GuessSource::Generate);
        assert_eq!(request.rounds_per_week, Some(4));
        assert_eq!(request.seed, Some(9));
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("lottosim-config.yaml");
        if path.exists() {
            let config = LottosimConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
        }
    }
}
