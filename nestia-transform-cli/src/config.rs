//! Configuration management for the CLI.
//!
//! Settings come from a `nestia-transform.toml` file, then command-line
//! flags override them.

use std::fmt;
use std::path::{Path, PathBuf};

use nestia_transform::{AllowList, StringifyMode, TransformOptions};
use serde::Deserialize;

use crate::error::{CliResult, ConfigError};

/// Default configuration filename.
pub const CONFIG_FILENAME: &str = "nestia-transform.toml";

/// Main configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where snapshots are read from.
    pub input: InputConfig,

    /// Where results are written.
    pub output: OutputConfig,

    /// Artifact generation.
    pub transform: TransformConfig,

    /// Logging.
    pub log: LogConfig,
}

/// Input configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Directory scanned for snapshot files.
    pub dir: PathBuf,

    /// Glob applied to paths relative to `dir`.
    pub filter: Option<String>,
}

/// Output configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output directory for results.
    pub dir: PathBuf,

    /// What gets written per snapshot.
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// The rewritten compilation unit, itself a snapshot.
    #[default]
    Json,
    /// The rewritten decorators as TypeScript source.
    Typescript,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Typescript => write!(f, "typescript"),
        }
    }
}

/// Transform configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    /// Which closure generated artifacts carry.
    pub stringify: StringifyMode,

    /// Root of the local decorator sources (`<root>/src/decorators`).
    /// Defaults to the working directory.
    pub package_root: Option<PathBuf>,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            filter: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./transformed"),
            format: OutputFormat::Json,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl TransformConfig {
    /// Options handed to the transform.
    pub fn options(&self) -> TransformOptions {
        TransformOptions::new().with_stringify(self.stringify)
    }

    /// Allow-list for the configured package root.
    pub fn allow_list(&self) -> AllowList {
        match &self.package_root {
            Some(root) => AllowList::new(root),
            None => AllowList::global().clone(),
        }
    }
}

/// Configuration manager for loading and merging configs.
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration from a file path.
    ///
    /// If the path is None, attempts to load from the default location.
    /// If no config file exists, returns default configuration.
    pub fn load(path: Option<&Path>) -> CliResult<Config> {
        let config_path = path
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME));

        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        Self::parse(&content, &config_path)
    }

    /// Parse configuration text. `origin` is only used in errors.
    pub fn parse(content: &str, origin: &Path) -> CliResult<Config> {
        let config: Config = toml::from_str(content)
            .map_err(|e| ConfigError::invalid_toml(origin.to_path_buf(), e.to_string()))?;

        if let Some(pattern) = &config.input.filter {
            glob::Pattern::new(pattern)
                .map_err(|e| ConfigError::invalid_value("input.filter", e.to_string()))?;
        }

        Ok(config)
    }

    /// Merge CLI arguments into configuration.
    ///
    /// CLI arguments take precedence over config file values.
    pub fn merge_cli_args(mut config: Config, args: &CliArgs) -> Config {
        if let Some(ref input) = args.input {
            config.input.dir = input.clone();
        }

        if let Some(ref filter) = args.filter {
            config.input.filter = Some(filter.clone());
        }

        if let Some(ref output) = args.output {
            config.output.dir = output.clone();
        }

        if let Some(format) = args.format {
            config.output.format = format;
        }

        if let Some(stringify) = args.stringify {
            config.transform.stringify = stringify;
        }

        if let Some(ref package_root) = args.package_root {
            config.transform.package_root = Some(package_root.clone());
        }

        config
    }

    /// Generate default configuration file content with comments.
    pub fn default_config_content() -> &'static str {
        r#"# nestia-transform configuration file

[input]
# Directory scanned for *.nestia.json type snapshots
dir = "."

# Only transform snapshots whose relative path matches this glob
# filter = "controllers/**"

[output]
# Output directory
dir = "./transformed"

# json: rewritten snapshots, typescript: rewritten decorators as source
format = "json"

[transform]
# Closure carried by generated artifacts (assert, is, validate, stringify)
stringify = "assert"

# Root of the local decorator sources (<root>/src/decorators)
# package_root = "."

[log]
# Log filter used when RUST_LOG is not set
level = "warn"
"#
    }
}

/// CLI arguments that can override configuration.
#[derive(Debug, Default)]
pub struct CliArgs {
    /// Input directory override.
    pub input: Option<PathBuf>,

    /// Filter override.
    pub filter: Option<String>,

    /// Output directory override.
    pub output: Option<PathBuf>,

    /// Output format override.
    pub format: Option<OutputFormat>,

    /// Stringify mode override.
    pub stringify: Option<StringifyMode>,

    /// Package root override.
    pub package_root: Option<PathBuf>,
}
