use crate::utils::error::ChunkerError;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Settings {
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ChunkingConfig {
    /// Target chunk size in characters
    #[serde(default = "default_size")]
    pub size: usize,
    /// Fraction of `size` carried over between fixed-size chunks
    #[serde(default = "default_overlap_ratio")]
    pub overlap_ratio: f32,
    #[serde(default)]
    pub strategy: ChunkStrategy,
    /// Segment pages on a rayon pool instead of sequentially
    #[serde(default)]
    pub parallel_pages: bool,
    /// 0 = let rayon decide
    #[serde(default)]
    pub worker_threads: usize,
}

fn default_size() -> usize {
    512
}

fn default_overlap_ratio() -> f32 {
    0.1
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            size: default_size(),
            overlap_ratio: default_overlap_ratio(),
            strategy: ChunkStrategy::default(),
            parallel_pages: false,
            worker_threads: 0,
        }
    }
}

impl ChunkingConfig {
    /// Characters carried over between fixed-size chunks.
    pub fn overlap_chars(&self) -> usize {
        (self.size as f32 * self.overlap_ratio).floor() as usize
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChunkStrategy {
    #[default]
    Semantic, // one chunk per region, section aware
    Fixed,    // sentence packing with overlap
    Layout,   // paragraphs merged, headings/tables isolated
}

impl ChunkStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Semantic => "semantic",
            Self::Fixed => "fixed",
            Self::Layout => "layout",
        }
    }
}

impl fmt::Display for ChunkStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChunkStrategy {
    type Err = ChunkerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "semantic" => Ok(Self::Semantic),
            "fixed" => Ok(Self::Fixed),
            "layout" => Ok(Self::Layout),
            other => Err(ChunkerError::UnknownStrategy(other.to_string())),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
    /// Daily rolling log files are written here when set
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info,rag_chunker=debug".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            directory: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl Settings {
    pub fn load() -> Result<Self, ChunkerError> {
        dotenvy::dotenv().ok();

        let config = Config::builder()
            .add_source(File::with_name("config/settings").required(false))
            // Example: APP__CHUNKING__SIZE=800
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;

        Ok(settings)
    }

    /// Load from one explicit file, without environment overrides.
    pub fn load_from(path: &Path) -> Result<Self, ChunkerError> {
        let config = Config::builder()
            .add_source(File::from(path).required(true))
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;

        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ChunkerError> {
        if self.chunking.size == 0 {
            return Err(ChunkerError::InvalidConfig(
                "chunking.size must be greater than zero".to_string(),
            ));
        }

        let ratio = self.chunking.overlap_ratio;
        if !(0.0..1.0).contains(&ratio) {
            return Err(ChunkerError::InvalidConfig(format!(
                "chunking.overlap_ratio must be within [0, 1), got {}",
                ratio
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.chunking.size, 512);
        assert_eq!(settings.chunking.strategy, ChunkStrategy::Semantic);
        assert_eq!(settings.chunking.overlap_chars(), 51);
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[chunking]\nsize = 100\noverlap_ratio = 0.2\nstrategy = \"layout\"\n\n[logging]\nformat = \"json\""
        )
        .unwrap();

        let settings = Settings::load_from(file.path()).unwrap();
        assert_eq!(settings.chunking.size, 100);
        assert_eq!(settings.chunking.overlap_chars(), 20);
        assert_eq!(settings.chunking.strategy, ChunkStrategy::Layout);
        assert_eq!(settings.logging.format, LogFormat::Json);
        assert!(!settings.chunking.parallel_pages);
    }

    #[test]
    fn test_rejects_overlap_ratio_of_one() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[chunking]\noverlap_ratio = 1.0").unwrap();

        match Settings::load_from(file.path()) {
            Err(ChunkerError::InvalidConfig(msg)) => assert!(msg.contains("overlap_ratio")),
            other => panic!("expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_zero_size() {
        let mut settings = Settings::default();
        settings.chunking.size = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_strategy_from_str() {
        assert_eq!("Fixed".parse::<ChunkStrategy>().unwrap(), ChunkStrategy::Fixed);
        assert_eq!(" layout ".parse::<ChunkStrategy>().unwrap(), ChunkStrategy::Layout);
        assert!(matches!(
            "recursive".parse::<ChunkStrategy>(),
            Err(ChunkerError::UnknownStrategy(_))
        ));
        assert_eq!(ChunkStrategy::Semantic.to_string(), "semantic");
    }
}
