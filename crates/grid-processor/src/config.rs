//! Configuration for a conversion run.

use std::path::PathBuf;

/// Default input raster, relative to the working directory.
pub const DEFAULT_DATA_PATH: &str = "./tiff_samples/flood_data.tif";

/// Default output root, relative to the working directory.
pub const DEFAULT_SAVE_DIR: &str = "./processed_samples";

/// Configuration for one conversion run.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionConfig {
    /// Raster to convert.
    pub data_path: PathBuf,

    /// Root directory; outputs land in `<save_dir>/<input_stem>/`.
    pub save_dir: PathBuf,

    /// How the per-pixel loop is driven.
    pub execution: ExecutionMode,

    /// Size of a dedicated worker pool. `None` uses rayon's global pool.
    pub threads: Option<usize>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            save_dir: PathBuf::from(DEFAULT_SAVE_DIR),
            execution: ExecutionMode::Parallel,
            threads: None,
        }
    }
}

impl ConversionConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("CONVERT_DATA_PATH") {
            config.data_path = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var("CONVERT_SAVE_DIR") {
            config.save_dir = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var("CONVERT_PARALLEL") {
            config.execution = if val.to_lowercase() == "true" || val == "1" {
                ExecutionMode::Parallel
            } else {
                ExecutionMode::Sequential
            };
        }

        if let Ok(val) = std::env::var("CONVERT_THREADS") {
            if let Ok(threads) = val.parse() {
                config.threads = Some(threads);
            }
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.data_path.as_os_str().is_empty() {
            return Err("data_path must not be empty".to_string());
        }

        if self.save_dir.as_os_str().is_empty() {
            return Err("save_dir must not be empty".to_string());
        }

        if self.threads == Some(0) {
            return Err("threads must be > 0".to_string());
        }

        Ok(())
    }
}

/// How the grid transform engine visits rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    /// Rows one after another on the calling thread.
    Sequential,
    /// Rows distributed across rayon workers.
    #[default]
    Parallel,
}

impl ExecutionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sequential => "sequential",
            Self::Parallel => "parallel",
        }
    }
}

impl std::fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_cli() {
        let config = ConversionConfig::default();
        assert_eq!(config.data_path, PathBuf::from("./tiff_samples/flood_data.tif"));
        assert_eq!(config.save_dir, PathBuf::from("./processed_samples"));
        assert_eq!(config.execution, ExecutionMode::Parallel);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_threads() {
        let config = ConversionConfig {
            threads: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_paths() {
        let config = ConversionConfig {
            data_path: PathBuf::new(),
            ..Default::default()
        };
        assert!(config.validate().unwrap_err().contains("data_path"));

        let config = ConversionConfig {
            save_dir: PathBuf::new(),
            ..Default::default()
        };
        assert!(config.validate().unwrap_err().contains("save_dir"));
    }

    // The only test that touches CONVERT_* variables
    #[test]
    fn test_from_env_overrides() {
        std::env::set_var("CONVERT_DATA_PATH", "/data/harvey.tif");
        std::env::set_var("CONVERT_PARALLEL", "false");
        std::env::set_var("CONVERT_THREADS", "3");

        let config = ConversionConfig::from_env();

        std::env::remove_var("CONVERT_DATA_PATH");
        std::env::remove_var("CONVERT_PARALLEL");
        std::env::remove_var("CONVERT_THREADS");

        assert_eq!(config.data_path, PathBuf::from("/data/harvey.tif"));
        assert_eq!(config.save_dir, PathBuf::from(DEFAULT_SAVE_DIR));
        assert_eq!(config.execution, ExecutionMode::Sequential);
        assert_eq!(config.threads, Some(3));
    }

    #[test]
    fn test_execution_mode_display() {
        assert_eq!(ExecutionMode::Sequential.to_string(), "sequential");
        assert_eq!(ExecutionMode::default(), ExecutionMode::Parallel);
    }
}
