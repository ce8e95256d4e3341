use config::{Config as ConfigLoader, Environment, File};
use serde::Deserialize;
use std::path::Path;

use super::error::Error;
use common::types::Precision;

/// Largest decimal exponent the simulator may draw; `10^300` times a mantissa below ten stays finite.
pub const MAX_DECIMAL_EXPONENT: i32 = 300;

#[derive(Debug, Deserialize, Clone)]
pub struct ExecutorConfig {
    pub buffer_size: usize,
    #[serde(default)]
    pub precision_bits: Option<u32>,
}

impl ExecutorConfig {
    /// Working precision of the reduction; exact when `precision_bits` is unset.
    pub fn precision(&self) -> Result<Precision, Error> {
        Ok(Precision::from_option(self.precision_bits)?)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProducerConfig {
    pub batch_size: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReporterConfig {
    pub interval_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SimulatorConfig {
    pub batch_size: usize,
    pub batches: usize,
    pub interval_ms: u64,
    pub max_decimal_exponent: i32,
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub executor: ExecutorConfig,
    pub producer: ProducerConfig,
    pub reporter: ReporterConfig,
    pub simulator: SimulatorConfig,
}

/// Loads configuration from a TOML file layered with `EXSUM_`-prefixed environment variables.
pub fn load_config(config_file_path: &Path) -> Result<Config, Error> {
    if !config_file_path.exists() {
        return Err(Error::ConfigLoadError(format!(
            "Configuration file not found at path: {}",
            config_file_path.display()
        )));
    }

    let s = ConfigLoader::builder()
        .add_source(File::from(config_file_path).required(true))
        .add_source(
            Environment::with_prefix("EXSUM")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .map_err(|e| Error::ConfigLoadError(e.to_string()))?;

    let app_config: Config = s
        .try_deserialize()
        .map_err(|e| Error::ConfigLoadError(format!("Failed to deserialize config: {}", e)))?;

    if app_config.producer.batch_size == 0 || app_config.simulator.batch_size == 0 {
        return Err(Error::ConfigLoadError(
            "batch_size must be greater than zero".to_string(),
        ));
    }
    if app_config.executor.buffer_size == 0 {
        return Err(Error::ConfigLoadError(
            "buffer_size must be greater than zero".to_string(),
        ));
    }

    if !(0..=MAX_DECIMAL_EXPONENT).contains(&app_config.simulator.max_decimal_exponent) {
        return Err(Error::ConfigLoadError(format!(
            "max_decimal_exponent must be within 0..={}, got {}",
            MAX_DECIMAL_EXPONENT, app_config.simulator.max_decimal_exponent
        )));
    }

    Ok(app_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const MOCK_CONFIG: &str = "\
[executor]
buffer_size = 8
precision_bits = 53

[producer]
batch_size = 16

[reporter]
interval_ms = 100

[simulator]
batch_size = 4
batches = 2
interval_ms = 1
max_decimal_exponent = 10
seed = 7
";

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write mock config");
        file
    }

    #[test]
    fn test_load_config_success() {
        let file = write_config(MOCK_CONFIG);
        let config = load_config(file.path()).expect("config should load");

        assert_eq!(config.executor.buffer_size, 8);
        assert_eq!(config.producer.batch_size, 16);
        assert_eq!(config.simulator.seed, Some(7));
        assert_eq!(config.executor.precision().unwrap(), Precision::DOUBLE);
    }

    #[test]
    fn test_missing_precision_means_exact() {
        let file = write_config(&MOCK_CONFIG.replace("precision_bits = 53\n", ""));
        let config = load_config(file.path()).expect("config should load");
        assert_eq!(config.executor.precision().unwrap(), Precision::Exact);
    }

    #[test]
    fn test_zero_precision_is_rejected() {
        let file = write_config(&MOCK_CONFIG.replace("precision_bits = 53", "precision_bits = 0"));
        let config = load_config(file.path()).expect("config should load");
        assert!(matches!(
            config.executor.precision(),
            Err(Error::NumericError(_))
        ));
    }

    #[test]
    fn test_zero_batch_size_is_rejected() {
        let file = write_config(&MOCK_CONFIG.replace("batch_size = 16", "batch_size = 0"));
        assert!(matches!(
            load_config(file.path()),
            Err(Error::ConfigLoadError(_))
        ));
    }

    #[test]
    fn test_overflowing_exponent_is_rejected() {
        for exponent in ["400", "-1", "-2147483648"] {
            let file = write_config(&MOCK_CONFIG.replace(
                "max_decimal_exponent = 10",
                &format!("max_decimal_exponent = {}", exponent),
            ));
            assert!(
                matches!(load_config(file.path()), Err(Error::ConfigLoadError(_))),
                "exponent {} should be rejected",
                exponent
            );
        }

        let file = write_config(&MOCK_CONFIG.replace(
            "max_decimal_exponent = 10",
            "max_decimal_exponent = 300",
        ));
        assert!(load_config(file.path()).is_ok());
    }

    #[test]
    fn test_missing_file() {
        let result = load_config(Path::new("does/not/exist.toml"));
        assert!(matches!(result, Err(Error::ConfigLoadError(_))));
    }

    #[test]
    fn test_shipped_config_parses() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("Config.toml");
        let config = load_config(&path).expect("shipped Config.toml should load");
        assert_eq!(config.executor.precision().unwrap(), Precision::Exact);
    }
}
