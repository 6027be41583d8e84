use anyhow::{anyhow, Result};
use ::config::{Config, Environment, File};
use std::path::Path;
use tracing::debug;

use super::runtime::PipelineConfig;

pub const CONFIG_FILE: &str = "lottery.toml";
pub const ENV_PREFIX: &str = "LOTTERY";

/// Defaults, then `lottery.toml` if present, then `LOTTERY__SECTION__KEY` variables.
pub fn load() -> Result<PipelineConfig> {
    load_from(Path::new(CONFIG_FILE), env_source())
}

pub fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

pub fn load_from(file: &Path, env: Environment) -> Result<PipelineConfig> {
    let settings = Config::builder()
        .add_source(Config::try_from(&PipelineConfig::default())?)
        .add_source(File::from(file).required(false))
        .add_source(env)
        .build()?;

    let config: PipelineConfig = settings.try_deserialize()?;
    config
        .validate()
        .map_err(|errors| anyhow!("Invalid configuration: {}", errors.join(", ")))?;

    debug!("Configuration loaded: {:?}", config);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::ClassifierKind;
    use std::collections::HashMap;

    fn no_env() -> Environment {
        env_source().source(Some(HashMap::new()))
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_from(&dir.path().join("absent.toml"), no_env()).unwrap();
        assert_eq!(config.dataset.training_draws, 1000);
        assert_eq!(config.generator.seed, Some(123));
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lottery.toml");
        std::fs::write(
            &path,
            "verbose = true\n\n[dataset]\ntraining_draws = 250\n\n[model]\nclassifier = \"logistic_regression\"\n",
        )
        .unwrap();
        let config = load_from(&path, no_env()).unwrap();
        assert!(config.verbose);
        assert_eq!(config.dataset.training_draws, 250);
        assert_eq!(config.dataset.evaluation_draws, 100);
        assert_eq!(config.model.kind, ClassifierKind::LogisticRegression);
    }

    #[test]
    fn test_environment_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut vars = HashMap::new();
        vars.insert("LOTTERY__REPORT__TOP_N".to_string(), "5".to_string());
        let env = env_source().source(Some(vars));
        let config = load_from(&dir.path().join("absent.toml"), env).unwrap();
        assert_eq!(config.report.top_n, 5);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lottery.toml");
        std::fs::write(&path, "[dataset]\nsuccess_rate = 3.0\n").unwrap();
        let err = load_from(&path, no_env()).unwrap_err();
        assert!(err.to_string().contains("success_rate"));
    }
}
