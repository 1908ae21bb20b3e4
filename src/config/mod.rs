//! Configuration loading for GreenLane

mod schema;

pub use schema::{
    Config, EffectiveConfig, DEFAULT_HOST, DEFAULT_LOG_FILTER, DEFAULT_PORT, ENV_HOST, ENV_MODEL,
    ENV_PORT,
};

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = ".greenlanerc.json";

/// Find and load the config file. Searches current directory then parents.
pub fn load_config(work_dir: &Path, custom_path: Option<&Path>) -> Result<Config> {
    let path = if let Some(p) = custom_path {
        let path = if p.is_absolute() {
            p.to_path_buf()
        } else {
            work_dir.join(p)
        };
        if path.exists() {
            Some(path)
        } else {
            anyhow::bail!("Config file not found: {}", path.display());
        }
    } else {
        find_config_in_parents(work_dir)
    };

    match path {
        Some(path) => read_config(&path),
        None => Ok(Config::default()),
    }
}

/// Load config from disk, then apply environment and CLI overrides
pub fn resolve_config(
    work_dir: &Path,
    custom_path: Option<&Path>,
    cli_port: Option<u16>,
    cli_host: Option<String>,
    cli_model: Option<PathBuf>,
) -> Result<EffectiveConfig> {
    resolve_config_with(
        work_dir,
        custom_path,
        cli_port,
        cli_host,
        cli_model,
        |key| std::env::var(key).ok(),
    )
}

/// Same as [`resolve_config`] with an explicit environment lookup
pub fn resolve_config_with<F>(
    work_dir: &Path,
    custom_path: Option<&Path>,
    cli_port: Option<u16>,
    cli_host: Option<String>,
    cli_model: Option<PathBuf>,
    env: F,
) -> Result<EffectiveConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let config = load_config(work_dir, custom_path)?
        .merge_with_env(env)?
        .merge_with_cli(cli_port, cli_host, cli_model);
    Ok(config.effective())
}

fn read_config(config_path: &Path) -> Result<Config> {
    let content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config: {}", config_path.display()))?;
    let config: Config = serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON in config: {}", config_path.display()))?;
    tracing::debug!(path = %config_path.display(), "loaded config");
    Ok(config)
}

/// Search for .greenlanerc.json in directory and its parents
fn find_config_in_parents(mut dir: &Path) -> Option<PathBuf> {
    loop {
        let candidate = dir.join(CONFIG_FILENAME);
        if candidate.exists() {
            return Some(candidate);
        }
        dir = dir.parent()?;
    }
}

/// Default config file contents written by `greenlane init`
pub fn default_config_json(port: Option<u16>, model: Option<&Path>) -> Result<String> {
    let config = Config {
        port: Some(port.unwrap_or(DEFAULT_PORT)),
        host: Some(DEFAULT_HOST.to_string()),
        model: model.map(Path::to_path_buf),
        fallback_to_mock: Some(true),
        log_filter: Some(DEFAULT_LOG_FILTER.to_string()),
    };
    let mut json = serde_json::to_string_pretty(&config)?;
    json.push('\n');
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let effective = Config::default().effective();
        assert_eq!(effective.port, 8765);
        assert_eq!(effective.host, "0.0.0.0");
        assert_eq!(effective.model, None);
        assert_eq!(effective.model_arg(), "");
        assert!(effective.fallback_to_mock);
        assert_eq!(effective.log_filter, DEFAULT_LOG_FILTER);
    }

    #[test]
    fn test_config_found_in_parent() {
        let dir = TempDir::new().unwrap();
        let mut file = fs::File::create(dir.path().join(CONFIG_FILENAME)).unwrap();
        writeln!(file, r#"{{ "port": 9000, "model": "models/llama.pte" }}"#).unwrap();
        let nested = dir.path().join("sub/dir");
        fs::create_dir_all(&nested).unwrap();

        let config = load_config(&nested, None).unwrap();
        assert_eq!(config.port, Some(9000));
        assert_eq!(config.model, Some(PathBuf::from("models/llama.pte")));
    }

    #[test]
    fn test_explicit_missing_config_errors() {
        let dir = TempDir::new().unwrap();
        let err = load_config(dir.path(), Some(Path::new("missing.json"))).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_invalid_json_errors() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ port: ").unwrap();
        let err = load_config(dir.path(), Some(&path)).unwrap_err();
        assert!(err.to_string().contains("Invalid JSON in config"));
    }

    #[test]
    fn test_precedence_cli_over_env_over_file() {
        let file: Config =
            serde_json::from_str(r#"{ "port": 9000, "host": "127.0.0.1" }"#).unwrap();

        let with_env = file
            .clone()
            .merge_with_env(env(&[(ENV_PORT, "9100"), (ENV_MODEL, "env.pte")]))
            .unwrap();
        assert_eq!(with_env.port, Some(9100));
        assert_eq!(with_env.host.as_deref(), Some("127.0.0.1"));

        let effective = with_env
            .merge_with_cli(Some(9200), None, Some(PathBuf::from("cli.pte")))
            .effective();
        assert_eq!(effective.port, 9200);
        assert_eq!(effective.model_arg(), "cli.pte");
        assert_eq!(effective.bind_addr(), "127.0.0.1:9200");
    }

    #[test]
    fn test_invalid_env_port_errors() {
        let err = Config::default()
            .merge_with_env(env(&[(ENV_PORT, "eighty")]))
            .unwrap_err();
        assert!(err.to_string().contains(ENV_PORT));
    }

    #[test]
    fn test_default_config_json_round_trips() {
        let json = default_config_json(Some(9999), None).unwrap();
        let config: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(config.port, Some(9999));
        assert_eq!(config.fallback_to_mock, Some(true));
        assert!(!json.contains("\"model\""));
    }
}
