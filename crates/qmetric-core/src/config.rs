//! qmetric configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Top-level qmetric configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QmetricConfig {
    /// Output directory for evaluation reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Report formats written by `evaluate` (json, html, md).
    #[serde(default = "default_formats")]
    pub formats: Vec<String>,
    /// Final-score drop, in points, that `compare` flags as a regression.
    #[serde(default = "default_threshold")]
    pub regression_threshold: f64,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./qmetric-results")
}
fn default_formats() -> Vec<String> {
    vec!["json".to_string()]
}
fn default_threshold() -> f64 {
    1.0
}

impl Default for QmetricConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            formats: default_formats(),
            regression_threshold: default_threshold(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are not scanned again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + end];
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `qmetric.toml` in the current directory
/// 2. `~/.config/qmetric/config.toml`
///
/// Environment variable override: `QMETRIC_OUTPUT_DIR`.
pub fn load_config() -> Result<QmetricConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QmetricConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("qmetric.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QmetricConfig::default(),
    };

    if let Ok(dir) = std::env::var("QMETRIC_OUTPUT_DIR") {
        config.output_dir = PathBuf::from(dir);
    }

    Ok(config)
}

/// Parse a config document and expand `${VAR}` references in paths.
pub fn parse_config(content: &str) -> Result<QmetricConfig> {
    let mut config: QmetricConfig = toml::from_str(content)?;
    config.output_dir = PathBuf::from(resolve_env_vars(&config.output_dir.to_string_lossy()));
    anyhow::ensure!(
        config.regression_threshold >= 0.0,
        "regression_threshold must not be negative"
    );
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("qmetric"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_QMETRIC_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_QMETRIC_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_QMETRIC_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("unterminated ${oops"), "unterminated ${oops");
        std::env::remove_var("_QMETRIC_TEST_VAR");
    }

    #[test]
    fn resolve_env_vars_does_not_rescan_values() {
        std::env::set_var("_QMETRIC_SELF_REF", "${_QMETRIC_SELF_REF}");
        assert_eq!(
            resolve_env_vars("${_QMETRIC_SELF_REF}/out"),
            "${_QMETRIC_SELF_REF}/out"
        );
        std::env::set_var("_QMETRIC_NESTED", "${HOME}");
        assert_eq!(resolve_env_vars("a/${_QMETRIC_NESTED}/b"), "a/${HOME}/b");
        std::env::remove_var("_QMETRIC_SELF_REF");
        std::env::remove_var("_QMETRIC_NESTED");
    }

    #[test]
    fn self_referencing_output_dir_parses() {
        std::env::set_var("_QMETRIC_LOOP_DIR", "${_QMETRIC_LOOP_DIR}");
        let config = parse_config("output_dir = \"${_QMETRIC_LOOP_DIR}/results\"").unwrap();
        assert_eq!(
            config.output_dir,
            PathBuf::from("${_QMETRIC_LOOP_DIR}/results")
        );
        std::env::remove_var("_QMETRIC_LOOP_DIR");
    }

    #[test]
    fn default_config() {
        let config = QmetricConfig::default();
        assert_eq!(config.output_dir, PathBuf::from("./qmetric-results"));
        assert_eq!(config.formats, vec!["json"]);
        assert_eq!(config.regression_threshold, 1.0);
    }

    #[test]
    fn parse_partial_config() {
        let config = parse_config(
            r#"
formats = ["json", "html"]
regression_threshold = 2.5
"#,
        )
        .unwrap();
        assert_eq!(config.formats, vec!["json", "html"]);
        assert_eq!(config.regression_threshold, 2.5);
        assert_eq!(config.output_dir, default_output_dir());
    }

    #[test]
    fn negative_threshold_rejected() {
        assert!(parse_config("regression_threshold = -1.0").is_err());
    }

    #[test]
    fn explicit_missing_path_is_error() {
        let err = load_config_from(Some(Path::new("/nonexistent/qmetric.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn explicit_path_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qmetric.toml");
        std::fs::write(&path, "formats = [\"md\"]\n").unwrap();
        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.formats, vec!["md"]);
    }
}
