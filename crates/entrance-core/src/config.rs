//! Configuration loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Exam rules. Defaults: 20 minutes, pass at 3.0, -0.1 per wrong answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamPolicy {
    /// Time allowed for one attempt.
    #[serde(default = "default_duration_minutes")]
    pub duration_minutes: u32,
    /// Minimum mark that counts as a pass.
    #[serde(default = "default_pass_threshold")]
    pub pass_threshold: f64,
    /// Fraction of a question's marks deducted for a wrong answer (0 disables).
    #[serde(default = "default_negative_marking")]
    pub negative_marking: f64,
}

impl ExamPolicy {
    pub fn duration(&self) -> Duration {
        Duration::minutes(i64::from(self.duration_minutes))
    }
}

impl Default for ExamPolicy {
    fn default() -> Self {
        Self {
            duration_minutes: default_duration_minutes(),
            pass_threshold: default_pass_threshold(),
            negative_marking: default_negative_marking(),
        }
    }
}

fn default_duration_minutes() -> u32 {
    20
}
fn default_pass_threshold() -> f64 {
    3.0
}
fn default_negative_marking() -> f64 {
    0.1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Rows per page when listing rankings.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

fn default_page_size() -> usize {
    10
}

/// Top-level entrance configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntranceConfig {
    /// Student record file.
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
    /// Append log lines here instead of stderr.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
    /// Directory for exports, backups, and reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub exam: ExamPolicy,
    #[serde(default)]
    pub ranking: RankingConfig,
}

fn default_data_file() -> PathBuf {
    PathBuf::from("data/student.dat")
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("entrance-output")
}

impl Default for EntranceConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            log_file: None,
            output_dir: default_output_dir(),
            exam: ExamPolicy::default(),
            ranking: RankingConfig::default(),
        }
    }
}

impl EntranceConfig {
    /// Reject settings the exam engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.exam.duration_minutes >= 1,
            "exam.duration_minutes must be at least 1"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.exam.negative_marking),
            "exam.negative_marking must be between 0.0 and 1.0"
        );
        anyhow::ensure!(
            self.exam.pass_threshold.is_finite(),
            "exam.pass_threshold must be a number"
        );
        anyhow::ensure!(self.ranking.page_size >= 1, "ranking.page_size must be at least 1");
        Ok(())
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        let Some(end) = result[start..].find('}') else {
            break;
        };
        let var_name = &result[start + 2..start + end];
        let value = std::env::var(var_name).unwrap_or_default();
        result = format!("{}{}{}", &result[..start], value, &result[start + end + 1..]);
    }
    result
}

fn resolve_path(p: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&p.to_string_lossy()))
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `entrance.toml` in the current directory
/// 2. `~/.config/entrance/config.toml`
///
/// Environment variable overrides: `ENTRANCE_DATA_FILE`, `ENTRANCE_LOG_FILE`.
pub fn load_config() -> Result<EntranceConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<EntranceConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("entrance.toml");
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|home| home.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            tracing::debug!("loaded config from {}", path.display());
            toml::from_str::<EntranceConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => EntranceConfig::default(),
    };

    if let Ok(data_file) = std::env::var("ENTRANCE_DATA_FILE") {
        config.data_file = PathBuf::from(data_file);
    }
    if let Ok(log_file) = std::env::var("ENTRANCE_LOG_FILE") {
        config.log_file = Some(PathBuf::from(log_file));
    }

    config.data_file = resolve_path(&config.data_file);
    config.output_dir = resolve_path(&config.output_dir);
    config.log_file = config.log_file.as_deref().map(resolve_path);

    config.validate()?;
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("entrance"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_ENTRANCE_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_ENTRANCE_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_ENTRANCE_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("unterminated ${oops"), "unterminated ${oops");
        std::env::remove_var("_ENTRANCE_TEST_VAR");
    }

    #[test]
    fn default_config() {
        let config = EntranceConfig::default();
        assert_eq!(config.data_file, PathBuf::from("data/student.dat"));
        assert_eq!(config.exam.duration_minutes, 20);
        assert_eq!(config.exam.pass_threshold, 3.0);
        assert_eq!(config.exam.negative_marking, 0.1);
        assert_eq!(config.ranking.page_size, 10);
        assert_eq!(config.exam.duration(), Duration::minutes(20));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_partial_config() {
        let toml_str = r#"
data_file = "/srv/entrance/student.dat"

[exam]
duration_minutes = 30
negative_marking = 0.0
"#;
        let config: EntranceConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.data_file, PathBuf::from("/srv/entrance/student.dat"));
        assert_eq!(config.exam.duration_minutes, 30);
        assert_eq!(config.exam.negative_marking, 0.0);
        assert_eq!(config.exam.pass_threshold, 3.0);
        assert_eq!(config.ranking.page_size, 10);
    }

    #[test]
    fn load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("entrance.toml");
        std::fs::write(&path, "output_dir = \"out\"\n[ranking]\npage_size = 25\n").unwrap();
        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.ranking.page_size, 25);
        assert_eq!(config.output_dir, PathBuf::from("out"));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = load_config_from(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut config = EntranceConfig::default();
        config.exam.negative_marking = 2.0;
        assert!(config.validate().is_err());
        let mut config = EntranceConfig::default();
        config.ranking.page_size = 0;
        assert!(config.validate().is_err());
    }
}
