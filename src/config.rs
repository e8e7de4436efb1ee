//! Configuration for autocoder, read from `.autocoder/autocoder.toml`.
//!
//! Settings are layered file → environment → CLI.
//!
//! # Configuration File Format
//!
//! ```toml
//! [model]
//! name = "gemini-1.5-flash"
//! api_key_env = "GEMINI_API_KEY"
//! base_url = "https://generativelanguage.googleapis.com/v1beta"
//! temperature = 0.8
//! max_output_tokens = 8192
//! timeout_secs = 120
//!
//! [pipeline]
//! error_reset_delay_secs = 5
//!
//! [deploy]
//! provider = "cloudflare-pages"
//! output_dir = "dist"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::llm::CompletionOptions;

pub const CONFIG_DIR: &str = ".autocoder";
pub const CONFIG_FILE: &str = "autocoder.toml";

/// Where packaged projects claim to be hosted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeployProvider {
    #[default]
    CloudflarePages,
    CloudflareWorkers,
    Static,
}

impl std::fmt::Display for DeployProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeployProvider::CloudflarePages => write!(f, "cloudflare-pages"),
            DeployProvider::CloudflareWorkers => write!(f, "cloudflare-workers"),
            DeployProvider::Static => write!(f, "static"),
        }
    }
}

impl std::str::FromStr for DeployProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "cloudflare-pages" | "pages" => Ok(DeployProvider::CloudflarePages),
            "cloudflare-workers" | "workers" => Ok(DeployProvider::CloudflareWorkers),
            "static" => Ok(DeployProvider::Static),
            _ => anyhow::bail!(
                "Invalid deploy provider '{}': expected cloudflare-pages, cloudflare-workers or static",
                s
            ),
        }
    }
}

/// Hosted model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSection {
    #[serde(default = "default_model_name")]
    pub name: String,
    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_model_name() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_temperature() -> f32 {
    0.8
}

fn default_max_output_tokens() -> u32 {
    8192
}

fn default_timeout_secs() -> u64 {
    120
}

impl Default for ModelSection {
    fn default() -> Self {
        Self {
            name: default_model_name(),
            api_key_env: default_api_key_env(),
            base_url: default_base_url(),
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSection {
    /// Seconds an errored interactive session waits before accepting a new idea
    #[serde(default = "default_error_reset_delay_secs")]
    pub error_reset_delay_secs: u64,
}

fn default_error_reset_delay_secs() -> u64 {
    5
}

impl Default for PipelineSection {
    fn default() -> Self {
        Self {
            error_reset_delay_secs: default_error_reset_delay_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploySection {
    #[serde(default)]
    pub provider: DeployProvider,
    /// Packaged projects are written below this directory
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("dist")
}

impl Default for DeploySection {
    fn default() -> Self {
        Self {
            provider: DeployProvider::default(),
            output_dir: default_output_dir(),
        }
    }
}

/// The complete autocoder.toml structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AutocoderToml {
    #[serde(default)]
    pub model: ModelSection,
    #[serde(default)]
    pub pipeline: PipelineSection,
    #[serde(default)]
    pub deploy: DeploySection,
}

impl AutocoderToml {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse autocoder.toml")
    }

    /// Load `<config_dir>/autocoder.toml`, or defaults when it does not exist.
    pub fn load_or_default(config_dir: &Path) -> Result<Self> {
        let config_path = config_dir.join(CONFIG_FILE);
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            toml::to_string_pretty(self).context("Failed to serialize autocoder.toml")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Validate the configuration and return any warnings.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.model.name.trim().is_empty() {
            warnings.push("[model] name is empty".to_string());
        }
        if !(0.0..=2.0).contains(&self.model.temperature) {
            warnings.push(format!(
                "[model] temperature {} is outside 0.0-2.0",
                self.model.temperature
            ));
        }
        if self.model.max_output_tokens == 0 {
            warnings.push("[model] max_output_tokens must be greater than 0".to_string());
        }
        if self.model.timeout_secs == 0 {
            warnings.push("[model] timeout_secs of 0 disables the request timeout".to_string());
        }
        if !self.model.base_url.starts_with("http://") && !self.model.base_url.starts_with("https://")
        {
            warnings.push(format!(
                "[model] base_url '{}' should start with http:// or https://",
                self.model.base_url
            ));
        }
        if self.deploy.output_dir.as_os_str().is_empty() {
            warnings.push("[deploy] output_dir is empty".to_string());
        }

        warnings
    }
}

/// Effective configuration: autocoder.toml merged with environment and CLI.
#[derive(Debug, Clone)]
pub struct AutocoderConfig {
    pub project_dir: PathBuf,
    pub config_dir: PathBuf,
    pub toml: AutocoderToml,
    /// CLI override: never call the hosted model
    pub offline: bool,
    pub cli_model: Option<String>,
    pub cli_output_dir: Option<PathBuf>,
}

impl AutocoderConfig {
    pub fn new(project_dir: PathBuf) -> Result<Self> {
        let project_dir = project_dir
            .canonicalize()
            .context("Failed to resolve project directory")?;
        let config_dir = project_dir.join(CONFIG_DIR);
        let toml = AutocoderToml::load_or_default(&config_dir)?;

        Ok(Self {
            project_dir,
            config_dir,
            toml,
            offline: false,
            cli_model: None,
            cli_output_dir: None,
        })
    }

    pub fn with_cli_args(
        project_dir: PathBuf,
        offline: bool,
        model: Option<String>,
        output_dir: Option<PathBuf>,
    ) -> Result<Self> {
        let mut config = Self::new(project_dir)?;
        config.offline = offline;
        config.cli_model = model;
        config.cli_output_dir = output_dir;
        Ok(config)
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE)
    }

    /// Model name (CLI → AUTOCODER_MODEL → file).
    pub fn model_name(&self) -> String {
        self.cli_model
            .clone()
            .or_else(|| non_empty_env("AUTOCODER_MODEL"))
            .unwrap_or_else(|| self.toml.model.name.clone())
    }

    /// API key from the configured environment variable.
    pub fn api_key(&self) -> Option<String> {
        non_empty_env(&self.toml.model.api_key_env)
    }

    /// Output root (CLI → AUTOCODER_OUTPUT_DIR → file), relative paths resolved
    /// against the project directory.
    pub fn output_dir(&self) -> PathBuf {
        let dir = self
            .cli_output_dir
            .clone()
            .or_else(|| non_empty_env("AUTOCODER_OUTPUT_DIR").map(PathBuf::from))
            .unwrap_or_else(|| self.toml.deploy.output_dir.clone());
        if dir.is_absolute() {
            dir
        } else {
            self.project_dir.join(dir)
        }
    }

    pub fn provider(&self) -> DeployProvider {
        self.toml.deploy.provider
    }

    pub fn completion_options(&self) -> CompletionOptions {
        CompletionOptions {
            temperature: self.toml.model.temperature,
            max_output_tokens: self.toml.model.max_output_tokens,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.toml.model.timeout_secs)
    }

    pub fn error_reset_delay(&self) -> Duration {
        Duration::from_secs(self.toml.pipeline.error_reset_delay_secs)
    }

    pub fn validate(&self) -> Vec<String> {
        self.toml.validate()
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::tempdir;

    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn test_defaults() {
        let toml = AutocoderToml::default();
        assert_eq!(toml.model.name, "gemini-1.5-flash");
        assert_eq!(toml.model.api_key_env, "GEMINI_API_KEY");
        assert_eq!(toml.model.temperature, 0.8);
        assert_eq!(toml.model.max_output_tokens, 8192);
        assert_eq!(toml.pipeline.error_reset_delay_secs, 5);
        assert_eq!(toml.deploy.provider, DeployProvider::CloudflarePages);
        assert_eq!(toml.deploy.output_dir, PathBuf::from("dist"));
    }

    #[test]
    fn test_parse_partial_file_keeps_defaults() {
        let toml = AutocoderToml::parse(
            r#"
[model]
name = "gemini-1.5-pro"

[deploy]
provider = "static"
"#,
        )
        .unwrap();
        assert_eq!(toml.model.name, "gemini-1.5-pro");
        assert_eq!(toml.model.max_output_tokens, 8192);
        assert_eq!(toml.deploy.provider, DeployProvider::Static);
        assert_eq!(toml.pipeline.error_reset_delay_secs, 5);
    }

    #[test]
    fn test_parse_empty_file() {
        let toml = AutocoderToml::parse("").unwrap();
        assert_eq!(toml.model.name, "gemini-1.5-flash");
    }

    #[test]
    fn test_parse_invalid_provider_fails() {
        let result = AutocoderToml::parse("[deploy]\nprovider = \"heroku\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_provider_from_str() {
        assert_eq!(
            "Cloudflare-Pages".parse::<DeployProvider>().unwrap(),
            DeployProvider::CloudflarePages
        );
        assert_eq!(
            "workers".parse::<DeployProvider>().unwrap(),
            DeployProvider::CloudflareWorkers
        );
        let err = "ftp".parse::<DeployProvider>().unwrap_err();
        assert!(err.to_string().contains("Invalid deploy provider"));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        let mut toml = AutocoderToml::default();
        toml.model.temperature = 0.5;
        toml.deploy.provider = DeployProvider::CloudflareWorkers;
        toml.save(&path).unwrap();

        let loaded = AutocoderToml::load(&path).unwrap();
        assert_eq!(loaded.model.temperature, 0.5);
        assert_eq!(loaded.deploy.provider, DeployProvider::CloudflareWorkers);
    }

    #[test]
    fn test_load_or_default_without_file() {
        let dir = tempdir().unwrap();
        let toml = AutocoderToml::load_or_default(dir.path()).unwrap();
        assert_eq!(toml.model.name, "gemini-1.5-flash");
    }

    #[test]
    fn test_validate_default_has_no_warnings() {
        assert!(AutocoderToml::default().validate().is_empty());
    }

    #[test]
    fn test_validate_reports_bad_values() {
        let mut toml = AutocoderToml::default();
        toml.model.temperature = 3.5;
        toml.model.max_output_tokens = 0;
        toml.model.base_url = "generativelanguage.googleapis.com".to_string();
        let warnings = toml.validate();
        assert_eq!(warnings.len(), 3);
        assert!(warnings.iter().any(|w| w.contains("temperature")));
        assert!(warnings.iter().any(|w| w.contains("max_output_tokens")));
        assert!(warnings.iter().any(|w| w.contains("base_url")));
    }

    #[test]
    fn test_config_reads_file_from_project_dir() {
        let dir = tempdir().unwrap();
        let config_dir = dir.path().join(CONFIG_DIR);
        std::fs::create_dir_all(&config_dir).unwrap();
        std::fs::write(
            config_dir.join(CONFIG_FILE),
            "[pipeline]\nerror_reset_delay_secs = 1\n",
        )
        .unwrap();

        let config = AutocoderConfig::new(dir.path().to_path_buf()).unwrap();
        assert_eq!(config.error_reset_delay(), Duration::from_secs(1));
        assert_eq!(config.completion_options().max_output_tokens, 8192);
    }

    #[test]
    fn test_cli_overrides_env_and_file() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let dir = tempdir().unwrap();
        unsafe { std::env::set_var("AUTOCODER_MODEL", "gemini-from-env") };

        let config = AutocoderConfig::with_cli_args(
            dir.path().to_path_buf(),
            true,
            Some("gemini-from-cli".to_string()),
            None,
        )
        .unwrap();
        assert_eq!(config.model_name(), "gemini-from-cli");
        assert!(config.offline);

        let config = AutocoderConfig::new(dir.path().to_path_buf()).unwrap();
        assert_eq!(config.model_name(), "gemini-from-env");

        unsafe { std::env::remove_var("AUTOCODER_MODEL") };
        assert_eq!(config.model_name(), "gemini-1.5-flash");
    }

    #[test]
    fn test_output_dir_resolution() {
        let _guard = ENV_MUTEX.lock().unwrap();
        unsafe { std::env::remove_var("AUTOCODER_OUTPUT_DIR") };
        let dir = tempdir().unwrap();

        let config = AutocoderConfig::new(dir.path().to_path_buf()).unwrap();
        assert_eq!(config.output_dir(), config.project_dir.join("dist"));

        let absolute = dir.path().join("elsewhere");
        let config = AutocoderConfig::with_cli_args(
            dir.path().to_path_buf(),
            false,
            None,
            Some(absolute.clone()),
        )
        .unwrap();
        assert_eq!(config.output_dir(), absolute);
    }

    #[test]
    fn test_api_key_from_configured_variable() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let dir = tempdir().unwrap();
        let mut config = AutocoderConfig::new(dir.path().to_path_buf()).unwrap();
        config.toml.model.api_key_env = "AUTOCODER_TEST_KEY".to_string();

        unsafe { std::env::remove_var("AUTOCODER_TEST_KEY") };
        assert_eq!(config.api_key(), None);

        unsafe { std::env::set_var("AUTOCODER_TEST_KEY", "secret") };
        assert_eq!(config.api_key(), Some("secret".to_string()));
        unsafe { std::env::remove_var("AUTOCODER_TEST_KEY") };
    }
}
