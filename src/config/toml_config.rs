use crate::config::validate_provider;
use crate::core::client::{KeywordEndpoint, KeywordQuery, DEFAULT_API_BASE};
use crate::core::ConfigProvider;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub source: SourceConfig,
    #[serde(default)]
    pub query: KeywordQuery,
    pub load: LoadConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    pub login: String,
    pub password: String,
    pub endpoint: KeywordEndpoint,
    pub timeout_seconds: Option<u64>,
    pub all_tasks: Option<bool>,
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DATAFORSEO_LOGIN})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl ConfigProvider for TomlConfig {
    fn api_base(&self) -> &str {
        &self.source.api_base
    }

    fn login(&self) -> &str {
        &self.source.login
    }

    fn password(&self) -> &str {
        &self.source.password
    }

    fn endpoint(&self) -> KeywordEndpoint {
        self.source.endpoint
    }

    fn query(&self) -> KeywordQuery {
        self.query.clone()
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn timeout_seconds(&self) -> u64 {
        self.source.timeout_seconds.unwrap_or(30)
    }

    fn all_tasks(&self) -> bool {
        self.source.all_tasks.unwrap_or(false)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if self.source.login.contains("${") || self.source.password.contains("${") {
            return Err(EtlError::ConfigValidationError {
                field: "source.login".to_string(),
                message: "credential environment variable is not set".to_string(),
            });
        }
        validate_provider(self)
    }
}
