use crate::config::validate_provider;
use crate::core::client::{KeywordEndpoint, KeywordQuery, DEFAULT_API_BASE};
use crate::core::{ConfigProvider, Storage};
use crate::utils::error::Result;
use crate::utils::validation::{validate_required_field, Validate};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Parser)]
#[command(name = "keyword-etl")]
#[command(about = "Fetch DataForSEO keyword data and normalize it into fixed-shape records")]
pub struct CliConfig {
    #[arg(long, default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    #[arg(long, env = "DATAFORSEO_LOGIN")]
    pub login: Option<String>,

    #[arg(long, env = "DATAFORSEO_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    #[arg(long, value_enum, default_value_t = KeywordEndpoint::KeywordSuggestions)]
    pub endpoint: KeywordEndpoint,

    #[arg(long, value_delimiter = ',')]
    pub keywords: Vec<String>,

    #[arg(long, help = "Domain to analyse with the keywords-for-site endpoint")]
    pub target: Option<String>,

    #[arg(long, default_value = "2840")]
    pub location_code: u32,

    #[arg(long, default_value = "en")]
    pub language_code: String,

    #[arg(long, default_value = "100")]
    pub limit: u32,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, default_value = "30")]
    pub timeout_seconds: u64,

    #[arg(long, help = "Collect items from every task, not only the first")]
    pub all_tasks: bool,

    #[arg(long, help = "Read settings from a TOML file instead of flags")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

impl ConfigProvider for CliConfig {
    fn api_base(&self) -> &str {
        &self.api_base
    }

    fn login(&self) -> &str {
        self.login.as_deref().unwrap_or_default()
    }

    fn password(&self) -> &str {
        self.password.as_deref().unwrap_or_default()
    }

    fn endpoint(&self) -> KeywordEndpoint {
        self.endpoint
    }

    fn query(&self) -> KeywordQuery {
        KeywordQuery {
            keywords: self
                .keywords
                .iter()
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty())
                .collect(),
            target: self.target.clone(),
            location_code: self.location_code,
            language_code: self.language_code.clone(),
            limit: self.limit,
        }
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }

    fn all_tasks(&self) -> bool {
        self.all_tasks
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_required_field("login", &self.login)?;
        validate_required_field("password", &self.password)?;
        validate_provider(self)
    }
}

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = Path::new(&self.base_path).join(path);
        let data = fs::read(full_path)?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = Path::new(&self.base_path).join(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(full_path, data)?;
        Ok(())
    }
}
