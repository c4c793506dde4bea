#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use toml_config::TomlConfig;

use crate::core::ConfigProvider;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{
    validate_non_empty_list, validate_non_empty_string, validate_path, validate_range,
    validate_url,
};

/// Checks shared by every configuration source.
pub fn validate_provider<C: ConfigProvider>(config: &C) -> Result<()> {
    validate_url("api_base", config.api_base())?;

    for (field, value) in [("login", config.login()), ("password", config.password())] {
        if value.trim().is_empty() {
            return Err(EtlError::MissingConfigError {
                field: field.to_string(),
            });
        }
    }

    validate_path("output_path", config.output_path())?;
    validate_range("timeout_seconds", config.timeout_seconds(), 1, 600)?;

    let endpoint = config.endpoint();
    let query = config.query();
    if endpoint.needs_target() {
        match query.target.as_deref() {
            Some(target) => validate_non_empty_string("target", target)?,
            None => {
                return Err(EtlError::MissingConfigError {
                    field: "target".to_string(),
                })
            }
        }
    } else {
        validate_non_empty_list("keywords", &query.keywords)?;
    }

    validate_non_empty_string("language_code", &query.language_code)?;
    validate_range("limit", query.limit, 1, 1000)?;
    Ok(())
}
