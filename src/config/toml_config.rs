use super::{ShippingConfig, DEFAULT_COUNTRY};
use crate::utils::error::{Result, ShippingError};
use regex::{Captures, Regex};
use std::path::Path;

impl ShippingConfig {
    /// Loads the configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// Parses a TOML document. `${VAR}` references are replaced with the
    /// matching environment variable; unknown variables are left untouched.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = substitute_env_vars(content)?;

        let mut config: Self =
            toml::from_str(&processed_content).map_err(|e| ShippingError::InvalidConfigValueError {
                field: "toml_parsing".to_string(),
                value: String::new(),
                reason: format!("TOML parsing error: {}", e),
            })?;

        // An unresolved `${SHIPPO_API_KEY}` means the key was never provided.
        config.aggregator.api_key = config
            .aggregator
            .api_key
            .filter(|key| !key.trim().is_empty() && !key.starts_with("${"));

        if config.origin.country.trim().is_empty() {
            config.origin.country = DEFAULT_COUNTRY.to_string();
        }

        Ok(config)
    }
}

fn substitute_env_vars(content: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([^}]+)\}")
        .map_err(|e| ShippingError::config(format!("Invalid substitution pattern: {}", e)))?;

    let result = re.replace_all(content, |caps: &Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    });

    Ok(result.to_string())
}
