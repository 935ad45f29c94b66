use crate::config::credentials::{TokenSource, DEFAULT_TOKEN_ENV};
use crate::core::executor::DEFAULT_BASE_URL;
use crate::core::rules::Expectations;
use crate::core::suite::SuiteCase;
use crate::core::ConfigProvider;
use crate::utils::error::{HarnessError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteConfig {
    pub suite: SuiteInfo,
    pub auth: Option<AuthConfig>,
    #[serde(default)]
    pub expectations: Expectations,
    #[serde(default)]
    pub cases: Vec<SuiteCase>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteInfo {
    pub name: String,
    pub description: Option<String>,
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub token: Option<String>,
    pub token_env: Option<String>,
}

impl SuiteConfig {
    /// 從 TOML 檔案載入套件配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(HarnessError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析套件配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| HarnessError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${HEALTHAPP_AUTH_TOKEN})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| HarnessError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn base_url(&self) -> &str {
        self.suite.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// 決定 token 來源：明確的 token 優先，其次是環境變數
    pub fn token_source(&self) -> TokenSource {
        let auth = self.auth.as_ref();

        match auth.and_then(|a| a.token.clone()) {
            Some(token) => TokenSource::Static(token),
            None => TokenSource::Env(
                auth.and_then(|a| a.token_env.clone())
                    .unwrap_or_else(|| DEFAULT_TOKEN_ENV.to_string()),
            ),
        }
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("suite.name", &self.suite.name)?;
        validation::validate_url("suite.base_url", self.base_url())?;

        if let Some(token) = self.auth.as_ref().and_then(|a| a.token.as_deref()) {
            if token.contains("${") {
                return Err(HarnessError::InvalidConfigValueError {
                    field: "auth.token".to_string(),
                    value: token.to_string(),
                    reason: "Referenced environment variable is not set".to_string(),
                });
            }
        }

        validation::validate_date_range(
            "expectations",
            &self.expectations.date_from,
            &self.expectations.date_to,
        )?;

        if self.cases.is_empty() {
            return Err(HarnessError::MissingConfigError {
                field: "cases".to_string(),
            });
        }

        for (index, case) in self.cases.iter().enumerate() {
            validation::validate_path(&format!("cases[{}].endpoint", index), &case.endpoint)?;
        }

        Ok(())
    }
}

impl ConfigProvider for SuiteConfig {
    fn base_url(&self) -> &str {
        self.base_url()
    }
}

impl Validate for SuiteConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
