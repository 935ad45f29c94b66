use crate::core::CredentialProvider;
use crate::utils::error::{HarnessError, Result};
use async_trait::async_trait;
use std::fmt;

pub const DEFAULT_TOKEN_ENV: &str = "HEALTHAPP_AUTH_TOKEN";

/// Authorization 標頭值的來源；值會原樣送出
#[derive(Clone, PartialEq, Eq)]
pub enum TokenSource {
    Static(String),
    Env(String),
}

// 不在日誌中輸出 token 本身
impl fmt::Debug for TokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenSource::Static(_) => f.write_str("TokenSource::Static(<redacted>)"),
            TokenSource::Env(var) => write!(f, "TokenSource::Env({})", var),
        }
    }
}

#[async_trait]
impl CredentialProvider for TokenSource {
    async fn auth_header(&self) -> Result<String> {
        let token = match self {
            TokenSource::Static(token) => token.clone(),
            TokenSource::Env(var) => {
                std::env::var(var).map_err(|_| HarnessError::CredentialError {
                    message: format!("environment variable {} is not set", var),
                })?
            }
        };

        if token.trim().is_empty() {
            return Err(HarnessError::CredentialError {
                message: "authorization token is empty".to_string(),
            });
        }

        Ok(token)
    }
}
