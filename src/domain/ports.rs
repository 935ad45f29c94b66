use crate::utils::error::Result;
use async_trait::async_trait;

/// 外部憑證提供者：只負責產生目前可用的 Authorization token
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn auth_header(&self) -> Result<String>;
}

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
}
