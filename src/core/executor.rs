use crate::core::operation::Operation;
use crate::core::{
    ConfigProvider, CredentialProvider, Payload, PayloadShape, RequestBody, ResponseEnvelope,
};
use crate::utils::error::Result;
use crate::utils::json_path::{as_text, lookup, lookup_non_null};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde_json::Value;

pub const DEFAULT_BASE_URL: &str = "https://healthapp.yaksha.com/api";

/// 以固定標頭發送 GET 請求並建立回應信封
pub struct RequestExecutor<K: CredentialProvider> {
    base_url: String,
    credentials: K,
    client: Client,
}

impl<K: CredentialProvider> RequestExecutor<K> {
    pub fn new(base_url: impl Into<String>, credentials: K) -> Self {
        Self {
            base_url: base_url.into(),
            credentials,
            client: Client::new(),
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C, credentials: K) -> Self {
        Self::new(config.base_url(), credentials)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 依操作的 payload 路徑與形狀呼叫 API
    pub async fn call(
        &self,
        operation: Operation,
        endpoint: &str,
        body: Option<&RequestBody>,
    ) -> Result<ResponseEnvelope> {
        tracing::debug!("📡 {}: GET {}", operation, endpoint);
        self.get(
            endpoint,
            body,
            operation.payload_path(),
            operation.payload_shape(),
        )
        .await
    }

    /// 執行一次 GET；傳輸錯誤直接回傳，非 2xx 狀態碼只記錄在信封中
    pub async fn get(
        &self,
        endpoint: &str,
        body: Option<&RequestBody>,
        payload_path: &str,
        shape: PayloadShape,
    ) -> Result<ResponseEnvelope> {
        let url = format!("{}{}", self.base_url, endpoint);
        let auth_header = self.credentials.auth_header().await?;

        let mut request = self
            .client
            .get(&url)
            .header(AUTHORIZATION, auth_header)
            .header(CONTENT_TYPE, "application/json");

        // 只有提供 body 時才附加
        if let Some(body) = body {
            request = match body {
                RequestBody::Json(value) => request.body(serde_json::to_vec(value)?),
                RequestBody::Raw(text) => request.body(text.clone()),
            };
        }

        tracing::debug!("📡 Making API request to: {}", url);
        let response = request.send().await?;
        let status_code = response.status().as_u16();
        tracing::debug!("📡 API response status: {}", response.status());

        let raw_body = response.text().await?;
        Ok(build_envelope(status_code, raw_body, payload_path, shape))
    }
}

/// 從原始回應建立信封；欄位缺失時 payload 為 `Absent`，不視為錯誤
pub fn build_envelope(
    status_code: u16,
    raw_body: String,
    payload_path: &str,
    shape: PayloadShape,
) -> ResponseEnvelope {
    let body: Value = serde_json::from_str(&raw_body).unwrap_or_else(|e| {
        tracing::warn!("⚠️ Response body is not valid JSON: {}", e);
        Value::Null
    });

    let domain_status = lookup_non_null(&body, "Status").map(as_text);
    let payload = Payload::from_value(lookup(&body, payload_path), shape);

    if payload.is_absent() {
        tracing::debug!(
            "📭 Payload path '{}' did not resolve to a {:?} value",
            payload_path,
            shape
        );
    }

    ResponseEnvelope {
        raw_body,
        body,
        status_code,
        domain_status,
        payload,
    }
}
