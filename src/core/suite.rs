use crate::core::executor::RequestExecutor;
use crate::core::operation::Operation;
use crate::core::validator::{FieldValidator, ValidationReport};
use crate::core::{CredentialProvider, RequestBody};
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// 套件中的單一案例
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuiteCase {
    pub name: Option<String>,
    pub operation: Operation,
    pub endpoint: String,
    pub body: Option<serde_json::Value>,
    pub raw_body: Option<String>,
    pub expected_status: Option<u16>,
}

impl SuiteCase {
    pub fn new(operation: Operation, endpoint: impl Into<String>) -> Self {
        Self {
            name: None,
            operation,
            endpoint: endpoint.into(),
            body: None,
            raw_body: None,
            expected_status: None,
        }
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_raw_body(mut self, raw_body: impl Into<String>) -> Self {
        self.raw_body = Some(raw_body.into());
        self
    }

    pub fn expecting_status(mut self, status: u16) -> Self {
        self.expected_status = Some(status);
        self
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(self.operation.name())
    }

    /// JSON body 優先於 raw body
    pub fn request_body(&self) -> Option<RequestBody> {
        match (&self.body, &self.raw_body) {
            (Some(value), _) => Some(RequestBody::Json(value.clone())),
            (None, Some(text)) => Some(RequestBody::Raw(text.clone())),
            (None, None) => None,
        }
    }
}

/// 案例執行結果
#[derive(Debug, Clone)]
pub struct CaseOutcome {
    pub case_name: String,
    pub operation: Operation,
    pub status_code: u16,
    pub expected_status: Option<u16>,
    pub report: ValidationReport,
    pub duration: Duration,
}

impl CaseOutcome {
    pub fn status_matches(&self) -> bool {
        self.expected_status
            .is_none_or(|expected| expected == self.status_code)
    }

    pub fn passed(&self) -> bool {
        self.status_matches() && self.report.passed()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuiteSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub failed_cases: Vec<String>,
    pub total_duration: Duration,
}

impl SuiteSummary {
    /// 取得執行摘要
    pub fn from_outcomes(outcomes: &[CaseOutcome]) -> Self {
        let failed_cases: Vec<String> = outcomes
            .iter()
            .filter(|outcome| !outcome.passed())
            .map(|outcome| outcome.case_name.clone())
            .collect();

        Self {
            total: outcomes.len(),
            passed: outcomes.len() - failed_cases.len(),
            failed: failed_cases.len(),
            failed_cases,
            total_duration: outcomes.iter().map(|outcome| outcome.duration).sum(),
        }
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

/// 依序執行案例：每次呼叫完成後才進行驗證，再進入下一個案例
pub struct ApiSuite<K: CredentialProvider> {
    name: String,
    executor: RequestExecutor<K>,
    validator: FieldValidator,
    cases: Vec<SuiteCase>,
}

impl<K: CredentialProvider> ApiSuite<K> {
    pub fn new(name: impl Into<String>, executor: RequestExecutor<K>, validator: FieldValidator) -> Self {
        Self {
            name: name.into(),
            executor,
            validator,
            cases: Vec::new(),
        }
    }

    pub fn with_cases(mut self, cases: impl IntoIterator<Item = SuiteCase>) -> Self {
        self.cases.extend(cases);
        self
    }

    /// 只保留指定的操作
    pub fn retain_operations(&mut self, operations: &[Operation]) {
        self.cases.retain(|case| operations.contains(&case.operation));
    }

    pub fn cases(&self) -> &[SuiteCase] {
        &self.cases
    }

    /// 執行所有案例；傳輸錯誤會中止整個套件
    pub async fn run(&self) -> Result<Vec<CaseOutcome>> {
        tracing::info!("🚀 Running suite '{}' ({} cases)", self.name, self.cases.len());

        let mut outcomes = Vec::with_capacity(self.cases.len());

        for case in &self.cases {
            let start_time = Instant::now();
            let body = case.request_body();

            let envelope = match self
                .executor
                .call(case.operation, &case.endpoint, body.as_ref())
                .await
            {
                Ok(envelope) => envelope,
                Err(e) => {
                    tracing::error!("❌ {}: request failed: {}", case.display_name(), e);
                    return Err(e);
                }
            };

            let report = self.validator.validate(case.operation, &envelope);
            let outcome = CaseOutcome {
                case_name: case.display_name().to_string(),
                operation: case.operation,
                status_code: envelope.status_code,
                expected_status: case.expected_status,
                report,
                duration: start_time.elapsed(),
            };

            if !outcome.status_matches() {
                tracing::warn!(
                    "❌ {}: expected HTTP {} but got {}",
                    outcome.case_name,
                    outcome.expected_status.unwrap_or_default(),
                    outcome.status_code
                );
            }

            tracing::info!(
                "{} {} (HTTP {}, duration: {:?})",
                if outcome.passed() { "✅" } else { "❌" },
                outcome.case_name,
                outcome.status_code,
                outcome.duration
            );

            outcomes.push(outcome);
        }

        Ok(outcomes)
    }
}
