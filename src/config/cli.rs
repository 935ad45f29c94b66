use crate::config::credentials::{TokenSource, DEFAULT_TOKEN_ENV};
use crate::core::executor::DEFAULT_BASE_URL;
use crate::core::operation::Operation;
use crate::core::rules::Expectations;
use crate::core::suite::SuiteCase;
use crate::core::{ConfigProvider, RequestBody};
use crate::utils::error::{HarnessError, Result};
use crate::utils::validation::{self, Validate};
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "healthapp-api-check")]
#[command(about = "Field checks for the HealthApp REST API")]
pub struct CliConfig {
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run every case of a TOML suite
    Run {
        #[arg(short, long, default_value = "healthapp-suite.toml")]
        config: String,

        /// Only run these operations
        #[arg(long, value_delimiter = ',')]
        only: Vec<String>,
    },

    /// Call one operation and validate its response
    Check(CheckArgs),

    /// Check that a method body calls the required functions
    Audit {
        #[arg(long)]
        file: String,

        #[arg(long)]
        method: String,

        #[arg(long, value_delimiter = ',', required = true)]
        tokens: Vec<String>,
    },
}

#[derive(Debug, Clone, Args)]
pub struct CheckArgs {
    #[arg(long)]
    pub operation: String,

    #[arg(long)]
    pub endpoint: String,

    /// JSON request body
    #[arg(long, conflicts_with = "raw_body")]
    pub body: Option<String>,

    /// Request body sent as-is
    #[arg(long)]
    pub raw_body: Option<String>,

    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    #[arg(long, default_value = DEFAULT_TOKEN_ENV)]
    pub token_env: String,

    #[arg(long)]
    pub expected_status: Option<u16>,

    /// Expected Patient.PatientId for getAdmittedPatientData
    #[arg(long)]
    pub patient_id: Option<i64>,

    /// Lower bound (YYYY-MM-DD) for CreatedOn checks
    #[arg(long)]
    pub date_from: Option<String>,

    /// Upper bound (YYYY-MM-DD) for CreatedOn checks
    #[arg(long)]
    pub date_to: Option<String>,
}

impl CheckArgs {
    pub fn operation(&self) -> Result<Operation> {
        self.operation
            .parse()
            .map_err(|e: crate::core::operation::UnknownOperation| {
                HarnessError::InvalidConfigValueError {
                    field: "operation".to_string(),
                    value: self.operation.clone(),
                    reason: e.to_string(),
                }
            })
    }

    pub fn request_body(&self) -> Result<Option<RequestBody>> {
        match (&self.body, &self.raw_body) {
            (Some(json), _) => Ok(Some(RequestBody::Json(serde_json::from_str(json)?))),
            (None, Some(text)) => Ok(Some(RequestBody::Raw(text.clone()))),
            (None, None) => Ok(None),
        }
    }

    pub fn token_source(&self) -> TokenSource {
        TokenSource::Env(self.token_env.clone())
    }

    /// 未指定的選項沿用預設預期值
    pub fn expectations(&self) -> Expectations {
        let defaults = Expectations::default();
        Expectations {
            admitted_patient_id: self.patient_id.unwrap_or(defaults.admitted_patient_id),
            date_from: self.date_from.clone().unwrap_or(defaults.date_from),
            date_to: self.date_to.clone().unwrap_or(defaults.date_to),
        }
    }

    /// 轉成單一案例，與套件共用執行流程
    pub fn suite_case(&self) -> Result<SuiteCase> {
        let case = SuiteCase::new(self.operation()?, self.endpoint.clone());
        let case = match self.request_body()? {
            Some(RequestBody::Json(value)) => case.with_body(value),
            Some(RequestBody::Raw(text)) => case.with_raw_body(text),
            None => case,
        };

        Ok(match self.expected_status {
            Some(status) => case.expecting_status(status),
            None => case,
        })
    }
}

impl ConfigProvider for CheckArgs {
    fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Validate for CheckArgs {
    fn validate(&self) -> Result<()> {
        self.operation()?;
        validation::validate_url("base_url", &self.base_url)?;
        validation::validate_path("endpoint", &self.endpoint)?;
        validation::validate_non_empty_string("token_env", &self.token_env)?;
        self.request_body()?;

        let expectations = self.expectations();
        validation::validate_date_range("date", &expectations.date_from, &expectations.date_to)?;
        Ok(())
    }
}
