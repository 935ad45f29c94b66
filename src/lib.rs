pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{credentials::TokenSource, toml_config::SuiteConfig};
pub use core::{
    executor::RequestExecutor,
    operation::Operation,
    rules::Expectations,
    suite::{ApiSuite, SuiteCase, SuiteSummary},
    validator::{FieldValidator, ValidationReport},
};
pub use utils::error::{HarnessError, Result};
