pub mod executor;
pub mod operation;
pub mod rules;
pub mod source_audit;
pub mod suite;
pub mod validator;

pub use crate::domain::model::{Payload, PayloadShape, RequestBody, ResponseEnvelope};
pub use crate::domain::ports::{ConfigProvider, CredentialProvider};
pub use crate::utils::error::Result;
