pub mod commands;
pub mod contracts;
pub mod discrepancy;
pub mod error;
pub mod matching;
pub mod records;
pub mod report;
pub mod store;

pub use contracts::envelope::{FailureEnvelope, SuccessEnvelope};
pub use error::{CoreError, CoreResult};

pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");
