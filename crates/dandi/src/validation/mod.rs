//! Record validation and error reports.

mod report;
mod validator;

pub use report::{child_invalid_error, ValidationReport};
pub use validator::Validator;
