pub mod cli;
pub mod config;
pub mod error;
pub mod host;
pub mod output;
pub mod result;
pub mod runner;
pub mod scanner;
pub mod validator;

pub use error::{ReleaseValidatorError, Result};

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_REJECTED: i32 = 1;
pub const EXIT_CONFIG_ERROR: i32 = 2;

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
