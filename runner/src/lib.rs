pub mod error;
pub mod subshell;

pub use error::{BlockFailure, RunnerError};
pub use subshell::{RunOutcome, run_in_subshell};
