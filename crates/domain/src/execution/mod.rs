//! Execution records and batch statistics

mod record;
mod statistics;

pub use record::{ExecutionOutcome, ExecutionResult, RequestExecution};
pub use statistics::Statistics;
