//! Application use cases (business logic orchestration).

mod execute_collection;
mod execute_request;
mod run_collection;

pub use execute_collection::{CollectionExecutor, ExecutionStream};
pub use execute_request::ExecuteRequest;
pub use run_collection::{RunCollection, RunCollectionInput};
