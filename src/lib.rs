pub mod cli;
pub mod document;
pub mod endpoint;
pub mod error;
pub mod logger;
pub mod merge;
pub mod operations;

pub use document::WhitelistDocument;
pub use endpoint::{Endpoint, EndpointKey};
pub use error::{MergeError, Result};
pub use merge::{merge_endpoints, MergeOutcome};
pub use operations::{merge_files, MergeSummary, MergeTarget};
