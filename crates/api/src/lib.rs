pub mod compiler;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use compiler::{CompileOutput, Diagnostic, MetadataCompiler};
pub use error::ApiError;
pub use models::*;
