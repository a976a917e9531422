pub mod error;
pub mod fs;
pub mod index;
pub mod indexing;
pub mod logging;
pub mod model;
pub mod naming;
pub mod project;
pub mod runtime;

pub use error::{Result, TagscopeError};
pub use index::{ComponentIndex, IndexConfig, IndexStats};
pub use model::{Tag, TagRecord};
pub use runtime::{SessionConfig, SessionStatus, WorkspaceSession};
