pub mod fs;
pub mod language;
pub mod metadata;
pub mod symbol;
pub mod workspace;

pub use fs::*;
pub use language::*;
pub use metadata::*;
pub use symbol::*;
pub use workspace::*;
