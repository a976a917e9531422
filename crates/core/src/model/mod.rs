pub mod tag;

pub use tag::{Tag, TagRecord, file_uri};
