//! Reference metadata compiler for Lightning web component modules.
//!
//! Parses the module with tree-sitter and reports the default-exported class:
//! its decorated members, methods, doc comments and source ranges.

pub mod parser;

pub use parser::LwcCompiler;
