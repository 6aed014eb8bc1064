pub mod ast;
pub mod matcher;
pub mod parser;
pub mod pattern;

pub use pattern::{Regex, is_match};
