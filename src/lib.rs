pub mod regex;

pub use regex::{Regex, is_match};
