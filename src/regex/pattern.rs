use std::iter;

use crate::regex::ast::Piece;
use crate::regex::matcher::{Captures, match_from};
use crate::regex::parser::{compile, strip_anchors};

/// A compiled pattern. `^` and `$` are kept as flags rather than tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Regex {
    pieces: Vec<Piece>,
    start_anchored: bool,
    end_anchored: bool,
    group_count: usize,
}

impl Regex {
    pub fn new(pattern: &str) -> Self {
        let (body, start_anchored, end_anchored) = strip_anchors(pattern);
        let (pieces, group_count) = compile(body, 0);
        Self {
            pieces,
            start_anchored,
            end_anchored,
            group_count,
        }
    }

    pub fn group_count(&self) -> usize {
        self.group_count
    }

    /// Reports whether the pattern matches somewhere in `line`.
    ///
    /// Every start position gets its own empty capture table. With `$` the
    /// end reached by the first successful path must be the end of the line.
    pub fn is_match(&self, line: &str) -> bool {
        let attempt = |start: usize| {
            let mut captures = Captures::default();
            match_from(line, start, &self.pieces, &mut captures)
                .is_some_and(|end| !self.end_anchored || end == line.len())
        };

        if self.start_anchored {
            attempt(0)
        } else {
            start_positions(line).any(attempt)
        }
    }
}

// Every char boundary, including the empty position at the end of the line
fn start_positions(line: &str) -> impl Iterator<Item = usize> + '_ {
    line.char_indices()
        .map(|(i, _)| i)
        .chain(iter::once(line.len()))
}

/// Compiles `pattern` and matches it against `input_line` once.
pub fn is_match(input_line: &str, pattern: &str) -> bool {
    Regex::new(pattern).is_match(input_line)
}
