use std::ops::Range;

use crate::regex::ast::{ClassKind, Piece, Quantifier, Token};

/// Text captured by each group during one match attempt, stored as byte
/// spans into the input. Groups that have not captured yet have no entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captures {
    spans: Vec<Option<Range<usize>>>,
}

impl Captures {
    pub fn get<'h>(&self, group: usize, input: &'h str) -> Option<&'h str> {
        let span = self.spans.get(group.checked_sub(1)?)?.clone()?;
        input.get(span)
    }

    fn set(&mut self, group: usize, span: Range<usize>) {
        // Ensure the Vec is big enough to hold this group ID
        if self.spans.len() < group {
            self.spans.resize(group, None);
        }
        self.spans[group - 1] = Some(span);
    }
}

fn matches_class(kind: ClassKind, c: char) -> bool {
    match kind {
        ClassKind::Whitespace => matches!(c, ' ' | '\t' | '\n'),
        ClassKind::Digit => c.is_ascii_digit(),
        ClassKind::Word => c.is_ascii_alphanumeric() || c == '_',
    }
}

fn matches_token(token: &Token, c: char) -> bool {
    match token {
        Token::AnyChar => true,
        Token::Literal(l) | Token::LiteralEscape(l) => c == *l,
        Token::EscapeClass(kind) => matches_class(*kind, c),
        Token::CharSet { members, negated } => members.binary_search(&c).is_ok() != *negated,
        // Positional tokens are handled by match_from directly
        Token::Backreference(_) | Token::Group { .. } => false,
    }
}

/// Matches `pieces` against `input` starting at byte offset `pos`.
///
/// Returns the offset just past the match. `captures` is only written when
/// the whole sequence succeeds; a failed attempt leaves it untouched.
///
/// Alternatives and repetition counts are explored by plain backtracking, so
/// deeply nested optional groups can take exponential time.
pub fn match_from(
    input: &str,
    pos: usize,
    pieces: &[Piece],
    captures: &mut Captures,
) -> Option<usize> {
    let Some((piece, rest)) = pieces.split_first() else {
        return Some(pos); // Pattern exhausted, we matched!
    };

    match (&piece.token, piece.quantifier) {
        (Token::Backreference(n), _) => {
            let captured = captures.get(*n, input)?;
            if input[pos..].starts_with(captured) {
                match_from(input, pos + captured.len(), rest, captures)
            } else {
                None
            }
        }
        (
            Token::Group {
                alternatives,
                capture,
            },
            quantifier,
        ) => {
            let group = GroupMatch {
                input,
                alternatives,
                capture: *capture,
                rest,
            };
            match quantifier {
                Quantifier::One => group.once(pos, captures),
                Quantifier::ZeroOrOne => group
                    .once(pos, captures)
                    .or_else(|| match_from(input, pos, rest, captures)),
                Quantifier::OneOrMore => group.repeated(pos, captures),
            }
        }
        (token, Quantifier::One) => {
            let c = next_matching(input, pos, token)?;
            match_from(input, pos + c.len_utf8(), rest, captures)
        }
        (token, Quantifier::ZeroOrOne) => {
            // Try the "One" case first, then skip the token
            next_matching(input, pos, token)
                .and_then(|c| match_from(input, pos + c.len_utf8(), rest, captures))
                .or_else(|| match_from(input, pos, rest, captures))
        }
        (token, Quantifier::OneOrMore) => {
            let mut ends = Vec::new();
            let mut end = pos;
            for c in input[pos..].chars().take_while(|&c| matches_token(token, c)) {
                end += c.len_utf8();
                ends.push(end);
            }
            // Longest run first, giving back one character at a time
            ends.into_iter()
                .rev()
                .find_map(|end| match_from(input, end, rest, captures))
        }
    }
}

fn next_matching(input: &str, pos: usize, token: &Token) -> Option<char> {
    input[pos..]
        .chars()
        .next()
        .filter(|&c| matches_token(token, c))
}

/// A capture group at the head of the pieces, plus whatever follows it.
struct GroupMatch<'a> {
    input: &'a str,
    alternatives: &'a [Vec<Piece>],
    capture: Option<usize>,
    rest: &'a [Piece],
}

impl GroupMatch<'_> {
    /// One occurrence: the first alternative whose continuation succeeds wins.
    fn once(&self, pos: usize, captures: &mut Captures) -> Option<usize> {
        for alternative in self.alternatives {
            let mut branch = captures.clone();
            let Some(end) = match_from(self.input, pos, alternative, &mut branch) else {
                continue;
            };
            if let Some(result) = self.commit(pos, end, branch, captures) {
                return Some(result);
            }
        }
        None
    }

    /// One or more occurrences, longest repetition count first.
    fn repeated(&self, pos: usize, captures: &mut Captures) -> Option<usize> {
        let mut repetitions: Vec<(usize, Captures)> = Vec::new();
        let mut current = pos;

        loop {
            // A repetition has to move forward; a zero-width match ends the loop.
            // Each one starts from the caller's table, so a snapshot only holds
            // what its own repetition captured.
            let step = self.alternatives.iter().find_map(|alternative| {
                let mut branch = captures.clone();
                match match_from(self.input, current, alternative, &mut branch) {
                    Some(end) if end > current => Some((end, branch)),
                    _ => None,
                }
            });
            let Some((end, branch)) = step else {
                break;
            };
            current = end;
            repetitions.push((end, branch));
        }

        repetitions
            .into_iter()
            .rev()
            .find_map(|(end, branch)| self.commit(pos, end, branch, captures))
    }

    /// Records the group's span in `branch` and matches the rest of the
    /// pattern with it. On success the branch replaces the caller's table.
    fn commit(
        &self,
        start: usize,
        end: usize,
        mut branch: Captures,
        captures: &mut Captures,
    ) -> Option<usize> {
        if let Some(group) = self.capture {
            branch.set(group, start..end);
        }
        let result = match_from(self.input, end, self.rest, &mut branch)?;
        *captures = branch;
        Some(result)
    }
}
