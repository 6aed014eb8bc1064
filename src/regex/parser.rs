use crate::regex::ast::{ClassKind, Piece, Quantifier, Token};

/// Splits a leading `^` and a trailing `$` off the pattern.
///
/// Returns the remaining body together with the start and end anchor flags.
/// The trailing `$` is an anchor even when a backslash precedes it.
pub fn strip_anchors(pattern: &str) -> (&str, bool, bool) {
    let (body, start_anchored) = match pattern.strip_prefix('^') {
        Some(rest) => (rest, true),
        None => (pattern, false),
    };
    match body.strip_suffix('$') {
        Some(rest) => (rest, start_anchored, true),
        None => (body, start_anchored, false),
    }
}

/// Compiles `pattern` into a sequence of pieces.
///
/// `group_count` is the number of capture groups already handed out; new
/// groups are numbered from `group_count + 1` in order of their opening
/// parenthesis. The updated count is returned alongside the pieces.
///
/// Malformed syntax never fails: an unclosed `(` or `[` and a trailing `\`
/// compile to literal characters.
pub fn compile(pattern: &str, group_count: usize) -> (Vec<Piece>, usize) {
    let chars: Vec<char> = pattern.chars().collect();
    let mut group_counter = group_count;
    let pieces = compile_chars(&chars, &mut group_counter);
    (pieces, group_counter)
}

fn compile_chars(chars: &[char], group_counter: &mut usize) -> Vec<Piece> {
    let mut pieces = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        i += 1;

        let token = match c {
            '(' => match find_group_end(chars, i - 1) {
                Some(close) => {
                    // The group takes its number before any group nested inside it.
                    *group_counter += 1;
                    let capture = Some(*group_counter);
                    let alternatives = split_alternatives(&chars[i..close])
                        .into_iter()
                        .map(|alternative| compile_chars(alternative, group_counter))
                        .collect();
                    i = close + 1;
                    Token::Group {
                        alternatives,
                        capture,
                    }
                }
                None => {
                    pieces.push(Piece::new(Token::Literal('('), Quantifier::One));
                    continue;
                }
            },
            '\\' if i < chars.len() => {
                let escaped = chars[i];
                i += 1;
                match escaped {
                    '1'..='9' => {
                        // \1 .. \9 never carry a quantifier
                        let n = (escaped as u32 - '0' as u32) as usize;
                        pieces.push(Piece::new(Token::Backreference(n), Quantifier::One));
                        continue;
                    }
                    's' => Token::EscapeClass(ClassKind::Whitespace),
                    'd' => Token::EscapeClass(ClassKind::Digit),
                    'w' => Token::EscapeClass(ClassKind::Word),
                    other => Token::LiteralEscape(other),
                }
            }
            '[' => match find_class_end(chars, i - 1) {
                Some(close) => {
                    let token = parse_class(&chars[i..close]);
                    i = close + 1;
                    token
                }
                None => {
                    pieces.push(Piece::new(Token::Literal('['), Quantifier::One));
                    continue;
                }
            },
            '.' => Token::AnyChar,
            _ => Token::Literal(c),
        };

        let quantifier = take_quantifier(chars, &mut i);
        pieces.push(Piece::new(token, quantifier));
    }
    pieces
}

fn take_quantifier(chars: &[char], i: &mut usize) -> Quantifier {
    let quantifier = match chars.get(*i) {
        Some('+') => Quantifier::OneOrMore,
        Some('?') => Quantifier::ZeroOrOne,
        _ => return Quantifier::One,
    };
    *i += 1;
    quantifier
}

/// Index of the `)` closing the `(` at `open`, skipping escaped characters.
fn find_group_end(chars: &[char], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut j = open;
    while j < chars.len() {
        match chars[j] {
            '\\' => j += 1,
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(j);
                }
            }
            _ => {}
        }
        j += 1;
    }
    None
}

/// Index of the first unescaped `]` after the `[` at `open`.
fn find_class_end(chars: &[char], open: usize) -> Option<usize> {
    let mut j = open + 1;
    while j < chars.len() {
        match chars[j] {
            '\\' => j += 1,
            ']' => return Some(j),
            _ => {}
        }
        j += 1;
    }
    None
}

// Split by '|' only at the top level of this group
fn split_alternatives(body: &[char]) -> Vec<&[char]> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut part_start = 0;
    let mut j = 0;

    while j < body.len() {
        match body[j] {
            '\\' => j += 1,
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            '|' if depth == 0 => {
                parts.push(&body[part_start..j]);
                part_start = j + 1;
            }
            _ => {}
        }
        j += 1;
    }
    parts.push(&body[part_start..]);
    parts
}

/// Builds a `CharSet` from the text between `[` and `]`.
fn parse_class(content: &[char]) -> Token {
    let (negated, body) = match content.split_first() {
        Some(('^', rest)) => (true, rest),
        _ => (false, content),
    };

    let mut members = Vec::new();
    let mut i = 0;
    while i < body.len() {
        let (first, next) = class_member(body, i);
        if next + 1 < body.len() && body[next] == '-' {
            let (last, after) = class_member(body, next + 1);
            members.extend(first..=last);
            i = after;
        } else {
            members.push(first);
            i = next;
        }
    }
    members.sort_unstable();
    members.dedup();

    Token::CharSet { members, negated }
}

fn class_member(body: &[char], i: usize) -> (char, usize) {
    match body[i] {
        '\\' if i + 1 < body.len() => (body[i + 1], i + 2),
        c => (c, i + 1),
    }
}

#[cfg(test)]
mod tests {
    use super::{compile, strip_anchors};
    use crate::regex::ast::{ClassKind, Piece, Quantifier, Token};

    fn one(token: Token) -> Piece {
        Piece::new(token, Quantifier::One)
    }

    fn lit(c: char) -> Piece {
        one(Token::Literal(c))
    }

    fn group_numbers(pieces: &[Piece], out: &mut Vec<usize>) {
        for piece in pieces {
            if let Token::Group {
                alternatives,
                capture,
            } = &piece.token
            {
                out.extend(capture);
                for alternative in alternatives {
                    group_numbers(alternative, out);
                }
            }
        }
    }

    #[test]
    fn compiles_literals_and_wildcard() {
        let (pieces, groups) = compile("a.c", 0);
        assert_eq!(pieces, vec![lit('a'), one(Token::AnyChar), lit('c')]);
        assert_eq!(groups, 0);
    }

    #[test]
    fn compiles_escape_classes_and_literal_escapes() {
        let (pieces, _) = compile(r"\d\w\s\.\(", 0);
        assert_eq!(
            pieces,
            vec![
                one(Token::EscapeClass(ClassKind::Digit)),
                one(Token::EscapeClass(ClassKind::Word)),
                one(Token::EscapeClass(ClassKind::Whitespace)),
                one(Token::LiteralEscape('.')),
                one(Token::LiteralEscape('(')),
            ]
        );
    }

    #[test]
    fn attaches_quantifiers_to_previous_token() {
        let (pieces, _) = compile(r"a+\d?[xy]+", 0);
        assert_eq!(pieces[0], Piece::new(Token::Literal('a'), Quantifier::OneOrMore));
        assert_eq!(
            pieces[1],
            Piece::new(Token::EscapeClass(ClassKind::Digit), Quantifier::ZeroOrOne)
        );
        assert_eq!(
            pieces[2],
            Piece::new(
                Token::CharSet {
                    members: vec!['x', 'y'],
                    negated: false
                },
                Quantifier::OneOrMore
            )
        );
        assert_eq!(pieces.len(), 3);
    }

    #[test]
    fn second_quantifier_is_a_literal() {
        let (pieces, _) = compile("a+?", 0);
        assert_eq!(
            pieces,
            vec![
                Piece::new(Token::Literal('a'), Quantifier::OneOrMore),
                lit('?'),
            ]
        );
        let (pieces, _) = compile("+a", 0);
        assert_eq!(pieces, vec![lit('+'), lit('a')]);
    }

    #[test]
    fn backreference_does_not_take_quantifier() {
        let (pieces, _) = compile(r"(a)\1+", 0);
        assert_eq!(pieces[1], one(Token::Backreference(1)));
        assert_eq!(pieces[2], lit('+'));
    }

    #[test]
    fn expands_class_ranges_and_negation() {
        let (pieces, _) = compile("[a-d0]", 0);
        assert_eq!(
            pieces,
            vec![one(Token::CharSet {
                members: vec!['0', 'a', 'b', 'c', 'd'],
                negated: false
            })]
        );

        let (pieces, _) = compile("[^a-c-]", 0);
        assert_eq!(
            pieces,
            vec![one(Token::CharSet {
                members: vec!['-', 'a', 'b', 'c'],
                negated: true
            })]
        );
    }

    #[test]
    fn escaped_bracket_stays_inside_class() {
        let (pieces, _) = compile(r"[\]a]b", 0);
        assert_eq!(
            pieces,
            vec![
                one(Token::CharSet {
                    members: vec![']', 'a'],
                    negated: false
                }),
                lit('b'),
            ]
        );
    }

    #[test]
    fn splits_group_alternatives_at_top_level() {
        let (pieces, groups) = compile("(ab|c(d|e))", 0);
        assert_eq!(groups, 2);
        let Token::Group {
            alternatives,
            capture,
        } = &pieces[0].token
        else {
            panic!("expected a group, got {:?}", pieces[0]);
        };
        assert_eq!(*capture, Some(1));
        assert_eq!(alternatives.len(), 2);
        assert_eq!(alternatives[0], vec![lit('a'), lit('b')]);
        assert_eq!(alternatives[1][0], lit('c'));
        assert!(matches!(
            &alternatives[1][1].token,
            Token::Group { alternatives, capture: Some(2) } if alternatives.len() == 2
        ));
    }

    #[test]
    fn numbers_nested_groups_by_opening_paren() {
        let (pieces, groups) = compile("((a)(b))", 0);
        let mut numbers = Vec::new();
        group_numbers(&pieces, &mut numbers);
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(groups, 3);
    }

    #[test]
    fn numbering_continues_across_sibling_alternatives() {
        let (pieces, groups) = compile("((a)|(b))(c)", 0);
        let mut numbers = Vec::new();
        group_numbers(&pieces, &mut numbers);
        assert_eq!(numbers, vec![1, 2, 3, 4]);
        assert_eq!(groups, 4);
    }

    #[test]
    fn numbering_starts_after_given_count() {
        let (pieces, groups) = compile("(a)", 3);
        let mut numbers = Vec::new();
        group_numbers(&pieces, &mut numbers);
        assert_eq!(numbers, vec![4]);
        assert_eq!(groups, 4);
    }

    #[test]
    fn empty_alternatives_are_kept() {
        let (pieces, _) = compile("(a|)", 0);
        let Token::Group { alternatives, .. } = &pieces[0].token else {
            panic!("expected a group");
        };
        assert_eq!(alternatives, &vec![vec![lit('a')], vec![]]);
    }

    #[test]
    fn escaped_paren_does_not_close_group() {
        let (pieces, groups) = compile(r"(a\))", 0);
        assert_eq!(groups, 1);
        assert_eq!(pieces.len(), 1);
        let Token::Group { alternatives, .. } = &pieces[0].token else {
            panic!("expected a group");
        };
        assert_eq!(
            alternatives,
            &vec![vec![lit('a'), one(Token::LiteralEscape(')'))]]
        );
    }

    #[test]
    fn unclosed_group_falls_back_to_literal() {
        let (pieces, groups) = compile("(ab", 0);
        assert_eq!(pieces, vec![lit('('), lit('a'), lit('b')]);
        assert_eq!(groups, 0);
    }

    #[test]
    fn unclosed_class_falls_back_to_literal() {
        let (pieces, _) = compile("[ab", 0);
        assert_eq!(pieces, vec![lit('['), lit('a'), lit('b')]);
    }

    #[test]
    fn unclosed_fallback_literal_does_not_take_quantifier() {
        let (pieces, _) = compile("(+", 0);
        assert_eq!(pieces, vec![lit('('), lit('+')]);
        let (pieces, _) = compile("[?a", 0);
        assert_eq!(pieces, vec![lit('['), lit('?'), lit('a')]);
    }

    #[test]
    fn trailing_backslash_is_literal() {
        let (pieces, _) = compile(r"a\", 0);
        assert_eq!(pieces, vec![lit('a'), lit('\\')]);
    }

    #[test]
    fn compiling_twice_is_identical() {
        let pattern = r"^((\w+)|[^x-z]?)\2 (a|b(c))+$";
        assert_eq!(compile(pattern, 0), compile(pattern, 0));
    }

    #[test]
    fn strips_anchors() {
        assert_eq!(strip_anchors("^abc$"), ("abc", true, true));
        assert_eq!(strip_anchors("^abc"), ("abc", true, false));
        assert_eq!(strip_anchors("abc$"), ("abc", false, true));
        assert_eq!(strip_anchors("abc"), ("abc", false, false));
        assert_eq!(strip_anchors("^$"), ("", true, true));
        assert_eq!(strip_anchors("^"), ("", true, false));
    }

    #[test]
    fn trailing_dollar_is_always_an_anchor() {
        assert_eq!(strip_anchors(r"a\$"), (r"a\", false, true));
        assert_eq!(strip_anchors(r"a\\$"), (r"a\\", false, true));
    }
}
