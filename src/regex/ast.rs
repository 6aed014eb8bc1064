#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    Whitespace, // \s
    Digit,      // \d
    Word,       // \w
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantifier {
    One,
    OneOrMore, // +
    ZeroOrOne, // ?
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Literal(char),
    AnyChar,                                      // .
    EscapeClass(ClassKind),                       // \s, \d, \w
    CharSet { members: Vec<char>, negated: bool }, // [abc], [^a-z]
    LiteralEscape(char),                          // \., \(, ...
    Backreference(usize),                         // \1 .. \9
    Group {
        alternatives: Vec<Vec<Piece>>,
        capture: Option<usize>,
    },
}

/// A token together with the quantifier that followed it in the pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    pub token: Token,
    pub quantifier: Quantifier,
}

impl Piece {
    pub fn new(token: Token, quantifier: Quantifier) -> Self {
        Self { token, quantifier }
    }
}
