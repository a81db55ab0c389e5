//! Token kinds and the keyword/punctuation tables used to classify lexemes.

use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

/// The 33 lexical kinds a PL/0 lexeme can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Null,
    Ident,
    Number,
    Plus,
    Minus,
    Mult,
    Slash,
    Odd,
    Eq,
    Neq,
    Les,
    Leq,
    Gtr,
    Geq,
    LParent,
    RParent,
    Comma,
    Semicolon,
    Period,
    Becomes,
    Begin,
    End,
    If,
    Then,
    While,
    Do,
    Call,
    Const,
    Var,
    Procedure,
    Write,
    Read,
    Else,
}

impl TokenKind {
    /// The 1-based ordinal matching the original token_type enumeration
    /// (`nulSym = 1 .. elseSym = 33`), used in the lexeme-list section of
    /// the generated listing.
    pub fn ordinal(self) -> i32 {
        self as i32 + 1
    }
}

/// A single lexeme paired with its classified kind and source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub lexeme: String,
    pub kind: TokenKind,
    pub line: usize,
}

impl Token {
    pub fn new(lexeme: impl Into<String>, kind: TokenKind, line: usize) -> Self {
        Self {
            lexeme: lexeme.into(),
            kind,
            line,
        }
    }
}

/// Reserved words mapped to their token kind. Built once at start-up.
pub static RESERVED_WORDS: Lazy<HashMap<&'static str, TokenKind>> = Lazy::new(|| {
    HashMap::from([
        ("null", TokenKind::Null),
        ("begin", TokenKind::Begin),
        ("call", TokenKind::Call),
        ("const", TokenKind::Const),
        ("do", TokenKind::Do),
        ("else", TokenKind::Else),
        ("end", TokenKind::End),
        ("if", TokenKind::If),
        ("odd", TokenKind::Odd),
        ("procedure", TokenKind::Procedure),
        ("read", TokenKind::Read),
        ("then", TokenKind::Then),
        ("var", TokenKind::Var),
        ("while", TokenKind::While),
        ("write", TokenKind::Write),
    ])
});

/// Special (punctuation) symbols mapped to their token kind.
pub static SPECIAL_SYMBOLS: Lazy<HashMap<&'static str, TokenKind>> = Lazy::new(|| {
    HashMap::from([
        ("+", TokenKind::Plus),
        ("-", TokenKind::Minus),
        ("*", TokenKind::Mult),
        ("/", TokenKind::Slash),
        ("(", TokenKind::LParent),
        (")", TokenKind::RParent),
        ("<>", TokenKind::Neq),
        ("=", TokenKind::Eq),
        (",", TokenKind::Comma),
        (".", TokenKind::Period),
        ("<", TokenKind::Les),
        ("<=", TokenKind::Leq),
        (">", TokenKind::Gtr),
        (">=", TokenKind::Geq),
        (";", TokenKind::Semicolon),
        (":=", TokenKind::Becomes),
    ])
});

/// Token kinds that may begin a `statement` production (used by the
/// `begin ... end` block to decide whether another statement follows).
pub static STATEMENT_TOKENS: Lazy<HashSet<TokenKind>> = Lazy::new(|| {
    HashSet::from([
        TokenKind::Semicolon,
        TokenKind::Begin,
        TokenKind::Call,
        TokenKind::If,
        TokenKind::While,
        TokenKind::Read,
        TokenKind::Write,
    ])
});

/// Relational operator kinds accepted by `condition`.
pub static RELATION_OPERATORS: Lazy<HashSet<TokenKind>> = Lazy::new(|| {
    HashSet::from([
        TokenKind::Neq,
        TokenKind::Eq,
        TokenKind::Les,
        TokenKind::Leq,
        TokenKind::Gtr,
        TokenKind::Geq,
    ])
});
