//! Character-stream scanner. Turns source text into a token sequence plus a
//! stream of diagnostics, never aborting early — every malformed lexeme is
//! reported but still produces (as best it can) a token, so the parser
//! always has something to chew on.

use std::iter::Peekable;
use std::str::Chars;

use log::trace;

use crate::error::{Diagnostic, Stage};
use crate::token::{Token, TokenKind, RESERVED_WORDS, SPECIAL_SYMBOLS};

const MAX_IDENTIFIER_LENGTH: usize = 11;
const MAX_NUMBER_LENGTH: usize = 5;

pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
    diagnostics: Vec<Diagnostic>,
    ok: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            chars: source.chars().peekable(),
            line: 1,
            diagnostics: Vec::new(),
            ok: true,
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn advance(&mut self) -> Option<char> {
        self.chars.next()
    }

    fn error(&mut self, message: impl Into<String>) {
        self.ok = false;
        self.diagnostics
            .push(Diagnostic::new(Stage::Lex, self.line, message));
    }

    fn lex_alphanumeric(&mut self, first: char) -> Token {
        let start_line = self.line;
        let mut lexeme = String::new();
        lexeme.push(first);
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() {
                lexeme.push(c);
                self.advance();
            } else {
                break;
            }
        }
        if lexeme.len() > MAX_IDENTIFIER_LENGTH {
            self.error(format!(
                "Current identifier token {lexeme} exceeds {MAX_IDENTIFIER_LENGTH} characters."
            ));
        }
        let kind = RESERVED_WORDS
            .get(lexeme.as_str())
            .copied()
            .unwrap_or(TokenKind::Ident);
        Token::new(lexeme, kind, start_line)
    }

    fn lex_numeric(&mut self, first: char) -> Token {
        let start_line = self.line;
        let mut lexeme = String::new();
        lexeme.push(first);
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                lexeme.push(c);
                self.advance();
            } else {
                break;
            }
        }
        if let Some(c) = self.peek() {
            if c.is_alphabetic() {
                self.error(format!(
                    "Current identifier token {lexeme} starts with a number which is not allowed."
                ));
            }
        }
        if lexeme.len() > MAX_NUMBER_LENGTH {
            self.error(format!(
                "Current number token {lexeme} exceeds {MAX_NUMBER_LENGTH} characters."
            ));
        }
        Token::new(lexeme, TokenKind::Number, start_line)
    }

    fn eat_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                if c == '\n' {
                    self.line += 1;
                }
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Consumes a `/* ... */` comment already past its opening `/*`.
    /// Returns true once the closing `*/` was found.
    fn skip_comment(&mut self) -> bool {
        loop {
            match self.advance() {
                None => return false,
                Some('\n') => {
                    self.line += 1;
                }
                Some('*') if self.peek() == Some('/') => {
                    self.advance();
                    return true;
                }
                Some(_) => {}
            }
        }
    }

    fn lex_special(&mut self, first: char) -> Option<Token> {
        let start_line = self.line;
        let lexeme = match first {
            '<' => match self.peek() {
                Some('=') => {
                    self.advance();
                    "<=".to_string()
                }
                Some('>') => {
                    self.advance();
                    "<>".to_string()
                }
                _ => "<".to_string(),
            },
            '>' => match self.peek() {
                Some('=') => {
                    self.advance();
                    ">=".to_string()
                }
                _ => ">".to_string(),
            },
            ':' => match self.peek() {
                Some('=') => {
                    self.advance();
                    ":=".to_string()
                }
                _ => {
                    self.error("Found : not followed by =.");
                    return None;
                }
            },
            '/' if self.peek() == Some('*') => {
                self.advance();
                if !self.skip_comment() {
                    self.error("Comment started but never closed.");
                }
                return None;
            }
            other => other.to_string(),
        };
        match SPECIAL_SYMBOLS.get(lexeme.as_str()) {
            Some(&kind) => Some(Token::new(lexeme, kind, start_line)),
            None => {
                self.error(format!("Unknow symbol type found: {lexeme}."));
                None
            }
        }
    }

    /// Scans the whole source to completion, returning every token
    /// produced, every diagnostic raised, and whether lexing was clean.
    pub fn lex(mut self) -> (Vec<Token>, Vec<Diagnostic>, bool) {
        let mut tokens = Vec::new();
        while let Some(c) = self.advance() {
            if c.is_whitespace() {
                if c == '\n' {
                    self.line += 1;
                }
                self.eat_whitespace();
                continue;
            }
            let token = if c.is_alphabetic() {
                Some(self.lex_alphanumeric(c))
            } else if c.is_ascii_digit() {
                Some(self.lex_numeric(c))
            } else {
                self.lex_special(c)
            };
            if let Some(token) = token {
                trace!("lex: {:?} {:?} @ line {}", token.kind, token.lexeme, token.line);
                tokens.push(token);
            }
        }
        (tokens, self.diagnostics, self.ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        Lexer::new(src).lex().0.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn lexes_a_minimal_program() {
        let (tokens, diags, ok) = Lexer::new("var x; begin x := 7; write x end.").lex();
        assert!(ok);
        assert!(diags.is_empty());
        assert_eq!(
            tokens.iter().map(|t| t.kind).collect::<Vec<_>>(),
            vec![
                TokenKind::Var,
                TokenKind::Ident,
                TokenKind::Semicolon,
                TokenKind::Begin,
                TokenKind::Ident,
                TokenKind::Becomes,
                TokenKind::Number,
                TokenKind::Semicolon,
                TokenKind::Write,
                TokenKind::Ident,
                TokenKind::End,
                TokenKind::Period,
            ]
        );
    }

    #[test]
    fn two_character_operators_are_disambiguated() {
        assert_eq!(kinds("<= <> >= :="), vec![
            TokenKind::Leq,
            TokenKind::Neq,
            TokenKind::Geq,
            TokenKind::Becomes,
        ]);
    }

    #[test]
    fn oversized_identifier_still_emits_a_token_but_diagnoses() {
        let (tokens, diags, ok) = Lexer::new("abcdefghijklmnop").lex();
        assert!(!ok);
        assert_eq!(diags.len(), 1);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Ident);
    }

    #[test]
    fn number_followed_by_letters_splits_into_two_tokens() {
        let (tokens, diags, ok) = Lexer::new("12abc").lex();
        assert!(!ok);
        assert_eq!(diags.len(), 1);
        assert_eq!(
            tokens.iter().map(|t| t.kind).collect::<Vec<_>>(),
            vec![TokenKind::Number, TokenKind::Ident]
        );
        assert_eq!(tokens[0].lexeme, "12");
        assert_eq!(tokens[1].lexeme, "abc");
    }

    #[test]
    fn unterminated_comment_is_diagnosed() {
        let (tokens, diags, ok) = Lexer::new("var x; /* oops").lex();
        assert!(!ok);
        assert_eq!(diags.len(), 1);
        assert_eq!(tokens.len(), 2);
    }

    #[test]
    fn comments_are_skipped_entirely() {
        let (tokens, diags, ok) = Lexer::new("var /* a comment */ x;").lex();
        assert!(ok);
        assert!(diags.is_empty());
        assert_eq!(
            tokens.iter().map(|t| t.kind).collect::<Vec<_>>(),
            vec![TokenKind::Var, TokenKind::Ident, TokenKind::Semicolon]
        );
    }

    #[test]
    fn stray_colon_is_diagnosed_and_produces_no_token() {
        let (tokens, diags, ok) = Lexer::new(": x").lex();
        assert!(!ok);
        assert_eq!(diags.len(), 1);
        assert_eq!(tokens.len(), 1);
    }
}
