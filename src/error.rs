//! Diagnostic accumulation and the small set of structural errors that do
//! abort the pipeline (as opposed to lexical/syntactic diagnostics, which
//! never do).

use std::fmt;

/// Which stage produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Lex,
    Parse,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Lex => write!(f, "lex"),
            Stage::Parse => write!(f, "parse"),
        }
    }
}

/// One accumulated diagnostic. Neither stage halts on these; they are
/// collected and printed, and only latch the caller's success flag.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub stage: Stage,
    pub line: usize,
    pub message: String,
}

impl Diagnostic {
    pub fn new(stage: Stage, line: usize, message: impl Into<String>) -> Self {
        Self {
            stage,
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.stage {
            Stage::Lex => write!(
                f,
                "Error: {}\nError found on line {}.",
                self.message, self.line
            ),
            Stage::Parse => write!(f, "Error: - {}", self.message),
        }
    }
}

/// Failures that abort the pipeline outright rather than merely latching a
/// diagnostic: today this is limited to I/O failures reading/writing the
/// fixed input/output files.
#[derive(Debug)]
pub struct Pl0Error(pub String);

impl fmt::Display for Pl0Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for Pl0Error {}

impl From<std::io::Error> for Pl0Error {
    fn from(err: std::io::Error) -> Self {
        Pl0Error(err.to_string())
    }
}
