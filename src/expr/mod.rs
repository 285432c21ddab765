//! Sandboxed condition language for `\cc[...]` choice markers.
//!
//! Conditions are tokenized, parsed and interpreted against a read-only
//! [`GameState`]; nothing is handed to a host interpreter.

mod eval;
mod lexer;
mod parser;
mod value;

pub use eval::{ConditionEvaluator, GameState, MemoryState, SandboxEvaluator, eval};
pub use lexer::{Token, tokenize};
pub use parser::{BinaryOp, Expr, UnaryOp, parse};
pub use value::{ObjectKind, ObjectRef, Value};

use once_cell::sync::Lazy;
use regex::Regex;

/// Errors raised while lexing, parsing or evaluating a condition.
#[derive(Debug, thiserror::Error)]
pub enum ExprError {
    #[error("unexpected character {found:?} at {pos}")]
    UnexpectedChar { pos: usize, found: char },
    #[error("unterminated string starting at {0}")]
    UnterminatedString(usize),
    #[error("expected {expected}, found {found}")]
    UnexpectedToken { expected: &'static str, found: String },
    #[error("unexpected end of expression")]
    UnexpectedEnd,
    #[error("unknown name `{0}`")]
    UnknownName(String),
    #[error("{target} has no member `{member}`")]
    UnknownMember { target: String, member: String },
    #[error("cannot apply `{op}` to {left} and {right}")]
    TypeMismatch { op: &'static str, left: &'static str, right: &'static str },
    #[error("{0} cannot be indexed")]
    NotIndexable(String),
    #[error("bad index {0}")]
    BadIndex(String),
    #[error("division by zero")]
    DivisionByZero,
    #[error("integer overflow")]
    Overflow,
    #[error("nested deeper than {0} levels")]
    TooDeep(usize),
    #[error("longer than {0} tokens")]
    TooLong(usize),
}

static SHORTHAND: Lazy<[(Regex, &'static str); 7]> = Lazy::new(|| {
    let re = |p: &str| Regex::new(p).expect("valid regex");
    [
        (re(r"\bs(\d+)\b"), "switches[$1]"),
        (re(r"\bv(\d+)\b"), "variables[$1]"),
        (re(r"\ba(\d+)\b"), "actors[$1]"),
        (re(r"\bp\b"), "party"),
        (re(r"\bsys\b"), "system"),
        (re(r"\bmap\b"), "map"),
        (re(r"\bgp\b"), "player"),
    ]
});

/// Rewrite shorthand references into full state paths:
/// `s1` → `switches[1]`, `v2` → `variables[2]`, `a3` → `actors[3]`,
/// `p` → `party`, `sys` → `system`, `map` → `map`, `gp` → `player`.
pub fn expand_shorthand(source: &str) -> String {
    SHORTHAND
        .iter()
        .fold(source.to_string(), |acc, (re, rep)| re.replace_all(&acc, *rep).into_owned())
}
