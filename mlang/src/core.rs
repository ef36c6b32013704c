// RebelDB™ © 2025 Huly Labs • https://hulylabs.com • SPDX-License-Identifier: MIT

use smol_str::SmolStr;
use thiserror::Error;

pub type Int = i64;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("missing {missing} arguments on the stack for operation `{name}`")]
    OperandUnderflow { name: SmolStr, missing: usize },
    #[error("cannot resolve token `{0}`")]
    UnresolvedToken(SmolStr),
    #[error("ambiguous call to `{name}`: {candidates} clauses match equally well")]
    AmbiguousDispatch { name: SmolStr, candidates: usize },
    #[error("clauses of `{name}` take different numbers of parameters: {expected} and {found}")]
    ArityMismatch {
        name: SmolStr,
        expected: usize,
        found: usize,
    },
    #[error("definitions cannot be nested")]
    NestedDefinition,
    #[error("definition has no name")]
    EmptyDefinition,
    #[error("input ended inside a definition")]
    UnterminatedDefinition,
    #[error("integer literal `{0}` is out of range")]
    LiteralOverflow(SmolStr),
    #[error("integer overflow in `{0}`")]
    ArithmeticOverflow(SmolStr),
    #[error("call depth exceeded ({0} frames)")]
    CallDepthExceeded(usize),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A token is an integer literal iff it is non-empty and made of ASCII digits.
pub fn is_literal(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit())
}

/// Parses `token` if it is an integer literal. `Ok(None)` means the token is
/// an identifier.
pub fn parse_literal(token: &str) -> Result<Option<Int>, CoreError> {
    if !is_literal(token) {
        return Ok(None);
    }
    token
        .parse::<Int>()
        .map(Some)
        .map_err(|_| CoreError::LiteralOverflow(SmolStr::from(token)))
}
