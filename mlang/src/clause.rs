// RebelDB™ © 2025 Huly Labs • https://hulylabs.com • SPDX-License-Identifier: MIT

use crate::core::{parse_literal, CoreError, Int};
use smol_str::SmolStr;

/// Positional parameter of a clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    /// Matches only a stack value equal to the literal.
    Literal(SmolStr, Int),
    /// Matches any value and binds it to the name.
    Wildcard(SmolStr),
}

impl Param {
    fn new(token: SmolStr) -> Result<Self, CoreError> {
        Ok(match parse_literal(&token)? {
            Some(value) => Param::Literal(token, value),
            None => Param::Wildcard(token),
        })
    }

    pub fn name(&self) -> &SmolStr {
        match self {
            Param::Literal(name, _) | Param::Wildcard(name) => name,
        }
    }

    pub fn matches(&self, value: Int) -> bool {
        match self {
            Param::Literal(_, expected) => *expected == value,
            Param::Wildcard(_) => true,
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Param::Literal(..))
    }
}

/// A body token, resolved against the clause parameters when the clause is
/// created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Push the argument bound to positional parameter `i`.
    Arg(usize),
    /// Dispatch the token.
    Call(SmolStr),
}

// C L A U S E

#[derive(Debug, Clone)]
pub struct Clause {
    name: SmolStr,
    params: Vec<Param>,
    body: Vec<Step>,
    source: Vec<SmolStr>,
}

impl Clause {
    /// Builds a clause from `: <params> = <body> ;`. The last parameter is the
    /// name.
    pub fn new(mut params: Vec<SmolStr>, body: Vec<SmolStr>) -> Result<Self, CoreError> {
        let name = params.pop().ok_or(CoreError::EmptyDefinition)?;
        let params = params
            .into_iter()
            .map(Param::new)
            .collect::<Result<Vec<_>, _>>()?;

        // first parameter with a matching name wins
        let steps = body
            .iter()
            .map(|token| {
                params
                    .iter()
                    .position(|param| param.name() == token)
                    .map(Step::Arg)
                    .unwrap_or_else(|| Step::Call(token.clone()))
            })
            .collect();

        Ok(Self {
            name,
            params,
            body: steps,
            source: body,
        })
    }

    pub fn name(&self) -> &SmolStr {
        &self.name
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn body(&self) -> &[Step] {
        &self.body
    }

    /// Checks the parameters against the top `arity` stack values.
    pub fn matches(&self, stack: &[Int]) -> bool {
        stack
            .len()
            .checked_sub(self.arity())
            .and_then(|sp| stack.get(sp..))
            .is_some_and(|args| {
                self.params
                    .iter()
                    .zip(args)
                    .all(|(param, value)| param.matches(*value))
            })
    }
}

impl std::fmt::Display for Clause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, ":")?;
        for param in self.params.iter() {
            write!(f, " {}", param.name())?;
        }
        write!(f, " {} =", self.name)?;
        for token in self.source.iter() {
            write!(f, " {}", token)?;
        }
        write!(f, " ;")
    }
}
