// RebelDB™ © 2025 Huly Labs • https://hulylabs.com • SPDX-License-Identifier: MIT

use crate::clause::Clause;
use crate::core::{CoreError, Int};
use smol_str::SmolStr;
use std::collections::HashMap;

pub type ClauseId = usize;

// D E F I N I T I O N S

/// Append-only clause table with a name index. The index lists clause ids in
/// definition order; selection does not depend on that order.
#[derive(Debug, Default)]
pub struct Definitions {
    clauses: Vec<Clause>,
    by_name: HashMap<SmolStr, Vec<ClauseId>>,
}

impl Definitions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define(&mut self, clause: Clause) -> ClauseId {
        let id = self.clauses.len();
        self.by_name
            .entry(clause.name().clone())
            .or_default()
            .push(id);
        self.clauses.push(clause);
        id
    }

    pub fn get(&self, id: ClauseId) -> Option<&Clause> {
        self.clauses.get(id)
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Clause> {
        self.clauses.iter()
    }

    /// Selects the single clause named `token` that applies to `stack`.
    ///
    /// Candidates are clauses whose parameters match the top of the stack.
    /// When several match they must agree on arity, and are narrowed left to
    /// right: at each position where some candidate has a literal parameter,
    /// only the candidates with a literal there survive.
    pub fn resolve(&self, token: &str, stack: &[Int]) -> Result<ClauseId, CoreError> {
        let mut candidates: Vec<ClauseId> = self
            .by_name
            .get(token)
            .into_iter()
            .flatten()
            .copied()
            .filter(|id| self.clauses[*id].matches(stack))
            .collect();

        match candidates.as_slice() {
            [] => return Err(CoreError::UnresolvedToken(SmolStr::from(token))),
            [id] => return Ok(*id),
            _ => {}
        }

        let arity = self.clauses[candidates[0]].arity();
        if let Some(other) = candidates
            .iter()
            .map(|id| self.clauses[*id].arity())
            .find(|other| *other != arity)
        {
            return Err(CoreError::ArityMismatch {
                name: SmolStr::from(token),
                expected: arity,
                found: other,
            });
        }

        for i in 0..arity {
            let literal: Vec<ClauseId> = candidates
                .iter()
                .copied()
                .filter(|id| self.clauses[*id].params()[i].is_literal())
                .collect();
            if !literal.is_empty() {
                candidates = literal;
            }
        }

        match candidates.as_slice() {
            [id] => Ok(*id),
            _ => Err(CoreError::AmbiguousDispatch {
                name: SmolStr::from(token),
                candidates: candidates.len(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn define(defs: &mut Definitions, source: &str) -> Result<ClauseId, CoreError> {
        let (params, body) = source.split_once('=').unwrap_or((source, ""));
        let clause = Clause::new(
            params.split_whitespace().map(SmolStr::from).collect(),
            body.split_whitespace().map(SmolStr::from).collect(),
        )?;
        Ok(defs.define(clause))
    }

    #[test]
    fn test_unresolved() {
        let defs = Definitions::new();
        assert!(matches!(
            defs.resolve("inc", &[1]),
            Err(CoreError::UnresolvedToken(name)) if name == "inc"
        ));
    }

    #[test]
    fn test_too_shallow_stack_is_unresolved() -> Result<(), CoreError> {
        let mut defs = Definitions::new();
        define(&mut defs, "a b add2 = a b +")?;
        assert!(matches!(
            defs.resolve("add2", &[1]),
            Err(CoreError::UnresolvedToken(_))
        ));
        Ok(())
    }

    #[test]
    fn test_literal_beats_wildcard() -> Result<(), CoreError> {
        let mut defs = Definitions::new();
        let generic = define(&mut defs, "n inc = n 1 +")?;
        let zero = define(&mut defs, "0 inc = 0")?;

        assert_eq!(defs.resolve("inc", &[0])?, zero);
        assert_eq!(defs.resolve("inc", &[5])?, generic);
        Ok(())
    }

    #[test]
    fn test_definition_order_does_not_matter() -> Result<(), CoreError> {
        let mut defs = Definitions::new();
        let zero = define(&mut defs, "0 inc = 0")?;
        let generic = define(&mut defs, "n inc = n 1 +")?;

        assert_eq!(defs.resolve("inc", &[0])?, zero);
        assert_eq!(defs.resolve("inc", &[7])?, generic);
        Ok(())
    }

    #[test]
    fn test_all_wildcards_are_ambiguous() -> Result<(), CoreError> {
        let mut defs = Definitions::new();
        define(&mut defs, "n a = n")?;
        define(&mut defs, "m a = m")?;
        assert!(matches!(
            defs.resolve("a", &[3]),
            Err(CoreError::AmbiguousDispatch { candidates: 2, .. })
        ));
        Ok(())
    }

    #[test]
    fn test_leftmost_literal_has_priority() -> Result<(), CoreError> {
        let mut defs = Definitions::new();
        let left = define(&mut defs, "1 y f = 10")?;
        let right = define(&mut defs, "x 2 f = 20")?;
        let none = define(&mut defs, "x y f = 30")?;

        assert_eq!(defs.resolve("f", &[1, 2])?, left);
        assert_eq!(defs.resolve("f", &[1, 9])?, left);
        assert_eq!(defs.resolve("f", &[9, 2])?, right);
        assert_eq!(defs.resolve("f", &[9, 9])?, none);
        Ok(())
    }

    #[test]
    fn test_narrowing_continues_after_literal() -> Result<(), CoreError> {
        let mut defs = Definitions::new();
        define(&mut defs, "1 y f = 10")?;
        let both = define(&mut defs, "1 2 f = 12")?;
        assert_eq!(defs.resolve("f", &[1, 2])?, both);
        Ok(())
    }

    #[test]
    fn test_duplicate_literal_clauses_are_ambiguous() -> Result<(), CoreError> {
        let mut defs = Definitions::new();
        define(&mut defs, "0 z = 1")?;
        define(&mut defs, "0 z = 2")?;
        define(&mut defs, "n z = 3")?;
        assert!(matches!(
            defs.resolve("z", &[0]),
            Err(CoreError::AmbiguousDispatch { candidates: 2, .. })
        ));
        Ok(())
    }

    #[test]
    fn test_arity_mismatch() -> Result<(), CoreError> {
        let mut defs = Definitions::new();
        define(&mut defs, "a g = a")?;
        define(&mut defs, "a b g = a b")?;

        // only the unary clause fits a one-element stack
        assert_eq!(defs.resolve("g", &[1])?, 0);
        assert!(matches!(
            defs.resolve("g", &[1, 2]),
            Err(CoreError::ArityMismatch {
                expected: 1,
                found: 2,
                ..
            })
        ));
        Ok(())
    }

    #[test]
    fn test_nullary_clause() -> Result<(), CoreError> {
        let mut defs = Definitions::new();
        let ten = define(&mut defs, "ten = 10")?;
        assert_eq!(defs.resolve("ten", &[])?, ten);
        Ok(())
    }
}
