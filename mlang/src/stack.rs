// RebelDB™ © 2025 Huly Labs • https://hulylabs.com • SPDX-License-Identifier: MIT

use crate::core::Int;

// S T A C K

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Stack {
    data: Vec<Int>,
}

impl Stack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn push(&mut self, value: Int) {
        self.data.push(value)
    }

    pub fn extend(&mut self, values: impl IntoIterator<Item = Int>) {
        self.data.extend(values)
    }

    /// Removes the top `n` values, deepest first.
    pub fn pop_n(&mut self, n: usize) -> Option<Vec<Int>> {
        self.data
            .len()
            .checked_sub(n)
            .map(|sp| self.data.split_off(sp))
    }

    pub fn as_slice(&self) -> &[Int] {
        &self.data
    }
}

impl From<Vec<Int>> for Stack {
    fn from(data: Vec<Int>) -> Self {
        Self { data }
    }
}

impl std::fmt::Display for Stack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (i, value) in self.data.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", value)?;
        }
        write!(f, "]")
    }
}
