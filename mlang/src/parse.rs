// RebelDB™ © 2025 Huly Labs • https://hulylabs.com • SPDX-License-Identifier: MIT

use crate::core::CoreError;
use smol_str::SmolStr;

pub const BEGIN_DEFINITION: &str = ":";
pub const BEGIN_BODY: &str = "=";
pub const END_DEFINITION: &str = ";";

pub fn tokenize(input: &str) -> impl Iterator<Item = SmolStr> + '_ {
    input.split_whitespace().map(SmolStr::from)
}

pub trait Collector {
    fn define(&mut self, params: Vec<SmolStr>, body: Vec<SmolStr>) -> Result<(), CoreError>;
    fn execute(&mut self, token: &str) -> Result<(), CoreError>;
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum State {
    #[default]
    TopLevel,
    CollectingParams,
    CollectingBody,
}

/// Splits the token stream into definitions and top-level tokens. State is
/// kept between calls, so a definition may span several `feed` calls.
#[derive(Debug, Default)]
pub struct BlockParser {
    state: State,
    params: Vec<SmolStr>,
    body: Vec<SmolStr>,
}

impl BlockParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn feed<C>(&mut self, token: SmolStr, collector: &mut C) -> Result<(), CoreError>
    where
        C: Collector,
    {
        match self.state {
            State::TopLevel if token == BEGIN_DEFINITION => {
                self.state = State::CollectingParams;
                Ok(())
            }
            State::TopLevel => collector.execute(&token),
            _ if token == BEGIN_DEFINITION => Err(CoreError::NestedDefinition),
            State::CollectingParams if token == BEGIN_BODY => {
                self.state = State::CollectingBody;
                Ok(())
            }
            State::CollectingParams => {
                self.params.push(token);
                Ok(())
            }
            State::CollectingBody if token == END_DEFINITION => {
                let params = std::mem::take(&mut self.params);
                let body = std::mem::take(&mut self.body);
                self.state = State::TopLevel;
                collector.define(params, body)
            }
            State::CollectingBody => {
                self.body.push(token);
                Ok(())
            }
        }
    }

    pub fn parse<C>(&mut self, input: &str, collector: &mut C) -> Result<(), CoreError>
    where
        C: Collector,
    {
        for token in tokenize(input) {
            self.feed(token, collector)?;
        }
        Ok(())
    }

    /// Fails if a definition is still open.
    pub fn finish(&self) -> Result<(), CoreError> {
        match self.state {
            State::TopLevel => Ok(()),
            _ => Err(CoreError::UnterminatedDefinition),
        }
    }

    /// Drops a half-collected definition.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
