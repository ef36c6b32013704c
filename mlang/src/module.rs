// RebelDB™ © 2025 Huly Labs • https://hulylabs.com • SPDX-License-Identifier: MIT

use crate::boot::{Builtins, FuncDesc, Ret};
use crate::clause::{Clause, Step};
use crate::core::{parse_literal, CoreError, Int};
use crate::dispatch::{ClauseId, Definitions};
use crate::parse::Collector;
use crate::stack::Stack;
use smol_str::SmolStr;
use std::io::Write;

pub const DEFAULT_MAX_CALL_DEPTH: usize = 100_000;

/// A pending clause invocation.
#[derive(Debug)]
struct Frame {
    clause: ClauseId,
    ip: usize,
    args: Vec<Int>,
}

// M O D U L E

/// Owns the stack, the clause table and the output stream, and evaluates
/// tokens against them.
///
/// Clause bodies run on an explicit frame stack rather than on the host call
/// stack. A frame is retired as soon as its last step has been fetched, so a
/// call in tail position does not grow the frame stack.
pub struct Module<W> {
    stack: Stack,
    definitions: Definitions,
    builtins: Builtins,
    call_stack: Vec<Frame>,
    max_call_depth: usize,
    out: W,
}

impl<W> Module<W>
where
    W: Write,
{
    pub fn new(out: W) -> Self {
        Self::with_limits(out, DEFAULT_MAX_CALL_DEPTH)
    }

    pub fn with_limits(out: W, max_call_depth: usize) -> Self {
        Self {
            stack: Stack::new(),
            definitions: Definitions::new(),
            builtins: Builtins::default(),
            call_stack: Vec::new(),
            max_call_depth,
            out,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_builtins(out: W, builtins: Builtins) -> Self {
        Self {
            builtins,
            ..Self::new(out)
        }
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    pub fn definitions(&self) -> &Definitions {
        &self.definitions
    }

    pub fn builtins(&self) -> &Builtins {
        &self.builtins
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }

    pub fn define(&mut self, params: Vec<SmolStr>, body: Vec<SmolStr>) -> Result<(), CoreError> {
        let clause = Clause::new(params, body)?;
        tracing::debug!(%clause, "define");
        self.definitions.define(clause);
        Ok(())
    }

    /// Evaluates a top-level token, including every clause it calls. On error
    /// the pending frames are dropped; the stack is left as it was at the
    /// failure.
    pub fn eval(&mut self, token: &str) -> Result<(), CoreError> {
        self.call(token)
            .and_then(|_| self.run())
            .inspect_err(|_| self.call_stack.clear())
    }

    /// Drops pending frames.
    pub fn abort(&mut self) {
        self.call_stack.clear();
    }

    fn run(&mut self) -> Result<(), CoreError> {
        while let Some(frame) = self.call_stack.last_mut() {
            let body = self
                .definitions
                .get(frame.clause)
                .map(Clause::body)
                .unwrap_or_default();

            let Some(step) = body.get(frame.ip) else {
                self.call_stack.pop();
                continue;
            };
            frame.ip += 1;

            match step {
                Step::Arg(i) => {
                    let value = frame.args[*i];
                    self.stack.push(value);
                }
                Step::Call(token) => {
                    let token = token.clone();
                    if frame.ip == body.len() {
                        self.call_stack.pop();
                    }
                    self.call(&token)?;
                }
            }
        }
        Ok(())
    }

    /// Pushes a literal, applies a builtin, or enters a clause. Entering a
    /// clause only pushes its frame; `run` executes it.
    fn call(&mut self, token: &str) -> Result<(), CoreError> {
        if let Some(value) = parse_literal(token)? {
            self.stack.push(value);
            return Ok(());
        }

        if let Some(desc) = self.builtins.get(token) {
            return self.call_native(desc);
        }

        let clause = self.definitions.resolve(token, self.stack.as_slice())?;
        let arity = self
            .definitions
            .get(clause)
            .map(Clause::arity)
            .ok_or_else(|| CoreError::UnresolvedToken(SmolStr::from(token)))?;
        tracing::trace!(token, clause, depth = self.call_stack.len(), "dispatch");

        if self.call_stack.len() >= self.max_call_depth {
            return Err(CoreError::CallDepthExceeded(self.max_call_depth));
        }
        let args = self
            .stack
            .pop_n(arity)
            .ok_or_else(|| CoreError::UnresolvedToken(SmolStr::from(token)))?;
        self.call_stack.push(Frame {
            clause,
            ip: 0,
            args,
        });
        Ok(())
    }

    fn call_native(&mut self, desc: &FuncDesc) -> Result<(), CoreError> {
        let args = self
            .stack
            .pop_n(desc.arity)
            .ok_or_else(|| CoreError::OperandUnderflow {
                name: SmolStr::from(desc.name),
                missing: desc.arity - self.stack.len(),
            })?;
        tracing::trace!(name = desc.name, ?args, "native");

        let ret = (desc.func)(&args, &mut self.out)?;
        if desc.keep_result {
            match ret {
                Ret::None => {}
                Ret::Int(value) => self.stack.push(value),
                Ret::Seq(values) => self.stack.extend(values),
            }
        }
        Ok(())
    }
}

impl<W> Collector for Module<W>
where
    W: Write,
{
    fn define(&mut self, params: Vec<SmolStr>, body: Vec<SmolStr>) -> Result<(), CoreError> {
        Module::define(self, params, body)
    }

    fn execute(&mut self, token: &str) -> Result<(), CoreError> {
        self.eval(token)
    }
}
