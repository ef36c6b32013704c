// RebelDB™ © 2025 Huly Labs • https://hulylabs.com • SPDX-License-Identifier: MIT

pub mod boot;
pub mod clause;
pub mod core;
pub mod dispatch;
pub mod module;
pub mod parse;
pub mod stack;

use crate::core::CoreError;
use crate::module::Module;
use crate::parse::BlockParser;
use std::io::Write;

/// Block parser and module, kept together so that state survives between
/// `feed` calls.
pub struct Interpreter<W> {
    parser: BlockParser,
    module: Module<W>,
}

impl<W> Interpreter<W>
where
    W: Write,
{
    pub fn new(module: Module<W>) -> Self {
        Self {
            parser: BlockParser::new(),
            module,
        }
    }

    pub fn feed(&mut self, input: &str) -> Result<(), CoreError> {
        self.parser.parse(input, &mut self.module)
    }

    pub fn finish(&self) -> Result<(), CoreError> {
        self.parser.finish()
    }

    /// Forgets a half-read definition and any pending calls. The stack and the
    /// definitions made so far are kept.
    pub fn abort(&mut self) {
        self.parser.reset();
        self.module.abort();
    }

    pub fn module(&self) -> &Module<W> {
        &self.module
    }

    pub fn into_module(self) -> Module<W> {
        self.module
    }
}

/// Runs a complete script, writing `print` output to `out`.
pub fn run<W: Write>(input: &str, out: W) -> Result<Module<W>, CoreError> {
    let mut interpreter = Interpreter::new(Module::new(out));
    interpreter.feed(input)?;
    interpreter.finish()?;
    Ok(interpreter.into_module())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(input: &str) -> Result<String, CoreError> {
        let module = run(input, Vec::new())?;
        Ok(String::from_utf8_lossy(&module.into_output()).into_owned())
    }

    #[test]
    fn test_square() -> Result<(), CoreError> {
        assert_eq!(output(": n sq = n n * ; 5 sq print")?, "25\n");
        Ok(())
    }

    #[test]
    fn test_add() -> Result<(), CoreError> {
        assert_eq!(output("3 4 + print")?, "7\n");
        Ok(())
    }

    #[test]
    fn test_underflow_writes_nothing() {
        let mut out: Vec<u8> = Vec::new();
        let result = run("+", &mut out).map(|_| ());
        assert!(matches!(result, Err(CoreError::OperandUnderflow { missing: 2, .. })));
        assert!(out.is_empty());
    }

    #[test]
    fn test_fibonacci() -> Result<(), CoreError> {
        let script = "
            : 0 fib = 0 ;
            : 1 fib = 1 ;
            : n fib = n 1 - fib n 2 - fib + ;
            20 fib print
        ";
        assert_eq!(output(script)?, "6765\n");
        Ok(())
    }

    #[test]
    fn test_multi_param_pattern() -> Result<(), CoreError> {
        let script = "
            : a 0 pow = 1 ;
            : a b pow = a a b 1 - pow * ;
            2 10 pow print 7 0 pow print
        ";
        assert_eq!(output(script)?, "1024\n1\n");
        Ok(())
    }

    #[test]
    fn test_unterminated_definition() {
        assert!(matches!(
            run("1 : n f = n", Vec::<u8>::new()),
            Err(CoreError::UnterminatedDefinition)
        ));
    }

    #[test]
    fn test_interpreter_keeps_state_across_feeds() -> Result<(), CoreError> {
        let mut interpreter = Interpreter::new(Module::new(Vec::<u8>::new()));
        interpreter.feed(": n dbl =")?;
        interpreter.feed("n n + ;")?;
        interpreter.feed("21 dbl")?;
        interpreter.finish()?;
        assert_eq!(interpreter.module().stack().as_slice(), &[42]);
        Ok(())
    }

    #[test]
    fn test_feed_after_error_runs_in_order() -> Result<(), CoreError> {
        let mut interpreter = Interpreter::new(Module::new(Vec::<u8>::new()));
        assert!(interpreter.feed(": f = 1 nope 2 ; f").is_err());
        interpreter.feed("7")?;
        interpreter.finish()?;
        assert_eq!(interpreter.module().stack().as_slice(), &[1, 7]);
        Ok(())
    }

    #[test]
    fn test_abort_keeps_stack_and_definitions() -> Result<(), CoreError> {
        let mut interpreter = Interpreter::new(Module::new(Vec::<u8>::new()));
        interpreter.feed(": n dbl = n n + ; 1 2")?;
        assert!(interpreter.feed(": x y").is_ok());
        assert!(interpreter.feed(": z").is_err());
        interpreter.abort();
        interpreter.feed("dbl")?;
        interpreter.finish()?;
        assert_eq!(interpreter.module().stack().as_slice(), &[1, 4]);
        assert_eq!(interpreter.module().definitions().len(), 1);
        Ok(())
    }
}
