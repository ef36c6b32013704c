// RebelDB™ © 2025 Huly Labs • https://hulylabs.com • SPDX-License-Identifier: MIT

use crate::core::{CoreError, Int};
use smol_str::SmolStr;
use std::io::Write;

/// What a native function leaves behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ret {
    None,
    Int(Int),
    Seq(Vec<Int>),
}

pub type NativeFn = fn(args: &[Int], out: &mut dyn Write) -> Result<Ret, CoreError>;

pub struct FuncDesc {
    pub name: &'static str,
    pub arity: usize,
    pub keep_result: bool,
    pub func: NativeFn,
}

fn overflow(name: &str) -> CoreError {
    CoreError::ArithmeticOverflow(SmolStr::from(name))
}

fn sub(args: &[Int], _: &mut dyn Write) -> Result<Ret, CoreError> {
    match args {
        [a, b] => a.checked_sub(*b).map(Ret::Int).ok_or_else(|| overflow("-")),
        _ => Err(overflow("-")),
    }
}

fn mul(args: &[Int], _: &mut dyn Write) -> Result<Ret, CoreError> {
    match args {
        [a, b] => a.checked_mul(*b).map(Ret::Int).ok_or_else(|| overflow("*")),
        _ => Err(overflow("*")),
    }
}

fn add(args: &[Int], _: &mut dyn Write) -> Result<Ret, CoreError> {
    match args {
        [a, b] => a.checked_add(*b).map(Ret::Int).ok_or_else(|| overflow("+")),
        _ => Err(overflow("+")),
    }
}

fn print(args: &[Int], out: &mut dyn Write) -> Result<Ret, CoreError> {
    for value in args {
        writeln!(out, "{}", value)?;
    }
    Ok(Ret::None)
}

pub const CORE_PACKAGE: &[FuncDesc] = &[
    FuncDesc {
        name: "-",
        arity: 2,
        keep_result: true,
        func: sub,
    },
    FuncDesc {
        name: "*",
        arity: 2,
        keep_result: true,
        func: mul,
    },
    FuncDesc {
        name: "+",
        arity: 2,
        keep_result: true,
        func: add,
    },
    FuncDesc {
        name: "print",
        arity: 1,
        keep_result: false,
        func: print,
    },
];

// B U I L T I N S

pub struct Builtins {
    functions: &'static [FuncDesc],
}

impl Default for Builtins {
    fn default() -> Self {
        Self::new(CORE_PACKAGE)
    }
}

impl Builtins {
    pub fn new(functions: &'static [FuncDesc]) -> Self {
        Self { functions }
    }

    pub fn get(&self, name: &str) -> Option<&'static FuncDesc> {
        self.functions.iter().find(|desc| desc.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        self.functions.iter().map(|desc| desc.name)
    }
}
