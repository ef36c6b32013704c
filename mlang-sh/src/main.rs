// RebelDB™ © 2025 Huly Labs • https://hulylabs.com • SPDX-License-Identifier: MIT

mod settings;

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use mlang::module::Module;
use mlang::Interpreter;
use rustyline::{error::ReadlineError, DefaultEditor};
use settings::Settings;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::Level;

/// Runs an M script, or starts an interactive shell when no script is given.
#[derive(Parser, Debug)]
#[clap(name = "mlang", version)]
struct Args {
    /// Path to the M source file
    source: Option<PathBuf>,
    /// Settings file (toml, json, yaml)
    #[clap(short, long)]
    config: Option<PathBuf>,
    /// Maximum number of nested clause calls
    #[clap(long)]
    max_call_depth: Option<usize>,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn log_level(verbose: u8, configured: &str) -> Level {
    match verbose {
        0 => configured.parse().unwrap_or(Level::WARN),
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn run_file<W: Write>(path: &Path, settings: &Settings, out: W) -> Result<()> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let mut interpreter = Interpreter::new(Module::with_limits(out, settings.max_call_depth));
    interpreter.feed(&source)?;
    interpreter.finish()?;
    Ok(())
}

/// Runs a script and returns the process exit status. Errors go to `err`.
fn execute<W: Write, E: Write>(path: &Path, settings: &Settings, out: W, mut err: E) -> i32 {
    match run_file(path, settings, out) {
        Ok(()) => 0,
        Err(e) => {
            let _ = writeln!(err, "{} {:#}", "ERROR:".red().bold(), e);
            1
        }
    }
}

/// Builtins, then user clauses in definition order.
fn words<W: Write>(module: &Module<W>) -> String {
    let builtins = module.builtins().names().collect::<Vec<_>>().join(" ");
    let mut listing = format!("builtins: {}", builtins);
    if module.definitions().is_empty() {
        listing.push_str("\nno definitions");
    }
    for clause in module.definitions().iter() {
        listing.push_str(&format!("\n{}", clause));
    }
    listing
}

fn repl(settings: &Settings) -> Result<()> {
    println!("{} © 2025 Huly Labs • {}", "M".bold(), "https://hulylabs.com".underline());
    println!("Type {} or press Ctrl+D to exit\n", ":quit".red().bold());

    let stdout = std::io::stdout();
    let mut interpreter = Interpreter::new(Module::with_limits(stdout, settings.max_call_depth));

    let mut rl = DefaultEditor::new()?;

    loop {
        match rl.readline("M ❯ ") {
            Ok(line) => {
                rl.add_history_entry(line.as_str())?;
                match line.trim() {
                    ":quit" => break,
                    ".s" => {
                        println!("{}", interpreter.module().stack());
                        continue;
                    }
                    ".d" => {
                        println!("{}", words(interpreter.module()));
                        continue;
                    }
                    _ => {}
                }

                match interpreter.feed(&line) {
                    Ok(()) => println!("{}: {}", "OK".green(), interpreter.module().stack()),
                    Err(err) => {
                        eprintln!("{} {}", "ERROR:".red().bold(), err);
                        interpreter.abort();
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("Bye!");
                break;
            }
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load(args.config.as_deref()).context("loading settings")?;
    if let Some(depth) = args.max_call_depth {
        settings.max_call_depth = depth;
    }

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(log_level(args.verbose, &settings.log))
        .init();

    match args.source {
        Some(path) => {
            let status = execute(&path, &settings, std::io::stdout().lock(), std::io::stderr());
            std::process::exit(status)
        }
        None => repl(&settings),
    }
}
