use clap::Parser;
use clap::ValueEnum;
use colored::Colorize;
use decompiler::Chain;
use pattern::Pattern;
use pattern::split_pattern_literal;
use std::fmt::Display;
use std::io;
use std::io::IsTerminal;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ColorWhen {
    Auto,
    Always,
    Never,
}

/// Turn patterns into readable builder chains, or chains back into patterns.
#[derive(Debug, Parser)]
struct Cli {
    /// A pattern as `/source/flags` or bare source. With --build, a chain.
    #[clap(short = 'E', long = "expression")]
    expression: Option<String>,
    /// Files to read when no expression is given. Defaults to stdin.
    paths: Vec<PathBuf>,
    /// Flags for bare pattern sources.
    #[clap(short = 'f', long = "flags", default_value = "")]
    flags: String,
    /// Read builder chains and print the patterns they build.
    #[clap(short = 'b', long = "build")]
    build: bool,
    /// Print each chain on a single line.
    #[clap(short = 'c', long = "compact")]
    compact: bool,
    #[clap(long = "color", value_enum, default_value = "auto")]
    color: ColorWhen,
}

fn report(context: &str, err: impl Display) {
    eprintln!("{} {context}: {err}", "error:".red().bold());
}

fn describe_pattern(text: &str, args: &Cli) -> bool {
    let (source, literal_flags) = split_pattern_literal(text);
    let flags = if source.len() == text.len() {
        args.flags.as_str()
    } else {
        literal_flags
    };
    let pattern = match Pattern::new(source, flags) {
        Ok(pattern) => pattern,
        Err(err) => {
            report(text, err);
            return false;
        }
    };
    let chain = Chain::decompile(pattern.source(), &pattern.flags().to_string());
    if args.compact {
        println!("{chain}");
    } else {
        println!("{}", chain.pretty());
    }
    true
}

fn build_chain(text: &str) -> bool {
    match decompiler::evaluate(text) {
        Ok(pattern) => {
            println!("{pattern}");
            true
        }
        Err(err) => {
            report(text.lines().next().unwrap_or_default().trim(), err);
            false
        }
    }
}

/// In build mode the whole input is one chain; otherwise every non-empty
/// line is a pattern.
fn solve_input(input: &str, args: &Cli) -> bool {
    if args.build {
        return build_chain(input);
    }
    let mut all_ok = true;
    for line in input.lines().filter(|line| !line.trim().is_empty()) {
        if !describe_pattern(line, args) {
            all_ok = false;
        }
    }
    all_ok
}

fn solve_from_stdin(args: &Cli) -> bool {
    let mut stdin_buffer = String::new();
    if io::stdin().read_to_string(&mut stdin_buffer).is_err() || stdin_buffer.trim().is_empty() {
        eprintln!("No input data received. Please provide an expression, an input file or pipe data to stdin.");
        return false;
    }
    solve_input(&stdin_buffer, args)
}

fn solve_file(file: &PathBuf, args: &Cli) -> bool {
    let Ok(content) = std::fs::read_to_string(file) else {
        report(&file.display().to_string(), "could not read file");
        return false;
    };
    solve_input(&content, args)
}

fn solve_all_paths(paths: &[PathBuf], args: &Cli) -> bool {
    let mut all_ok = true;
    for path in paths {
        if !solve_file(path, args) {
            all_ok = false;
        }
    }
    all_ok
}

fn main() -> ExitCode {
    let args = Cli::parse();
    let use_color = match args.color {
        ColorWhen::Always => true,
        ColorWhen::Never => false,
        ColorWhen::Auto => io::stderr().is_terminal(),
    };
    colored::control::set_override(use_color);

    let ok = if let Some(expression) = &args.expression {
        if args.build {
            build_chain(expression)
        } else {
            describe_pattern(expression, &args)
        }
    } else if args.paths.is_empty() {
        solve_from_stdin(&args)
    } else {
        solve_all_paths(&args.paths, &args)
    };

    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
