//! `slsc`: run the sls front end over a source file and report.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use sls_front::{Grammar, compile_file, format_notices, format_tree, tokenize_file};
use tracing_subscriber::EnvFilter;

const DEFAULT_SOURCE: &str = "main.sls";
const DEFAULT_GRAMMAR: &str = "grammar.json";

const USAGE: &str = "\
Usage: slsc [options] [file]

Arguments:
  file                  Source file (default: main.sls)

Options:
  -g, --grammar <path>  Grammar table to load (default: grammar.json if present)
      --print-grammar   Print the loaded grammar table
      --tokens          Print the token stream instead of recognizing
      --tree            Print the syntax tree after recognition
  -v, --verbose         More logging, repeat for more (RUST_LOG overrides)
  -h, --help            Show this help";

#[derive(Debug, PartialEq, Eq)]
struct Options {
    source: PathBuf,
    grammar: Option<PathBuf>,
    print_grammar: bool,
    tokens: bool,
    tree: bool,
    verbose: u8,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            source: PathBuf::from(DEFAULT_SOURCE),
            grammar: None,
            print_grammar: false,
            tokens: false,
            tree: false,
            verbose: 0,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Run(Options),
    Help,
}

fn parse_args(args: &[String]) -> Result<Command, String> {
    let mut options = Options::default();
    let mut source = None;
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "-g" | "--grammar" => {
                let path = iter
                    .next()
                    .ok_or_else(|| format!("{arg} requires a path"))?;
                options.grammar = Some(PathBuf::from(path));
            }
            "--print-grammar" => options.print_grammar = true,
            "--tokens" => options.tokens = true,
            "--tree" => options.tree = true,
            "-v" | "--verbose" => options.verbose = options.verbose.saturating_add(1),
            "-vv" => options.verbose = options.verbose.saturating_add(2),
            flag if flag.starts_with('-') => return Err(format!("unknown option: {flag}")),
            path => {
                if source.replace(PathBuf::from(path)).is_some() {
                    return Err("only one source file can be given".to_string());
                }
            }
        }
    }

    if let Some(source) = source {
        options.source = source;
    }
    Ok(Command::Run(options))
}

fn directive_for_verbosity(v: u8) -> &'static str {
    match v {
        0 => "slsc=warn,sls_front=warn",
        1 => "slsc=info,sls_front=info",
        2 => "slsc=debug,sls_front=debug",
        _ => "slsc=trace,sls_front=trace",
    }
}

fn init_tracing(verbose: u8) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(directive_for_verbosity(verbose))),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Explicit grammar paths must load; the default one is optional.
fn load_grammar(options: &Options) -> Result<Option<Grammar>, String> {
    let (path, explicit) = match &options.grammar {
        Some(path) => (path.as_path(), true),
        None => (Path::new(DEFAULT_GRAMMAR), false),
    };
    if !explicit && !path.exists() {
        tracing::debug!(path = %path.display(), "no grammar table");
        return Ok(None);
    }
    Grammar::load(path)
        .map(Some)
        .map_err(|e| format!("{}: {e}", path.display()))
}

fn dump_tokens(path: &Path) -> ExitCode {
    let (tokens, diagnostics) = match tokenize_file(path) {
        Ok(out) => out,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    for token in tokens {
        println!(
            "{}: {} ({}:{})",
            token.kind, token.text, token.span.line, token.span.column
        );
    }
    if diagnostics.print_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match parse_args(&args) {
        Ok(Command::Run(options)) => options,
        Ok(Command::Help) => {
            eprintln!("{USAGE}");
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!();
            eprintln!("{USAGE}");
            return ExitCode::from(2);
        }
    };

    init_tracing(options.verbose);

    match load_grammar(&options) {
        Ok(Some(grammar)) if options.print_grammar => print!("{grammar}"),
        Ok(None) if options.print_grammar => {
            eprintln!("{DEFAULT_GRAMMAR}: not found, no grammar to print");
        }
        Ok(_) => {}
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    }

    if options.tokens {
        return dump_tokens(&options.source);
    }

    let compilation = match compile_file(&options.source) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let parsed = &compilation.parsed;
    print!("{}", format_notices(&parsed.tree, parsed.root));
    if options.tree {
        print!("{}", format_tree(&parsed.tree, parsed.root));
    }

    if compilation.diagnostics.print_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn defaults() {
        assert_eq!(parse_args(&[]), Ok(Command::Run(Options::default())));
    }

    #[test]
    fn source_and_flags() {
        let Ok(Command::Run(options)) =
            parse_args(&args(&["--tree", "-g", "rules.json", "-v", "app.sls"]))
        else {
            panic!("expected run");
        };
        assert_eq!(options.source, PathBuf::from("app.sls"));
        assert_eq!(options.grammar, Some(PathBuf::from("rules.json")));
        assert!(options.tree);
        assert_eq!(options.verbose, 1);
    }

    #[test]
    fn grammar_needs_a_path() {
        assert!(parse_args(&args(&["--grammar"])).is_err());
    }

    #[test]
    fn unknown_flag() {
        assert_eq!(
            parse_args(&args(&["--fast"])),
            Err("unknown option: --fast".to_string())
        );
    }

    #[test]
    fn two_sources_rejected() {
        assert!(parse_args(&args(&["a.sls", "b.sls"])).is_err());
    }

    #[test]
    fn verbosity_directives() {
        assert_eq!(directive_for_verbosity(0), "slsc=warn,sls_front=warn");
        assert_eq!(directive_for_verbosity(5), "slsc=trace,sls_front=trace");
    }
}
