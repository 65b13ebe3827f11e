use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};

use rox::ast_printer::AstPrinter;
use rox::error::{ErrorReporter, EXIT_RUNTIME, EXIT_STATIC, EXIT_USAGE};
use rox::interpreter::{Interpreter, DEFAULT_MAX_DEPTH};
use rox::parser::Parser;
use rox::scanner::Scanner;
use rox::Lox;

#[derive(ClapParser, Debug)]
#[command(version, about = "Lox language interpreter", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    commands: Commands,

    /// Enable logging to app.log
    #[arg(long, global = true)]
    log: bool,

    /// Maximum nesting of Lox calls before "Stack overflow." is raised
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes input from a file, printing each token
    Tokenize {
        filename: Option<PathBuf>,

        /// Print tokens as JSON objects, one per line
        #[arg(long)]
        json: bool,
    },

    /// Parses input from a file as a single expression and prints its AST
    Parse { filename: Option<PathBuf> },

    /// Evaluates input from a file as a single expression and prints the result
    Evaluate { filename: Option<PathBuf> },

    /// Runs input from a file as a Lox program
    Run { filename: Option<PathBuf> },

    /// Starts an interactive prompt
    Repl,
}

/// Reads the contents of a file into a String.
fn read_file(filename: &PathBuf) -> Result<String> {
    info!("Reading file: {:?}", filename);
    let file = File::open(filename).context(format!("Failed to open file {:?}", filename))?;
    let mut reader = BufReader::new(file);
    let mut buf = String::new();

    let bytes = reader
        .read_to_string(&mut buf)
        .context(format!("Failed to read file {:?}", filename))?;

    info!("Read {} bytes from {:?}", bytes, filename);

    Ok(buf)
}

fn init_logger() -> Result<()> {
    let log_file = File::create("app.log").context("Failed to create app.log")?;

    Builder::new()
        .format(|buf, record| {
            let module = record
                .module_path()
                .unwrap_or("<unnamed>")
                .strip_prefix("rox::")
                .unwrap_or(record.module_path().unwrap_or("<unnamed>"));
            writeln!(
                buf,
                "[{}:{}] - {}",
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug)
        .parse_default_env() // RUST_LOG overrides the default level
        .init();

    info!("Logger initialized, writing to app.log");
    Ok(())
}

fn require(filename: Option<PathBuf>) -> PathBuf {
    match filename {
        Some(filename) => filename,
        None => {
            eprintln!("Usage: rox <command> [script]");
            std::process::exit(EXIT_USAGE);
        }
    }
}

fn tokenize(source: &str, json: bool) -> Result<()> {
    let mut tokenized = true;

    for token in Scanner::new(source) {
        match token {
            Ok(token) if json => println!("{}", serde_json::to_string(&token)?),
            Ok(token) => println!("{}", token),
            Err(e) => {
                tokenized = false;
                eprintln!("{}", e);
            }
        }
    }

    if !tokenized {
        debug!("Tokenization failed, exiting with code {}", EXIT_STATIC);
        std::process::exit(EXIT_STATIC);
    }

    Ok(())
}

/// Scan and parse `source` as one expression, exiting on any static error.
fn parse_single_expression(source: &str) -> rox::ast::Expr {
    let mut reporter = ErrorReporter::new();

    let (tokens, lex_errors) = Scanner::new(source).scan_all();
    for e in &lex_errors {
        reporter.error(e);
    }

    let parsed = Parser::new(tokens, &mut reporter).parse_expression();

    match parsed {
        Ok(expr) if !reporter.had_error() => expr,
        Ok(_) => std::process::exit(EXIT_STATIC),
        Err(e) => {
            reporter.error(&e);
            std::process::exit(EXIT_STATIC);
        }
    }
}

fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    if args.log {
        init_logger()?;
    } else {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Off)
            .init();
    }

    info!("CLI arguments: {:?}", args);

    match args.commands {
        Commands::Tokenize { filename, json } => {
            let source = read_file(&require(filename))?;
            tokenize(&source, json)?;
        }

        Commands::Parse { filename } => {
            let source = read_file(&require(filename))?;
            let expr = parse_single_expression(&source);

            println!("{}", AstPrinter::print(&expr));
        }

        Commands::Evaluate { filename } => {
            let source = read_file(&require(filename))?;
            let expr = parse_single_expression(&source);

            let mut interpreter = Interpreter::new().with_max_depth(args.max_depth);
            match interpreter.evaluate_expression(&expr) {
                Ok(value) => println!("{}", value),
                Err(e) => {
                    eprintln!("{}", e);
                    std::process::exit(EXIT_RUNTIME);
                }
            }
        }

        Commands::Run { filename } => {
            let filename = require(filename);
            let interpreter = Interpreter::new().with_max_depth(args.max_depth);
            let mut lox = Lox::with_parts(interpreter, ErrorReporter::new());

            let code = lox
                .run_file(&filename)
                .with_context(|| format!("Failed to run {:?}", filename))?;

            info!("Run finished with exit code {}", code);
            if code != 0 {
                std::process::exit(code);
            }
        }

        Commands::Repl => {
            let interpreter = Interpreter::new().with_max_depth(args.max_depth);
            let mut lox = Lox::with_parts(interpreter, ErrorReporter::new());

            lox.run_prompt(io::stdin().lock(), io::stdout())?;
        }
    }

    Ok(())
}
