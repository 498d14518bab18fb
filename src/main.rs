use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use clap::{Parser, Subcommand};
use log::debug;
use pasint_core::language::ErrorKind;
use pasint_core::{CoreError, Session};
use config::load_config;

mod commands;
mod config;

const EXIT_DATA_ERROR: u8 = 65;
const EXIT_SOFTWARE_ERROR: u8 = 70;
const EXIT_IO_ERROR: u8 = 74;

#[derive(Parser, Debug)]
#[command(name = "pasint")]
#[command(about = "Interpreter for a small Pascal subset.")]
struct Cli {
    /// Config file; defaults to ./pasint.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a program file and print its variables.
    Run { file: PathBuf },
    /// Evaluate a single expression.
    Eval { expression: String },
    /// Print the token stream of a file.
    Tokens { file: PathBuf },
    /// Print the parsed syntax tree of a file as source.
    Ast { file: PathBuf },
    Repl,
}

fn try_main(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(cli.config.as_deref())?;
    let console_level = config.logging.console_filter(cli.verbose)?;
    let file_level = config.logging.file_filter()?;
    pasint_logger::init(config.logging.directory.as_ref(), console_level, file_level)?;
    debug!("loaded config: {:?}", config);

    let mut session = Session::new(config.interpreter);

    match cli.command.unwrap_or(Commands::Repl) {
        Commands::Run { file } => commands::run::run_file(&mut session, &file, cli.json),
        Commands::Eval { expression } => commands::run::eval(&mut session, expression, cli.json),
        Commands::Tokens { file } => commands::run::tokens(&mut session, &file, cli.json),
        Commands::Ast { file } => commands::run::ast(&mut session, &file, cli.json),
        Commands::Repl => {
            let stdin = io::stdin();
            commands::repl::repl(&mut session, stdin.lock(), io::stdout(), cli.json)?;
            Ok(())
        },
    }
}

fn exit_code(err: &(dyn std::error::Error + 'static)) -> u8 {
    match err.downcast_ref::<CoreError>().map(CoreError::kind) {
        Some(ErrorKind::Lexical | ErrorKind::Syntax) => EXIT_DATA_ERROR,
        Some(_) => EXIT_SOFTWARE_ERROR,
        None => EXIT_IO_ERROR,
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match try_main(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::from(exit_code(e.as_ref()))
        },
    }
}
