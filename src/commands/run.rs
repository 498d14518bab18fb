use std::fs;
use std::path::Path;
use log::info;
use pasint_core::{Command, Session};
use super::{into_result, render};

fn read_source(path: &Path) -> Result<String, Box<dyn std::error::Error>> {
    info!("reading {}", path.display());
    fs::read_to_string(path)
        .map_err(|e| format!("failed to read '{}': {}", path.display(), e).into())
}

/// Executes one command and prints its response. Failures are still printed
/// in JSON mode before being returned.
pub fn execute(session: &mut Session, command: Command, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let response = session.execute(command);
    if json {
        println!("{}", render(&response, true)?);
    }
    let response = into_result(response)?;
    if !json {
        println!("{}", render(&response, false)?);
    }
    Ok(())
}

pub fn run_file(session: &mut Session, path: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let source = read_source(path)?;
    execute(session, Command::RunProgram { source }, json)
}

pub fn eval(session: &mut Session, expression: String, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    execute(session, Command::EvaluateExpression { source: expression }, json)
}

pub fn tokens(session: &mut Session, path: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let source = read_source(path)?;
    execute(session, Command::Tokenize { source }, json)
}

pub fn ast(session: &mut Session, path: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let source = read_source(path)?;
    execute(session, Command::ParseProgram { source }, json)
}
