use std::io::{self, BufRead, Write};
use log::debug;
use pasint_core::language::token::TokenKind;
use pasint_core::{tokenize, Command, Session};
use super::render;

const PROMPT: &str = "pasint> ";
const EXIT_COMMAND: &str = "bye";

/// Picks the command for one REPL line, or `None` for blank input.
pub fn classify(line: &str) -> Option<Command> {
    let source = line.trim();
    if source.is_empty() {
        return None;
    }
    let is_program = tokenize(source)
        .next_token()
        .is_ok_and(|token| token.is(TokenKind::ProgramKeyword));

    let source = source.to_string();
    if is_program {
        Some(Command::RunProgram { source })
    } else {
        Some(Command::EvaluateExpression { source })
    }
}

/// Reads lines until `bye` or end of input. Errors are printed and the loop
/// carries on with the same session.
pub fn repl<R: BufRead, W: Write>(
    session: &mut Session,
    input: R,
    mut output: W,
    json: bool,
) -> io::Result<()> {
    let mut lines = input.lines();

    loop {
        write!(output, "{}", PROMPT)?;
        output.flush()?;

        let Some(line) = lines.next() else {
            writeln!(output)?;
            break;
        };
        let line = line?;

        if line.trim().eq_ignore_ascii_case(EXIT_COMMAND) {
            debug!("leaving repl");
            writeln!(output, "{}", EXIT_COMMAND)?;
            break;
        }

        let Some(command) = classify(&line) else {
            continue;
        };

        let response = session.execute(command);
        match render(&response, json) {
            Ok(text) => writeln!(output, "{}", text)?,
            Err(e) => writeln!(output, "{}", e)?,
        }
    }

    Ok(())
}
