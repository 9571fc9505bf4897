//! Debug commands: `lex` and `parse` for inspecting the front end.

use psil_ir::EvalError;

use super::{read_file, stderr_color};
use crate::diagnostic;

fn fail(path: &str, source: &str, err: impl Into<EvalError>) -> ! {
    eprint!("{}", diagnostic::render(path, source, &err.into(), stderr_color()));
    std::process::exit(1);
}

/// Lex a file and display the token stream.
pub fn lex_file(path: &str) {
    let content = read_file(path);
    println!("Tokens for '{path}':");
    let mut count = 0usize;
    for item in psil_lexer::tokenize(content.chars()) {
        match item {
            Ok(token) => {
                count += 1;
                println!("  {:?} @ {}", token.kind, token.span);
            }
            Err(err) => fail(path, &content, err),
        }
    }
    println!("{count} tokens");
}

/// Parse a file and display its instruction stream.
///
/// Expressions are indented by nesting depth.
pub fn parse_file(path: &str) {
    let content = read_file(path);
    println!("Instructions for '{path}':");
    let mut depth = 0usize;
    for item in psil_parse::parse(psil_lexer::tokenize(content.chars())) {
        let instruction = match item {
            Ok(instruction) => instruction,
            Err(err) => fail(path, &content, err),
        };
        if matches!(instruction, psil_ir::Instruction::Execute(..)) {
            depth = depth.saturating_sub(1);
        }
        println!(
            "  {:>6}  {}{instruction}",
            instruction.span().to_string(),
            "  ".repeat(depth)
        );
        if matches!(instruction, psil_ir::Instruction::NewExpression(_)) {
            depth += 1;
        }
    }
}
