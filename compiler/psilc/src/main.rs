//! PSIL command-line interface.

use std::io::IsTerminal;

use psilc::commands::{
    lex_file, parse_file, parse_run_options, run_file, run_repl, run_stdin, RunOptions,
};

fn main() {
    psilc::init_tracing();

    let raw: Vec<String> = std::env::args().skip(1).collect();
    let (options, args) = match parse_run_options(&raw) {
        Ok(parsed) => parsed,
        Err(msg) => {
            eprintln!("error: {msg}");
            std::process::exit(1);
        }
    };

    let Some(command) = args.first() else {
        if std::io::stdin().is_terminal() {
            run_repl(&options);
        } else {
            run_stdin(&options);
        }
        return;
    };

    match command.as_str() {
        "run" => {
            let Some(path) = args.get(1) else {
                eprintln!("Usage: psil run <file.psil> [--max-frames=N]");
                std::process::exit(1);
            };
            run_file(path, &options);
        }
        "lex" => {
            let Some(path) = args.get(1) else {
                eprintln!("Usage: psil lex <file.psil>");
                std::process::exit(1);
            };
            lex_file(path);
        }
        "parse" => {
            let Some(path) = args.get(1) else {
                eprintln!("Usage: psil parse <file.psil>");
                std::process::exit(1);
            };
            parse_file(path);
        }
        "repl" => run_repl(&options),
        "-" => run_stdin(&options),
        "help" | "--help" | "-h" => print_usage(),
        "version" | "--version" | "-V" => {
            println!("psil {}", env!("CARGO_PKG_VERSION"));
        }
        path if path.ends_with(".psil") => run_file(path, &options),
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    let defaults = RunOptions::default();
    println!("PSIL, a postfix stack interpreted language");
    println!();
    println!("Usage: psil [options] [command] [args]");
    println!();
    println!("Commands:");
    println!("  run <file>     Run a PSIL program");
    println!("  <file>.psil    Same as `run <file>.psil`");
    println!("  repl           Start an interactive session");
    println!("  -              Run the program on standard input");
    println!("  lex <file>     Show the token stream (debugging)");
    println!("  parse <file>   Show the instruction stream (debugging)");
    println!("  help           Show this message");
    println!("  version        Show version information");
    println!();
    println!("With no command, starts a session when standard input is a");
    println!("terminal and otherwise runs standard input as a program.");
    println!();
    println!("Options:");
    println!(
        "  --max-frames=N   Call depth limit (default: {})",
        defaults.max_frames
    );
    println!();
    println!("Environment:");
    println!("  RUST_LOG         Enable tracing, e.g. RUST_LOG=psil_eval=debug");
    println!("  PSIL_LOG_TREE    Render tracing spans as a tree");
}
