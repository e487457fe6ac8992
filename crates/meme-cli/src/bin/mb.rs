//! `mb` helper: parses one command line and reports the requested
//! configuration action through its exit code.

use std::io::{self, Write};
use std::process;

use meme_cli::{build_command, parse_args, HelperExit};

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let cli = match parse_args(args.iter().cloned()) {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    };

    if cli.command.is_none() {
        let mut help = build_command("mb", cli.example);
        if let Err(e) = help.print_help() {
            eprintln!("mb: {e}");
            process::exit(1);
        }
        process::exit(0);
    }

    let (exit, payload) = HelperExit::for_command(cli.command.as_ref());
    if let Some(payload) = payload {
        let mut stdout = io::stdout().lock();
        if let Err(e) = stdout.write_all(payload.as_bytes()).and_then(|()| stdout.flush()) {
            eprintln!("mb: {e}");
            process::exit(1);
        }
    }
    process::exit(exit.code());
}
