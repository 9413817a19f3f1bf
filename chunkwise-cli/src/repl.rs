use colored::Colorize;
use std::io::{self, BufRead, Write};

const PROMPT: &str = ">>> ";

/// Echo loop: `exit` (any case) or end of input stops it.
pub fn run_repl<R: BufRead, W: Write>(mut input: R, out: &mut W) -> io::Result<()> {
    let mut line = String::new();

    loop {
        write!(out, "{}", PROMPT)?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            return Ok(());
        }

        let entered = line.trim_end_matches(['\r', '\n']);
        if entered.eq_ignore_ascii_case("exit") {
            writeln!(out, "{}", "Exiting program... Goodbye!".yellow())?;
            return Ok(());
        }
        writeln!(out, "You entered: {}", entered)?;
    }
}
