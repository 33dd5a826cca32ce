//! Terminal display and formatting utilities.
//!
//! Handles colorized JSON output and token status rendering for
//! human-readable terminal output.

use std::io::IsTerminal;

pub mod json_printer;
pub mod token_status;

/// Whether human-readable output should carry ANSI colors.
///
/// Colors are used only when stdout is a terminal and `NO_COLOR` is unset.
pub fn should_use_color() -> bool {
    std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

/// Print a section header such as `--- Header ---`.
pub fn print_section(title: &str, use_color: bool) {
    use colored::Colorize;

    let line = format!("--- {title} ---");
    if use_color {
        println!("{}", line.bold().cyan());
    } else {
        println!("{line}");
    }
}
