use colored::Colorize;
use std::process;

fn main() {
    if let Err(e) = domestobot::cli::run() {
        log::error!("{}", e);
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(e.exit_code());
    }
}
