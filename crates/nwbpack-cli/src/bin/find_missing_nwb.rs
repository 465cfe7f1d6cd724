use clap::Parser;
use nwbpack::{FindMissingArgs, find_missing, reset_sigpipe};

fn main() {
    reset_sigpipe();

    let args = FindMissingArgs::parse();

    match find_missing(&args) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
