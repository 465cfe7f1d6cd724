use clap::Parser;
use nwbpack::{PackageArgs, package, reset_sigpipe};

fn main() {
    reset_sigpipe();

    let args = PackageArgs::parse();

    match package(&args) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
