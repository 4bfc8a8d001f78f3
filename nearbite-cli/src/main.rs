//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

fn main() {
    nearbite_cli::init_logging();
    if let Err(err) = nearbite_cli::run() {
        eprintln!("nearbite: {err}");
        std::process::exit(1);
    }
}
