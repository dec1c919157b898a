// src/main.rs

use anticron::{cli, logging, run};

#[tokio::main]
async fn main() {
    let config = cli::parse();

    if let Err(err) = logging::init_logging() {
        eprintln!("anticron: logging disabled: {err}");
    }

    if let Err(err) = run(&config).await {
        eprintln!("anticron error: {err}");
        std::process::exit(err.exit_code());
    }
}
