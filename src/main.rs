use clap::Parser;
use spritesort::cli::{Cli, run_cli};
use spritesort::output::OutputFormatter;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run_cli(cli) {
        OutputFormatter::error(&format!("Error: {}", e));
        std::process::exit(1);
    }
}
