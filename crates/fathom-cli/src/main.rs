use clap::Parser;
use fathom_cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let mut stdout = std::io::stdout();
    if let Err(e) = fathom_cli::run(cli, &mut stdout).await {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
