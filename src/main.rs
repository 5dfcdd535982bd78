use clap::Parser;
use tracing_subscriber::EnvFilter;

use legal_lens::app;
use legal_lens::cli::Args;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Logs go to stderr so stdout carries only the conversation.
    let default_filter = if args.verbose {
        "legal_lens=debug"
    } else {
        "legal_lens=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    app::run(args).await
}
