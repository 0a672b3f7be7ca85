use std::env;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let raw_args: Vec<String> = env::args().collect();
    if raw_args.get(1).map(|s| s.as_str()) == Some("serve") {
        let port = raw_args
            .get(2)
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(8080);
        let snapshot_path = raw_args.get(3).map(PathBuf::from);
        if let Err(e) = firmsim::api::run_http_server(port, snapshot_path).await {
            eprintln!("Server error: {e}");
            std::process::exit(1);
        }
        return;
    }

    let cli = firmsim::api::Cli::parse();
    if let Err(e) = firmsim::api::run_cli(cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
