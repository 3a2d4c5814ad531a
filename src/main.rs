// src/main.rs

use wormhole::{cli, config, logging, run};

#[tokio::main]
async fn main() {
    if let Err(err) = run_main().await {
        eprintln!("wormhole error: {err:?}");
        std::process::exit(1);
    }
}

async fn run_main() -> anyhow::Result<()> {
    let args = cli::parse();
    let log_path = args.log.clone().unwrap_or_else(config::default_log_path);
    let _log_guard = logging::init_logging(args.log_level, args.quiet, &log_path)?;
    run(args).await
}
