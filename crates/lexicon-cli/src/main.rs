//! Main entry point for the Lexicon command line host.

use anyhow::Result;
use clap::Parser;
use lexicon_cli::{render, run, Args};
use lexicon_common::{init_dev_logging, init_logging};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Configuration first: it carries the logging settings
    let config = args.load_config()?;
    if args.development {
        init_dev_logging()?;
    } else {
        init_logging(config.logging.to_logging_config())?;
    }

    info!(
        content_path = %config.content.path.display(),
        fallback = %config.content.fallback,
        "resolving content"
    );

    let content = match run(&args, &config).await {
        Ok(content) => content,
        Err(e) => {
            error!("Failed to resolve content: {}", e);
            return Err(e.into());
        }
    };

    println!("{}", render(&content)?);
    Ok(())
}
