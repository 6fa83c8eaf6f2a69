// src/main.rs
// =============================================================================
// This is the entry point of docs-crawler.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (RUST_LOG overrides the default level)
// 3. Build the crawl configuration (defaults <- config file <- flags)
// 4. Run the crawl and print a summary
// 5. Exit with 0 on success, 1 if the crawl could not run at all
//
// Individual page failures are logged by the crawler and never change the
// exit code.
// =============================================================================

mod cli;
mod config;
mod crawl;
mod extract;

use anyhow::Result;
use clap::Parser;
use cli::Cli;

// The crawl is strictly sequential, so a single-threaded runtime is enough
#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match run(&cli).await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    };

    std::process::exit(exit_code);
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

async fn run(cli: &Cli) -> Result<()> {
    let config = cli.load_config()?;
    config.validate()?;

    println!("Starting crawl of {}", config.source_label());
    println!("Focusing on <{}> elements", config.focus_element);
    match config.max_pages {
        Some(max_pages) => println!("Will process {} pages", max_pages),
        None => println!("Will process all pages"),
    }
    println!("Output will be saved to {}", config.output_file.display());

    let stats = crawl::crawl_docs(&config).await?;

    println!();
    println!("Summary:");
    println!("   Pages written: {}", stats.pages_written);
    println!("   Pages without content: {}", stats.pages_skipped);
    println!("   Failed requests: {}", stats.pages_failed);
    println!("   Links queued: {}", stats.links_queued);
    if stats.reached_limit {
        println!("   Stopped at the page limit");
    }
    println!("\nCrawl complete!");

    Ok(())
}
