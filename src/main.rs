//! hcstat - Cost statistics for Gemini-solved grid image challenges

use clap::Parser;
use hcstat::{
    aggregation::{Aggregator, CostReport},
    cli::{Cli, Command},
    data_loader::DataLoader,
    export::export,
    output::get_formatter,
};
use hcstat_classifier::{GeminiClient, ImageClassifier};
use hcstat_core::error::Result;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // --quiet overrides RUST_LOG
    let filter = if cli.quiet {
        tracing_subscriber::EnvFilter::new("warn")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(cli.log_level()))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<()> {
    let show_progress = !cli.json && is_terminal::is_terminal(std::io::stdout());
    if !is_terminal::is_terminal(std::io::stdout()) {
        colored::control::set_override(false);
    }
    let formatter = get_formatter(cli.json);

    match &cli.command {
        Command::Cost { paths, detailed } => {
            let aggregator = Aggregator::new(cli.pricing_table()?).with_progress(show_progress);

            if let [path] = paths.as_slice() {
                info!("Calculating cost for {}", path.display());
                match aggregator.aggregate(path, *detailed)? {
                    CostReport::Total(cost) => println!("{}", formatter.format_total(path, cost)),
                    CostReport::Detailed(stats) => println!("{}", formatter.format_stats(&stats)),
                }
            } else {
                info!("Calculating cost for {} directories", paths.len());
                // A missing root aborts before any directory is scanned
                for path in paths {
                    DataLoader::new(path)?;
                }
                for (path, result) in aggregator.aggregate_many(paths) {
                    match result {
                        Ok(stats) if *detailed => {
                            println!("{}", path.display());
                            println!("{}", formatter.format_stats(&stats));
                        }
                        Ok(stats) => println!("{}", formatter.format_total(&path, stats.total_cost)),
                        Err(e) => return Err(e),
                    }
                }
            }
        }
        Command::Export { path, output } => {
            let aggregator = Aggregator::new(cli.pricing_table()?).with_progress(show_progress);
            let stats = export(&aggregator, path, output.as_deref())?;
            if output.is_none() || cli.json {
                println!("{}", formatter.format_stats(&stats));
            }
        }
        Command::Pricing => {
            let pricing = cli.pricing_table()?;
            println!("{}", formatter.format_pricing(&pricing.entries()));
        }
        Command::Classify {
            image,
            model,
            schema,
            thinking_budget,
            answer_dir,
            api_key,
            base_url,
        } => {
            let mut client = GeminiClient::new(api_key.as_str());
            if let Some(url) = base_url {
                client = client.with_base_url(url.as_str());
            }

            let mut classifier = ImageClassifier::new(client)
                .with_model(model.as_str())
                .with_response_schema(*schema)
                .with_thinking_budget(*thinking_budget);
            if let Some(dir) = answer_dir {
                classifier = classifier.with_answer_dir(dir.clone());
            }

            info!("Solving {} with {}", image.display(), classifier.model());
            let answer = classifier.invoke(image).await?;
            println!("{}", formatter.format_answer(&answer));
        }
    }

    Ok(())
}
