mod config;
mod extract;
mod fetch;
mod logger;
mod models;
mod render;
mod search;
mod tui;

use anyhow::Result;
use clap::{Parser, Subcommand};
use config::Config;
use fetch::Fetcher;
use search::SearchQuery;

#[derive(Parser)]
#[command(name = "jobscout")]
#[command(about = "Check a company's LinkedIn jobs page for openings matching a position")]
struct Cli {
    /// Regional LinkedIn subdomain to search (e.g. in, uk, www)
    #[arg(long, global = true, default_value = config::DEFAULT_REGION)]
    region: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive search form (default)
    Form,

    /// Run a single search and print the matches
    Search {
        /// Company name as it appears on LinkedIn
        company: String,

        /// Keyword to look for in job titles
        position: String,

        /// Print matches as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init();

    let config = Config::from_env()?.with_region(&cli.region);
    let fetcher = Fetcher::from_config(&config)?;

    match cli.command.unwrap_or(Commands::Form) {
        Commands::Form => {
            tui::run_form(&fetcher)?;
        }

        Commands::Search {
            company,
            position,
            json,
        } => {
            let query = SearchQuery::new(&company, &position)?;
            if !json {
                eprintln!("Searching for job openings...");
            }
            let jobs = match search::run_query(&fetcher, &query) {
                Ok(jobs) => jobs,
                Err(err) => {
                    eprintln!("{}", render::error_message(&err));
                    std::process::exit(1);
                }
            };

            if json {
                println!("{}", render::results_json(&jobs)?);
            } else {
                print!(
                    "{}",
                    render::results_text(&jobs, &query.position, &query.company)
                );
            }
        }
    }

    Ok(())
}
