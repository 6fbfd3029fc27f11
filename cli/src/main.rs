mod commands;
mod util;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "leafline",
    version,
    about = "Leafline CLI — menu OCR parsing and vegetarian classification"
)]
struct Cli {
    /// API base URL
    #[arg(long, env = "LEAFLINE_API_URL", default_value = "http://localhost:3000")]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check API health
    Health,

    /// Direct API access (like gh api — works with any endpoint)
    Api(commands::api::ApiArgs),

    /// Parse OCR text and classify dishes as vegetarian or not
    Analyze(commands::analyze::AnalyzeArgs),

    /// Submit human corrections for a pending review
    Review(commands::review::ReviewArgs),
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let code = match cli.command {
        Commands::Health => commands::health::run(&cli.api_url).await,
        Commands::Api(args) => commands::api::run(&cli.api_url, args).await,
        Commands::Analyze(args) => commands::analyze::run(&cli.api_url, args).await,
        Commands::Review(args) => commands::review::run(&cli.api_url, args).await,
    };

    std::process::exit(code);
}
