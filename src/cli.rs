use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use log::info;
use setlist_export::clients::errors::Result;
use setlist_export::exporter::MissingFieldPolicy;
use setlist_export::job::{ConfigBuilder, ExportJob};

#[derive(Parser)]
#[command(name = "setlist-export")]
#[command(version, about = "Export attended concerts from setlist.fm to Excel", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a user's attended concerts and write them to a spreadsheet
    Export {
        /// setlist.fm username
        username: String,
        /// Output file, defaults to concerts_<USERNAME>.xlsx
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Pause between page requests in milliseconds
        #[arg(long, default_value_t = 2000)]
        delay_ms: u64,
        /// Leave out concerts with missing fields instead of failing
        #[arg(long)]
        skip_incomplete: bool,
    },
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Export {
            username,
            output,
            delay_ms,
            skip_incomplete,
        } => {
            let policy = if skip_incomplete {
                MissingFieldPolicy::Skip
            } else {
                MissingFieldPolicy::Fail
            };
            export(username, output, Duration::from_millis(delay_ms), policy).await?;
        }
    }
    Ok(())
}

async fn export(
    username: String,
    output: Option<PathBuf>,
    delay: Duration,
    policy: MissingFieldPolicy,
) -> Result<()> {
    info!("Building config ...");
    let config = ConfigBuilder::new(username)
        .delay(delay)
        .output(output)
        .missing_fields(policy)
        .build()?;
    ExportJob::new(config).run().await?;
    Ok(())
}
