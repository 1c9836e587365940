use anyhow::Result;
use clap::Parser;
use dsb_timetable::config::Config;
use dsb_timetable::log_format::init_logger;
use dsb_timetable::DsbClient;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    // Config file filename (with path)
    #[arg(short, long)]
    config: String,

    /// Skip image documents
    #[arg(long)]
    no_images: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logger();
    let args = Args::parse();

    let config = Config::from_file(&args.config)?;
    let client = DsbClient::from_config(&config)?;

    let entries = client.fetch_entries(config.images && !args.no_images).await?;
    println!("{}", serde_json::to_string_pretty(&entries)?);

    Ok(())
}
