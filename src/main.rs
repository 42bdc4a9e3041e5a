//! WaniKani CLI - Query the WaniKani API from the terminal
//!
//! Each command fetches one resource through the caching client and prints it
//! as pretty JSON on stdout. Logs go to stderr.

use std::error::Error;

use clap::Parser;
use serde::Serialize;
use serde_json::json;
use tracing::level_filters::LevelFilter;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use wanikani::cache::CacheStore;
use wanikani::cli::{Cli, Command};
use wanikani::WaniKaniClient;

/// Installs a stderr subscriber; `RUST_LOG` takes precedence over `-v`
fn init_tracing(verbose: bool) {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Runs an API command against the client
async fn run_command(client: &WaniKaniClient, command: &Command) -> Result<(), Box<dyn Error>> {
    match command {
        Command::User => print_json(&client.user().get().await?),
        Command::Summary => print_json(&client.summary().get().await?),
        Command::Status => {
            let (user, summary) =
                futures::try_join!(client.user().get(), client.summary().get())?;
            let now = chrono::Utc::now();
            print_json(&json!({
                "username": user.username,
                "level": user.level,
                "on_vacation": user.on_vacation(),
                "lessons_available": summary.lessons_available_at(now),
                "reviews_available": summary.reviews_available_at(now),
                "next_reviews_at": summary.next_reviews_at,
            }))
        }
        Command::Subjects {
            id: Some(id), ..
        } => print_json(&client.subjects().get(*id).await?),
        Command::Subjects {
            updated_after,
            id: None,
        } => print_json(&client.subjects().list(*updated_after).await?),
        Command::Assignments { updated_after } => {
            print_json(&client.assignments().list(*updated_after).await?)
        }
        Command::Reviews { updated_after } => {
            print_json(&client.reviews().list(*updated_after).await?)
        }
        Command::StudyMaterials { updated_after } => {
            print_json(&client.study_materials().list(*updated_after).await?)
        }
        Command::Prune { .. } => Ok(()),
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    if let Some(max_age) = cli.prune_max_age() {
        let store = CacheStore::new(cli.resolve_cache_dir()?);
        let removed = store.prune(max_age);
        info!(removed, dir = %store.dir().display(), "pruned cache");
        println!(
            "Removed {} cached response(s) from {}",
            removed,
            store.dir().display()
        );
        return Ok(());
    }

    let config = cli.client_config()?;
    debug!(cache_dir = %config.cache_dir.display(), no_cache = cli.no_cache, "starting client");
    let client = WaniKaniClient::new(config, cli.cache_ttls()?)?;
    run_command(&client, &cli.command).await
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli).await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }

    Ok(())
}
