use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use tasbeeh::cli::Cli;
use tasbeeh::cli::commands::Commands;
use tasbeeh::config::Config;
use tasbeeh::domain::{Period, Tasbeeh, TasbeehInput, TasbeehUpdate};
use tasbeeh::storage::{FileBackend, TasbeehStorage};
use tasbeeh::store::TasbeehStore;

fn setup_logging() -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tasbeeh")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("tasbeeh.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

async fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    // Composition root: the store is an explicit instance, not a global
    let backend = Arc::new(FileBackend::new(&config.data_dir));
    let storage = TasbeehStorage::new(backend, &config.key_prefix);
    let store = TasbeehStore::new(storage);
    store
        .load_from_storage()
        .await
        .context("Failed to load counters from storage")?;

    match &cli.command {
        None => {
            // Default: show the list
            handle_list(&store, None, false, false, None)
        }
        Some(Commands::Add {
            name,
            target,
            period,
            arabic,
            translation,
        }) => {
            handle_add(
                &store,
                name,
                *target,
                *period,
                arabic.clone(),
                translation.clone(),
            )
            .await
        }
        Some(Commands::List {
            period,
            completed,
            incomplete,
            search,
        }) => handle_list(&store, *period, *completed, *incomplete, search.as_deref()),
        Some(Commands::Show { id }) => handle_show(&store, id),
        Some(Commands::Count { id, by }) => handle_count(&store, id, *by).await,
        Some(Commands::Undo { id, by }) => handle_undo(&store, id, *by).await,
        Some(Commands::Reset { id }) => handle_reset(&store, id).await,
        Some(Commands::ResetAll) => handle_reset_all(&store).await,
        Some(Commands::Edit {
            id,
            name,
            target,
            period,
            arabic,
            translation,
        }) => {
            handle_edit(
                &store,
                id,
                name.clone(),
                *target,
                *period,
                arabic.clone(),
                translation.clone(),
            )
            .await
        }
        Some(Commands::Delete { ids }) => handle_delete(&store, ids).await,
        Some(Commands::Clear) => handle_clear(&store).await,
    }
}

async fn handle_add(
    store: &TasbeehStore,
    name: &str,
    target: u32,
    period: Period,
    arabic: Option<String>,
    translation: Option<String>,
) -> Result<()> {
    // Form validation lives here, not in the storage layer
    if name.trim().is_empty() {
        eyre::bail!("Please enter a name for the tasbeeh.");
    }
    if target == 0 {
        eyre::bail!("Target count must be a positive number.");
    }

    let tasbeeh = store
        .add(TasbeehInput {
            name: name.trim().to_string(),
            arabic_text: arabic,
            translation,
            target_count: target,
            period,
        })
        .await
        .context("Failed to save new tasbeeh")?;

    info!("Created tasbeeh {}", tasbeeh.id);
    println!(
        "{} {} ({}, target {})",
        "Created:".green(),
        tasbeeh.name,
        tasbeeh.id,
        tasbeeh.target_count
    );
    Ok(())
}

fn handle_list(
    store: &TasbeehStore,
    period: Option<Period>,
    completed: bool,
    incomplete: bool,
    search: Option<&str>,
) -> Result<()> {
    let needle = search.map(str::to_lowercase);
    let tasbeehs: Vec<Tasbeeh> = store
        .snapshot()
        .into_iter()
        .filter(|t| period.is_none_or(|p| t.period == p))
        .filter(|t| !completed || t.is_complete())
        .filter(|t| !incomplete || !t.is_complete())
        .filter(|t| {
            needle
                .as_ref()
                .is_none_or(|q| t.name.to_lowercase().contains(q))
        })
        .collect();

    if tasbeehs.is_empty() {
        println!("{}", "No counters found.".yellow());
        return Ok(());
    }

    for tasbeeh in &tasbeehs {
        println!("{}", format_line(tasbeeh));
    }
    println!("{} counter(s)", tasbeehs.len());
    Ok(())
}

fn handle_show(store: &TasbeehStore, id: &str) -> Result<()> {
    let Some(tasbeeh) = store.get(id) else {
        eyre::bail!("Tasbeeh not found: {id}");
    };

    println!("{} {}", "Name:".bold(), tasbeeh.name);
    if let Some(arabic) = &tasbeeh.arabic_text {
        println!("{} {}", "Arabic:".bold(), arabic);
    }
    if let Some(translation) = &tasbeeh.translation {
        println!("{} {}", "Translation:".bold(), translation);
    }
    println!("{} {}", "Period:".bold(), tasbeeh.period.label());
    println!(
        "{} {}/{} ({}%)",
        "Count:".bold(),
        tasbeeh.current_count,
        tasbeeh.target_count,
        tasbeeh.progress()
    );
    if tasbeeh.is_complete() {
        println!("{}", "Completed".green());
    }
    println!("{} {}", "Created:".bold(), tasbeeh.created_at);
    println!("{} {}", "Updated:".bold(), tasbeeh.updated_at);
    Ok(())
}

async fn handle_count(store: &TasbeehStore, id: &str, by: u32) -> Result<()> {
    let tasbeeh = store
        .increment_count(id, by)
        .await
        .context("Failed to increment counter")?;

    println!("{}", format_line(&tasbeeh));
    if tasbeeh.is_complete() {
        println!("{}", "Completed!".green().bold());
    }
    Ok(())
}

async fn handle_undo(store: &TasbeehStore, id: &str, by: u32) -> Result<()> {
    let tasbeeh = store
        .decrement_count(id, by)
        .await
        .context("Failed to decrement counter")?;

    println!("{}", format_line(&tasbeeh));
    Ok(())
}

async fn handle_reset(store: &TasbeehStore, id: &str) -> Result<()> {
    let tasbeeh = store
        .reset_count(id)
        .await
        .context("Failed to reset counter")?;

    println!("{} {}", "Reset:".yellow(), tasbeeh.name);
    Ok(())
}

async fn handle_reset_all(store: &TasbeehStore) -> Result<()> {
    store
        .reset_all()
        .await
        .context("Failed to reset counters")?;

    println!("{}", "All counters reset to zero.".yellow());
    Ok(())
}

async fn handle_edit(
    store: &TasbeehStore,
    id: &str,
    name: Option<String>,
    target: Option<u32>,
    period: Option<Period>,
    arabic: Option<String>,
    translation: Option<String>,
) -> Result<()> {
    if let Some(name) = &name {
        if name.trim().is_empty() {
            eyre::bail!("Please enter a name for the tasbeeh.");
        }
    }
    if target == Some(0) {
        eyre::bail!("Target count must be a positive number.");
    }

    let tasbeeh = store
        .update(
            id,
            TasbeehUpdate {
                name: name.map(|n| n.trim().to_string()),
                arabic_text: arabic,
                translation,
                target_count: target,
                period,
                current_count: None,
            },
        )
        .await
        .context("Failed to update tasbeeh")?;

    println!("{} {}", "Updated:".green(), tasbeeh.name);
    Ok(())
}

async fn handle_delete(store: &TasbeehStore, ids: &[String]) -> Result<()> {
    for id in ids {
        if store.delete(id).await.context("Failed to delete tasbeeh")? {
            println!("{} {}", "Deleted:".red(), id);
        } else {
            println!("{} {}", "Not found:".yellow(), id);
        }
    }
    Ok(())
}

async fn handle_clear(store: &TasbeehStore) -> Result<()> {
    store
        .clear()
        .await
        .context("Failed to clear the collection")?;

    println!("{}", "All counters removed.".red());
    Ok(())
}

fn format_line(tasbeeh: &Tasbeeh) -> String {
    let progress = format!(
        "{}/{} ({}%)",
        tasbeeh.current_count,
        tasbeeh.target_count,
        tasbeeh.progress()
    );
    let marker = if tasbeeh.is_complete() {
        "done".green().to_string()
    } else {
        "open".normal().to_string()
    };
    format!(
        "{}  {:<24} {:<8} {:<16} [{}]",
        tasbeeh.id,
        tasbeeh.name,
        tasbeeh.period.label(),
        progress,
        marker
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    // Setup logging first
    setup_logging().context("Failed to setup logging")?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, &config)
        .await
        .context("Application failed")?;

    Ok(())
}
