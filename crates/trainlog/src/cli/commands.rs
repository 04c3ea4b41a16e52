//! # CLI Layer
//!
//! One possible UI client for trainlog. This is the only place that:
//! - Knows about stdout/stderr
//! - Reads and writes user-named files (import/export)
//! - Sets up logging
//!
//! Flow: parse arguments → load config → initialize tracing → open the API
//! over the file store → dispatch → render. `import` opens without the base
//! source.

use super::render::{render, Layout};
use super::setup::{AddCommands, Cli, Commands, OutputFormat};
use anyhow::Context;
use clap::Parser;
use std::fs;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use trainlogapp::api::TrainlogApi;
use trainlogapp::commands::{CmdMessage, CmdResult};
use trainlogapp::config::TrainlogConfig;
use trainlogapp::overlay::PatchFields;
use trainlogapp::source::BaseSource;
use trainlogapp::store::fs::FileStore;
use trainlogapp::store::fs_backend::FsBackend;

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => TrainlogConfig::load_with(Some(path))?,
        None => TrainlogConfig::load()?,
    };
    let data_dir = config.data_dir()?;
    let source = config.base_source();
    tracing::debug!(data_dir = %data_dir.display(), source = %source.describe(), "starting");

    let store = FileStore::with_limit(data_dir, config.max_value_bytes);
    // import replaces the base, so it must work when the source is unreachable
    let api = match cli.command {
        Commands::Import { .. } => TrainlogApi::open_stored(store)?,
        _ => TrainlogApi::open(store, source.as_ref())
            .with_context(|| format!("opening training log from {}", source.describe()))?,
    };
    let mut api = api.with_search_limit(config.search_limit);

    let (result, layout) = dispatch(&mut api, cli.command, source.as_ref(), cli.output)?;
    print!("{}", render(&result, layout, cli.output));
    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("TRAINLOG_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    // A second init (tests) is harmless.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

fn dispatch(
    api: &mut TrainlogApi<FsBackend>,
    command: Commands,
    source: &dyn BaseSource,
    output: OutputFormat,
) -> anyhow::Result<(CmdResult, Layout)> {
    let outcome = match command {
        Commands::Show { entry } => (api.view(&entry)?, Layout::Detail),
        Commands::Edit {
            entry,
            work,
            videos,
            clear_videos,
            lifter,
            coach,
        } => {
            let videos = if clear_videos {
                Some(Vec::new())
            } else if videos.is_empty() {
                None
            } else {
                Some(videos)
            };
            let fields = PatchFields {
                work,
                videos,
                lifter_comment: lifter,
                coach_comment: coach,
            };
            (api.edit(&entry, fields)?, Layout::Detail)
        }
        Commands::Revert { entry, all } => match entry {
            Some(entry) if !all => (api.revert(&entry)?, Layout::Detail),
            _ => (api.revert_all()?, Layout::Messages),
        },
        Commands::History { period, name } => {
            (api.history(&period, &name.join(" "))?, Layout::List)
        }
        Commands::Search { query, limit } => {
            (api.search(&query.join(" "), limit)?, Layout::List)
        }
        Commands::Tree { route } => (api.tree(route.as_deref())?, Layout::Outline),
        Commands::Add { what } => {
            let result = match what {
                AddCommands::Period { name } => api.add_period(&name.join(" "))?,
                AddCommands::Block { period, number } => api.add_child(&period, &number, None)?,
                AddCommands::Week { block, number } => api.add_child(&block, &number, None)?,
                AddCommands::Day {
                    week,
                    number,
                    label,
                } => api.add_child(&week, &number, label.as_deref())?,
                AddCommands::Exercise { day, name } => {
                    api.add_child(&day, &name.join(" "), None)?
                }
            };
            (result, Layout::Detail)
        }
        Commands::Rename { period, name } => {
            (api.rename_period(&period, &name.join(" "))?, Layout::Messages)
        }
        Commands::Remove { route } => (api.remove(&route)?, Layout::Messages),
        Commands::Export { file, bake } => {
            let mut result = api.export(bake)?;
            let doc = result
                .document
                .take()
                .context("export produced no document")?;
            let json = doc.to_json_pretty()?;
            match file {
                Some(path) => {
                    fs::write(&path, format!("{}\n", json))
                        .with_context(|| format!("writing {}", path.display()))?;
                    result.add_message(CmdMessage::success(format!(
                        "Exported to {}",
                        path.display()
                    )));
                }
                // stdout carries the document; messages would corrupt it
                None if output == OutputFormat::Text => {
                    println!("{}", json);
                    for message in &result.messages {
                        eprintln!("{}", message.content);
                    }
                    result.messages.clear();
                }
                None => result.document = Some(doc),
            }
            (result, Layout::Messages)
        }
        Commands::Import { file } => {
            let raw = fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            (api.import(&raw)?, Layout::Messages)
        }
        Commands::Reset { clear_edits } => (api.reset(source, clear_edits)?, Layout::Messages),
    };
    Ok(outcome)
}
