mod app;
mod color;
mod config;
mod data;
mod error;
mod render;
mod state;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use app::{DivisionApp, Upload};
use config::MediaConfig;
use render::storage::FsStorage;

/// Split a tabular dataset into train/validation/test sets and chart the
/// distribution of one column in each.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Dataset to upload; without one the empty form is printed
    file: Option<PathBuf>,

    /// Filename reported for the upload (defaults to the file's own name)
    #[arg(long)]
    name: Option<String>,

    /// Directory that receives rendered charts
    #[arg(long, env = "DATASET_DIVISION_MEDIA_ROOT", default_value = "media")]
    media_root: PathBuf,

    /// Public URL prefix for the media directory
    #[arg(long, env = "DATASET_DIVISION_MEDIA_URL", default_value = "/media/")]
    media_url: String,

    /// Write the page context here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn read_upload(path: &Path, name: Option<String>) -> Result<Upload> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let filename = name.unwrap_or_else(|| {
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    });
    Ok(Upload { filename, bytes })
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = MediaConfig::new(cli.media_root, cli.media_url);
    log::debug!("Media config: {config:?}");

    let upload = cli
        .file
        .as_ref()
        .map(|path| read_upload(path, cli.name.clone()))
        .transpose()?;

    let app = DivisionApp::new(FsStorage::new(config));
    let page = app.handle(upload.as_ref());
    if page.is_empty() {
        log::info!("No dataset given, printing the empty form");
    }

    let json = serde_json::to_string_pretty(&page).context("serializing page context")?;
    match &cli.output {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("writing {}", path.display()))?,
        None => println!("{json}"),
    }
    Ok(())
}
