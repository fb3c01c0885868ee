// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Headless UI side of the mockup bridge.
//!
//! Reads one protocol record per line on stdin (the host channel), feeds it
//! through the UI runtime and writes any UI → host records to stdout. Logs go
//! to stderr.

mod bridge;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use mockup_app_core::prefs::BridgePrefs;
use mockup_config_fs::FsConfigStore;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::bridge::{build_runtime, load_prefs, run, BridgeSettings};

#[derive(Parser, Debug)]
#[command(author, version, about = "Mockup bridge (UI side) over stdin/stdout")]
struct Args {
    /// Capture width in pixels (overrides saved preferences)
    #[arg(long)]
    width: Option<u32>,
    /// Capture height in pixels (overrides saved preferences)
    #[arg(long)]
    height: Option<u32>,
    /// Device model: iphone or laptop
    #[arg(long)]
    model: Option<String>,
    /// Directory holding preference files (defaults to the platform config dir)
    #[arg(long)]
    config_dir: Option<PathBuf>,
}

fn open_prefs(config_dir: Option<&Path>) -> BridgePrefs {
    let store = match config_dir {
        Some(dir) => FsConfigStore::at(dir),
        None => FsConfigStore::new(),
    };
    match store {
        Ok(store) => load_prefs(store),
        Err(err) => {
            warn!(error = %err, "config store unavailable; using default preferences");
            BridgePrefs::default()
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let prefs = open_prefs(args.config_dir.as_deref());
    let settings = BridgeSettings::resolve(&prefs, args.width, args.height, args.model.as_deref());
    info!(
        model = settings.model.key,
        width = settings.request.width,
        height = settings.request.height,
        "mockup bridge ready"
    );

    let mut runtime = build_runtime(&settings);
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    run(&mut runtime, stdin, tokio::io::stdout()).await
}
