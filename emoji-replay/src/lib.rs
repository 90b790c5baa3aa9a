//! # Emoji Canvas Replay
//!
//! Headless host for the emoji canvas engine. Reads a JSON script describing
//! a starting document and a sequence of input steps, feeds every step to a
//! [`GestureCoordinator`](emoji_core::GestureCoordinator), then prints a JSON
//! report of the final document, view transform and render frame.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p emoji-replay -- --script session.json --pretty
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `ReplayConfig` - Resolved paths, viewport override and output options
//! - `Script` / `Step` - The serde model of a replay script
//! - `Replay` - Owns the document and coordinator while steps run

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

mod runner;
mod script;

pub use runner::{run_script, Replay, Report, StepReport};
pub use script::{GlyphSeed, Script, ScriptError, Step};

use std::path::PathBuf;

use clap::Parser;
use emoji_core::{EngineConfig, Size};

/// Command-line arguments for emoji-replay.
#[derive(Debug, Clone, Parser)]
#[command(name = "emoji-replay")]
#[command(about = "Replay gesture scripts against the emoji canvas engine")]
#[command(version)]
pub struct CliArgs {
    /// Script to replay
    #[arg(long, env = "EMOJI_REPLAY_SCRIPT")]
    pub script: PathBuf,

    /// Engine configuration file (JSON)
    #[arg(long, env = "EMOJI_REPLAY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the script's viewport width
    #[arg(long, requires = "height")]
    pub width: Option<f32>,

    /// Override the script's viewport height
    #[arg(long, requires = "width")]
    pub height: Option<f32>,

    /// Pretty-print the JSON report
    #[arg(long)]
    pub pretty: bool,
}

/// Replay configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayConfig {
    /// Script to replay.
    pub script: PathBuf,
    /// Engine configuration file, if any.
    pub config: Option<PathBuf>,
    /// Viewport that replaces the script's own.
    pub viewport: Option<Size>,
    /// Pretty-print the report.
    pub pretty: bool,
}

impl From<CliArgs> for ReplayConfig {
    fn from(args: CliArgs) -> Self {
        Self {
            script: args.script,
            config: args.config,
            viewport: args.width.zip(args.height).map(|(w, h)| Size::new(w, h)),
            pretty: args.pretty,
        }
    }
}

impl ReplayConfig {
    /// Load the engine configuration, falling back to defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed.
    pub fn engine_config(&self) -> Result<EngineConfig, ScriptError> {
        match &self.config {
            Some(path) => Ok(EngineConfig::from_json(&script::read(path)?)?),
            None => Ok(EngineConfig::default()),
        }
    }

    /// Load the script, applying the viewport override.
    ///
    /// # Errors
    ///
    /// Returns an error if the script cannot be read or parsed.
    pub fn load_script(&self) -> Result<Script, ScriptError> {
        let mut script = Script::load(&self.script)?;
        if let Some(viewport) = self.viewport {
            script.viewport = viewport;
        }
        Ok(script)
    }

    /// Load everything, replay, and serialize the report.
    ///
    /// # Errors
    ///
    /// Returns the first load, replay or serialization error.
    pub fn run(&self) -> Result<String, ScriptError> {
        let engine = self.engine_config()?;
        let script = self.load_script()?;
        tracing::info!(
            steps = script.steps.len(),
            glyphs = script.glyphs.len(),
            "Replaying {} at {}x{}",
            self.script.display(),
            script.viewport.width,
            script.viewport.height
        );
        let report = run_script(&script, engine)?;
        let json = if self.pretty {
            serde_json::to_string_pretty(&report)?
        } else {
            serde_json::to_string(&report)?
        };
        Ok(json)
    }
}
