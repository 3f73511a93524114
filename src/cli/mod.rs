//! Command-line interface
//!
//! Serving is the default; `predict` and `inspect` work directly on a bundle
//! file without starting the server.

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::*;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::bundle::ModelBundle;
use crate::features::FeatureRecord;
use crate::inference::PriceEstimator;
use crate::predictor::{Model, Regressor};

// ─── Styling helpers ───────────────────────────────────────────────────────────

fn dim(s: &str) -> ColoredString   { s.truecolor(100, 100, 100) }
fn muted(s: &str) -> ColoredString { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString    { s.truecolor(100, 210, 120) }

fn kv(key: &str, val: &str) -> String {
    format!("{} {}", muted(key), val.white())
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

// ─── Arguments ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "house-price", version, about = "House price prediction service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the prediction API (default when no command is given)
    Serve {
        /// Server port [env: API_PORT, default: 9696]
        #[arg(short, long)]
        port: Option<u16>,

        /// Server host [env: API_HOST, default: 0.0.0.0]
        #[arg(long)]
        host: Option<String>,

        /// Model bundle path [env: MODEL_PATH, default: model.bin]
        #[arg(short, long)]
        model: Option<PathBuf>,
    },

    /// Predict the price for one JSON feature record
    Predict {
        /// Model bundle path
        #[arg(short, long, default_value = "model.bin")]
        model: PathBuf,

        /// JSON file holding the feature record, or `-` for stdin
        #[arg(short, long, default_value = "-")]
        input: String,
    },

    /// Show the feature columns and model kind stored in a bundle
    Inspect {
        /// Model bundle path
        #[arg(short, long, default_value = "model.bin")]
        model: PathBuf,
    },
}

// ─── Serve ─────────────────────────────────────────────────────────────────────

pub async fn cmd_serve(
    host: Option<String>,
    port: Option<u16>,
    model: Option<PathBuf>,
) -> anyhow::Result<()> {
    use crate::server::{run_server, ServerConfig};

    let defaults = ServerConfig::default();
    let config = ServerConfig {
        host: host.unwrap_or(defaults.host),
        port: port.unwrap_or(defaults.port),
        model_path: model.unwrap_or(defaults.model_path),
        ..defaults
    };

    run_server(config).await
}

// ─── Predict ───────────────────────────────────────────────────────────────────

fn read_record(input: &str) -> anyhow::Result<FeatureRecord> {
    let raw = if input == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(input).with_context(|| format!("failed to read {}", input))?
    };

    let value: serde_json::Value =
        serde_json::from_str(&raw).context("input is not valid JSON")?;
    Ok(FeatureRecord::from_json(value)?)
}

fn load_bundle(path: &Path) -> anyhow::Result<ModelBundle> {
    ModelBundle::load(path)
        .with_context(|| format!("failed to load model bundle from {}", path.display()))
}

pub fn cmd_predict(model: &Path, input: &str) -> anyhow::Result<()> {
    let record = read_record(input)?;
    let estimator = PriceEstimator::new(Arc::new(load_bundle(model)?));
    let estimate = estimator.estimate(&record)?;

    section("Prediction");
    println!("  {}", kv("log price ", &format!("{:.6}", estimate.log_price)));
    println!("  {}", kv("price (₹) ", &format!("{:.2}", estimate.price)));
    println!();
    Ok(())
}

// ─── Inspect ───────────────────────────────────────────────────────────────────

pub fn cmd_inspect(model: &Path) -> anyhow::Result<()> {
    let bundle = load_bundle(model)?;

    section("Model bundle");
    println!("  {}", kv("path      ", &model.display().to_string()));
    println!("  {}", kv("model     ", bundle.model.kind()));
    println!("  {}", kv("model in  ", &bundle.model.n_features().to_string()));
    println!("  {}", kv("dv out    ", &bundle.dv.n_features().to_string()));
    for (label, value) in model_details(&bundle.model) {
        println!("  {}", kv(label, &value));
    }

    if bundle.dv.n_features() == bundle.model.n_features() {
        println!("  {} {}", ok("✓"), "vectorizer and model widths agree");
    } else {
        println!("  {} {}", "✗".red(), "vectorizer and model widths differ");
    }

    section("Feature columns");
    for (idx, name) in bundle.dv.feature_names().iter().enumerate() {
        println!("  {} {}", dim(&format!("{:>4}", idx)), name);
    }
    println!();
    Ok(())
}

/// Model-specific lines for `inspect`
fn model_details(model: &Model) -> Vec<(&'static str, String)> {
    match model {
        Model::Linear(_) => Vec::new(),
        Model::TreeEnsemble(m) => vec![
            ("trees     ", m.n_trees().to_string()),
            ("max depth ", m.max_depth().to_string()),
        ],
    }
}
