//! PageCraft Replay - headless playback of recorded editing sessions.

mod script;

use clap::Parser;
use pagecraft_core::{Document, Editor, EditorConfig};
use script::{ReplayError, ReplayResult, parse_script, read_file, run_script};
use std::path::{Path, PathBuf};

/// Replay a recorded editing session against a document and print the result
#[derive(Parser, Debug)]
#[command(name = "pagecraft-replay")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Document JSON to start from
    document: PathBuf,

    /// Script JSON: an array of recorded steps
    script: PathBuf,

    /// Editor config JSON
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Snap tolerance in pixels (overrides the config file)
    #[arg(short, long)]
    tolerance: Option<f64>,

    /// Disable snapping to sibling edges
    #[arg(long)]
    no_snap: bool,

    /// Also print the recorded command log
    #[arg(long)]
    history: bool,
}

impl Cli {
    fn editor_config(&self) -> ReplayResult<EditorConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => EditorConfig::default(),
        };
        if let Some(tolerance) = self.tolerance {
            config.snap_tolerance = tolerance;
        }
        if self.no_snap {
            config.snap_enabled = false;
        }
        Ok(config)
    }
}

fn load_config(path: &Path) -> ReplayResult<EditorConfig> {
    EditorConfig::from_json(&read_file(path)?).map_err(ReplayError::Config)
}

fn load_document(path: &Path) -> ReplayResult<Document> {
    Ok(Document::from_json(&read_file(path)?)?)
}

fn main() -> Result<(), ReplayError> {
    env_logger::init();
    let cli = Cli::parse();

    let config = cli.editor_config()?;
    let document = load_document(&cli.document)?;
    let steps = parse_script(&read_file(&cli.script)?)?;
    log::info!(
        "loaded {} block(s), {} step(s) from {}",
        document.len(),
        steps.len(),
        cli.script.display()
    );

    let mut editor = Editor::with_config(document, config);
    run_script(&mut editor, &steps)?;

    println!("{}", editor.export_json().map_err(ReplayError::Export)?);
    if cli.history {
        println!("{}", editor.history().to_json().map_err(ReplayError::Export)?);
    }
    Ok(())
}
