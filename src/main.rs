//! Headless shell: replays a recorded drawing session and writes the resulting PNG.
//!
//!   drawy --script session.json
//!   drawy -s session.json --background photo.jpg --output-dir out/ -v

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;

use drawy::draw::bitmap::Bitmap;
use drawy::draw::save;
use drawy::draw::script::{self, Script};
use drawy::draw::settings_store;
use drawy::draw::{DrawSettings, DrawView, ViewToShell};
use drawy::logging;

#[derive(Parser, Debug)]
#[command(name = "drawy", about = "Replay a drawing session without a display")]
struct CliArgs {
    /// Session script (JSON list of touch samples and shell calls).
    #[arg(short, long, value_name = "SESSION.json")]
    script: PathBuf,

    /// Settings file. Defaults to draw_settings.json next to the executable.
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// Start from this image instead of a blank canvas.
    #[arg(short, long, value_name = "IMAGE")]
    background: Option<PathBuf>,

    /// Export root; the drawing lands in its export subfolder.
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Skip the final export of the drawing.
    #[arg(long)]
    no_export: bool,

    /// Debug-level logging.
    #[arg(short, long)]
    verbose: bool,

    /// Write logs to this file instead of stderr.
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

fn load_settings(args: &CliArgs) -> Result<DrawSettings> {
    let mut settings = match &args.settings {
        Some(path) => settings_store::load_from_path(path)?,
        None => settings_store::load()?,
    };
    if let Some(dir) = &args.output_dir {
        settings.export_root = Some(dir.to_string_lossy().into_owned());
    }
    Ok(settings)
}

fn script_base_dir(script: &Path) -> PathBuf {
    script
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn main() -> Result<()> {
    let args = CliArgs::parse();
    let settings = load_settings(&args)?;
    logging::init(args.verbose || settings.debug_logging, args.log_file.clone());

    let (tx, rx) = std::sync::mpsc::channel();
    let mut view = DrawView::new(&settings)?.with_notifier(tx);
    if let Some(background) = &args.background {
        view.reset_canvas_bitmap(Bitmap::load(background)?);
    }

    let session = Script::load(&args.script)?;
    let report = script::replay(&mut view, &session, &settings, &script_base_dir(&args.script))
        .with_context(|| format!("replay {}", args.script.display()))?;

    for message in rx.try_iter() {
        if let ViewToShell::ModeChanged { to, .. } = message {
            tracing::debug!(?to, "toolbar would switch controls");
        }
    }

    for path in &report.exported {
        println!("{}", path.display());
    }
    if !args.no_export {
        let path = save::export_png(view.export_bitmap(), &settings, Local::now())?;
        println!("{}", path.display());
    }
    Ok(())
}
