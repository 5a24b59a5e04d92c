//! Recorded sessions: a JSON list of shell calls and pointer samples replayed against a
//! [`DrawView`], standing in for the platform view shell.

use crate::draw::bitmap::Bitmap;
use crate::draw::model::{Mode, PointerId, ShapeKind, TouchAction, TouchEvent};
use crate::draw::save;
use crate::draw::settings::DrawSettings;
use crate::draw::view::DrawView;
use anyhow::{Context, Result};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ScriptStep {
    Touch {
        action: TouchAction,
        #[serde(default)]
        pointer: PointerId,
        x: f32,
        y: f32,
        #[serde(default = "default_pointer_count")]
        count: u32,
    },
    SetMode {
        mode: Mode,
    },
    SetBrushColor {
        argb: u32,
    },
    SetBrushThickness {
        px: f32,
    },
    SetOverlayShape {
        shape: ShapeKind,
    },
    SetOverlayImage {
        path: PathBuf,
    },
    ResetColor {
        argb: u32,
    },
    ResetImage {
        path: PathBuf,
    },
    Anchor,
    Confirm,
    Cancel,
    /// Writes the committed drawing. Without `file` the timestamped export location is used.
    Export {
        #[serde(default)]
        file: Option<PathBuf>,
    },
}

fn default_pointer_count() -> u32 {
    1
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub steps: Vec<ScriptStep>,
}

impl Script {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("parse session script")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("read session script {}", path.display()))?;
        Self::from_json(&content).with_context(|| format!("in {}", path.display()))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplayReport {
    pub steps: usize,
    pub anchored: usize,
    pub exported: Vec<PathBuf>,
}

/// Replays `script` against `view`. Relative paths resolve against `base_dir`.
pub fn replay(
    view: &mut DrawView,
    script: &Script,
    settings: &DrawSettings,
    base_dir: &Path,
) -> Result<ReplayReport> {
    let mut report = ReplayReport::default();
    for (index, step) in script.steps.iter().enumerate() {
        apply_step(view, step, settings, base_dir, &mut report)
            .with_context(|| format!("session step {index}"))?;
        report.steps += 1;
    }
    tracing::info!(
        steps = report.steps,
        anchored = report.anchored,
        exported = report.exported.len(),
        "session replayed"
    );
    Ok(report)
}

fn apply_step(
    view: &mut DrawView,
    step: &ScriptStep,
    settings: &DrawSettings,
    base_dir: &Path,
    report: &mut ReplayReport,
) -> Result<()> {
    match step {
        ScriptStep::Touch {
            action,
            pointer,
            x,
            y,
            count,
        } => {
            view.on_touch(&TouchEvent::new(*action, *pointer, *x, *y, *count));
        }
        ScriptStep::SetMode { mode } => view.set_mode(*mode),
        ScriptStep::SetBrushColor { argb } => view.set_brush_color(*argb),
        ScriptStep::SetBrushThickness { px } => view.set_brush_thickness(*px),
        ScriptStep::SetOverlayShape { shape } => view.set_overlay_shape(*shape),
        ScriptStep::SetOverlayImage { path } => {
            view.set_overlay_image(Bitmap::load(&base_dir.join(path))?);
        }
        ScriptStep::ResetColor { argb } => view.reset_canvas_color(*argb),
        ScriptStep::ResetImage { path } => {
            view.reset_canvas_bitmap(Bitmap::load(&base_dir.join(path))?);
        }
        ScriptStep::Anchor => {
            if view.anchor().is_some() {
                report.anchored += 1;
            }
        }
        ScriptStep::Confirm => {
            if view.confirm_overlay().is_some() {
                report.anchored += 1;
            }
        }
        ScriptStep::Cancel => view.cancel_overlay(),
        ScriptStep::Export { file } => {
            let path = match file {
                Some(file) => {
                    let path = base_dir.join(file);
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent).with_context(|| {
                            format!("create export folder {}", parent.display())
                        })?;
                    }
                    save::write_png(view.export_bitmap(), &path, settings.export_quality)?;
                    path
                }
                None => save::export_png(view.export_bitmap(), settings, Local::now())?,
            };
            report.exported.push(path);
        }
    }
    Ok(())
}
