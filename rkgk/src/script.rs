//! # Session scripts
//!
//! A TOML description of a canvas and a sequence of things to do to it: strokes in device space,
//! view changes, layer operations. Stands in for a live input device and UI.

use std::path::{Path, PathBuf};

use anyhow::Context;
use rkgk_core::{brush::Brush, color::Color, input::PointerEvent, Canvas, PaintSession};

#[derive(serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CanvasSettings {
    pub width: u32,
    pub height: u32,
    /// Fill color of the first layer.
    #[serde(default = "white")]
    pub background: Color,
}
fn white() -> Color {
    Color::WHITE
}

#[derive(serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum Action {
    /// Press at the first point, drag through the rest, release at the last.
    /// Points are `[x, y, pressure]` in device pixels.
    Stroke {
        points: Vec<[f32; 3]>,
        /// Brush to select before painting.
        brush: Option<String>,
        /// Color to switch to before painting.
        color: Option<Color>,
    },
    Pan {
        dx: f32,
        dy: f32,
    },
    Zoom {
        factor: f32,
        at: [f32; 2],
    },
    Rotate {
        degrees: f32,
        at: [f32; 2],
    },
    ResetView,
    AddLayer,
    RemoveLayer {
        index: usize,
    },
    SelectLayer {
        index: usize,
    },
    SelectBrush {
        name: String,
    },
    Color {
        color: Color,
    },
    Clear {
        color: Color,
    },
    /// Load a PNG into the current layer. Relative to the script's directory.
    Import {
        path: PathBuf,
    },
}

#[derive(serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Script {
    pub canvas: CanvasSettings,
    /// Where to write the current layer when done. Relative to the script's directory.
    /// Defaults to the script's own path, with a `png` extension.
    pub output: Option<PathBuf>,
    /// Initial paint color.
    pub color: Option<Color>,
    /// Brushes available to this script on top of the library. These take precedence over
    /// library brushes of the same name, and the first one starts active.
    #[serde(default, rename = "brush")]
    pub brushes: Vec<Brush>,
    #[serde(default, rename = "action")]
    pub actions: Vec<Action>,
}
impl Script {
    /// # Errors
    /// If the file can't be read or isn't a valid script.
    pub fn read(path: &Path) -> anyhow::Result<Self> {
        let string = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&string)?)
    }
    /// Where the output of a script read from `script_path` should go.
    #[must_use]
    pub fn output_path(&self, script_path: &Path) -> PathBuf {
        match &self.output {
            Some(output) => relative_to(script_path, output),
            None => script_path.with_extension("png"),
        }
    }
    /// Build a session from the script and play back every action.
    /// `library` brushes are available alongside the script's own.
    /// # Errors
    /// If an import fails. Rejected layer and brush operations are logged and skipped.
    pub fn run(&self, script_path: &Path, library: &[Brush]) -> anyhow::Result<PaintSession> {
        let mut canvas = Canvas::new(self.canvas.width, self.canvas.height);
        canvas.clear(self.canvas.background);

        let brushes = self.brushes.iter().chain(library).cloned();
        let mut session = PaintSession::with_brushes(canvas, brushes);
        if let Some(color) = self.color {
            session.color = color;
        }

        for (idx, action) in self.actions.iter().enumerate() {
            log::trace!("action {idx}: {action:?}");
            apply(&mut session, action, script_path)
                .with_context(|| format!("action {idx} ({action:?})"))?;
        }
        Ok(session)
    }
}

fn relative_to(script_path: &Path, path: &Path) -> PathBuf {
    match script_path.parent() {
        Some(dir) => dir.join(path),
        None => path.to_owned(),
    }
}

fn apply(session: &mut PaintSession, action: &Action, script_path: &Path) -> anyhow::Result<()> {
    match action {
        Action::Stroke {
            points,
            brush,
            color,
        } => {
            if let Some(name) = brush {
                select_brush(session, name);
            }
            if let Some(color) = color {
                session.color = *color;
            }
            let mut dabs = 0;
            for &[x, y, pressure] in points {
                let event = PointerEvent::new([x, y], true, Some(pressure));
                dabs += session.handle_pointer_event(event);
            }
            if let Some(&[x, y, _]) = points.last() {
                session.handle_pointer_event(PointerEvent::up([x, y]));
            }
            log::debug!("stroke of {} points, {dabs} dabs", points.len());
        }
        Action::Pan { dx, dy } => session.canvas.pan_by(*dx, *dy),
        Action::Zoom { factor, at } => session.canvas.zoom_at(*factor, *at),
        Action::Rotate { degrees, at } => session.canvas.rotate_at(degrees.to_radians(), *at),
        Action::ResetView => session.canvas.reset_view(),
        Action::AddLayer => {
            session.canvas.add_layer();
        }
        Action::RemoveLayer { index } => {
            if let Err(e) = session.canvas.remove_layer(*index) {
                log::warn!("layer not removed: {e}");
            }
        }
        Action::SelectLayer { index } => {
            if let Err(e) = session.canvas.select_layer(*index) {
                log::warn!("layer not selected: {e}");
            }
        }
        Action::SelectBrush { name } => select_brush(session, name),
        Action::Color { color } => session.color = *color,
        Action::Clear { color } => session.canvas.clear(*color),
        Action::Import { path } => {
            let path = relative_to(script_path, path);
            let bitmap = crate::io::read_path(&path)
                .with_context(|| format!("reading {path:?}"))?;
            session
                .import(&bitmap)
                .with_context(|| format!("importing {path:?}"))?;
        }
    }
    Ok(())
}

fn select_brush(session: &mut PaintSession, name: &str) {
    match session.find_brush(name) {
        // Found, can't be out of range.
        Some(index) => {
            let _ = session.select_brush(index);
        }
        None => log::warn!(
            "no brush named {name:?}, keeping {:?}",
            session.brush().name
        ),
    }
}
