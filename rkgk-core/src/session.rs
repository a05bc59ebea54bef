//! # Paint sessions
//!
//! Everything a painting client juggles at once: the canvas, the brush set, which brush is active,
//! and the paint color. Passed around explicitly rather than living in globals.

use crate::{
    bitmap::{Bitmap, ImportError},
    brush::{Brush, BrushError},
    canvas::Canvas,
    color::Color,
    input::PointerEvent,
};

/// Name of the brush a session starts with when given none.
pub const DEFAULT_BRUSH_NAME: &str = "hard round";

#[derive(Debug)]
pub struct PaintSession {
    pub canvas: Canvas,
    /// Ordered, names unique. Never empty.
    brushes: Vec<Brush>,
    active_brush: usize,
    /// Paint color. Alpha is ignored while painting, opacity comes from the brush.
    pub color: Color,
}
impl PaintSession {
    /// A session painting black, with a single default brush.
    #[must_use]
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            brushes: vec![Brush::new(DEFAULT_BRUSH_NAME)],
            active_brush: 0,
            color: Color::BLACK,
        }
    }
    /// A session with the given brushes, in order. Brushes with a name already taken are skipped.
    /// Falls back on the default brush if none remain.
    #[must_use]
    pub fn with_brushes(canvas: Canvas, brushes: impl IntoIterator<Item = Brush>) -> Self {
        let mut this = Self {
            canvas,
            brushes: Vec::new(),
            active_brush: 0,
            color: Color::BLACK,
        };
        for brush in brushes {
            if let Err(e) = this.add_brush(brush) {
                log::warn!("skipping brush: {e}");
            }
        }
        if this.brushes.is_empty() {
            this.brushes.push(Brush::new(DEFAULT_BRUSH_NAME));
        }
        this
    }

    // ===== Brushes =====

    #[must_use]
    pub fn brushes(&self) -> &[Brush] {
        &self.brushes
    }
    #[must_use]
    pub fn active_brush_index(&self) -> usize {
        self.active_brush
    }
    #[must_use]
    pub fn brush(&self) -> &Brush {
        &self.brushes[self.active_brush]
    }
    /// Edit the active brush. Renaming it to a name already in use is not checked here.
    pub fn brush_mut(&mut self) -> &mut Brush {
        &mut self.brushes[self.active_brush]
    }
    #[must_use]
    pub fn find_brush(&self, name: &str) -> Option<usize> {
        self.brushes.iter().position(|brush| brush.name == name)
    }
    /// Append a brush, returning its index. Does not change the active brush.
    /// # Errors
    /// If a brush of the same name exists.
    pub fn add_brush(&mut self, brush: Brush) -> Result<usize, BrushError> {
        if self.find_brush(&brush.name).is_some() {
            return Err(BrushError::DuplicateName(brush.name));
        }
        self.brushes.push(brush);
        Ok(self.brushes.len() - 1)
    }
    /// Remove a brush. The active selection stays on the same brush if it survives, otherwise
    /// moves to the one before it.
    /// # Errors
    /// If `index` doesn't exist, or is the only brush.
    pub fn remove_brush(&mut self, index: usize) -> Result<Brush, BrushError> {
        if index >= self.brushes.len() {
            return Err(BrushError::OutOfRange(index));
        }
        if self.brushes.len() <= 1 {
            return Err(BrushError::LastBrush);
        }
        let removed = self.brushes.remove(index);
        if index <= self.active_brush && self.active_brush > 0 {
            self.active_brush -= 1;
        }
        Ok(removed)
    }
    /// # Errors
    /// If `index` doesn't exist.
    pub fn select_brush(&mut self, index: usize) -> Result<(), BrushError> {
        if index >= self.brushes.len() {
            return Err(BrushError::OutOfRange(index));
        }
        self.active_brush = index;
        Ok(())
    }
    /// Grow or shrink the active brush by `delta` pixels, stopping at zero.
    pub fn nudge_brush_size(&mut self, delta: f32) {
        let brush = self.brush_mut();
        brush.size = (brush.size + delta).max(0.0);
    }

    // ===== Painting =====

    /// Paint with the active brush and color. See [`Canvas::handle_pointer_event`].
    pub fn handle_pointer_event(&mut self, event: PointerEvent) -> usize {
        let brush = &self.brushes[self.active_brush];
        self.canvas.handle_pointer_event(event, brush, self.color)
    }
    #[must_use]
    pub fn export(&self) -> Bitmap {
        self.canvas.export()
    }
    /// # Errors
    /// See [`Canvas::import`].
    pub fn import(&mut self, bitmap: &Bitmap) -> Result<(), ImportError> {
        self.canvas.import(bitmap)
    }
}
