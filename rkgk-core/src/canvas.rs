//! # Canvas
//!
//! The canvas owns the layer stack, the view transform, and the stroke in progress. It is the
//! single entry point for pointer input: events arrive in device space, are mapped into canvas
//! space through the inverse view transform, and turned into dabs on the current layer.
//!
//! View operations (pan, zoom, rotate) are all expressed in device space and only ever touch the
//! transform, never pixels.

use crate::{
    bitmap::{Bitmap, ImportError},
    brush::Brush,
    color::Color,
    dab::{Dab, SMALL_SIZE},
    input::PointerEvent,
    layer::{Extent, Layer},
    stroke::Resampler,
    transform::AffineTransform,
};

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerError {
    #[error("can't remove the only layer")]
    LastLayer,
    #[error("layer index {0} is out of range")]
    OutOfRange(usize),
}

pub struct Canvas {
    extent: Extent,
    /// Bottom to top. Never empty.
    layers: Vec<Layer>,
    current: usize,
    /// Canvas space to device space.
    transform: AffineTransform,
    stroke: Resampler,
    /// Whether the previous pointer sample was pressed. Strokes start on the press edge only.
    button_down: bool,
    /// Set when pixels change, cleared by [`Canvas::take_dirty`].
    dirty: bool,
}
impl Canvas {
    /// A canvas with a single white layer and an identity view.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let extent = Extent::new(width, height);
        Self {
            extent,
            layers: vec![Layer::new(Self::layer_name(1), extent)],
            current: 0,
            transform: AffineTransform::IDENTITY,
            stroke: Resampler::new(),
            button_down: false,
            dirty: true,
        }
    }
    fn layer_name(number: usize) -> String {
        format!("Layer {number}")
    }
    #[must_use]
    pub fn extent(&self) -> Extent {
        self.extent
    }
    #[must_use]
    pub fn width(&self) -> u32 {
        self.extent.width
    }
    #[must_use]
    pub fn height(&self) -> u32 {
        self.extent.height
    }

    // ===== View =====

    /// Canvas space to device space.
    #[must_use]
    pub fn transform(&self) -> AffineTransform {
        self.transform
    }
    pub fn set_transform(&mut self, transform: AffineTransform) {
        self.transform = transform;
    }
    /// Back to an identity view, canvas pixels on device pixels.
    pub fn reset_view(&mut self) {
        log::debug!("view reset");
        self.transform = AffineTransform::IDENTITY;
    }
    /// Pan the view by this displacement in device space.
    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.transform = self.transform.then(AffineTransform::translation(dx, dy));
    }
    /// Zoom by `factor`, keeping the canvas point under `device_point` in place.
    pub fn zoom_at(&mut self, factor: f32, device_point: [f32; 2]) {
        self.transform = self.transform.scale_at(factor, factor, device_point);
        if !self.transform.is_invertible() {
            log::warn!(
                "view zoomed to a degenerate scale, pointer input will map through identity"
            );
        }
    }
    /// Rotate the view by `angle` radians about `device_point`.
    pub fn rotate_at(&mut self, angle: f32, device_point: [f32; 2]) {
        self.transform = self.transform.rotate_at(angle, device_point);
    }
    #[must_use]
    pub fn device_to_canvas(&self, device_point: [f32; 2]) -> [f32; 2] {
        self.transform.invert().transform(device_point)
    }
    #[must_use]
    pub fn canvas_to_device(&self, canvas_point: [f32; 2]) -> [f32; 2] {
        self.transform.transform(canvas_point)
    }
    /// Whether a canvas-space point lies on the canvas.
    #[must_use]
    pub fn contains(&self, [x, y]: [f32; 2]) -> bool {
        (0.0..self.extent.width as f32).contains(&x)
            && (0.0..self.extent.height as f32).contains(&y)
    }
    /// Device-space corners of the canvas, clockwise from the top-left, for presenting
    /// the current layer as a textured quad.
    #[must_use]
    pub fn quad(&self) -> [[f32; 2]; 4] {
        let w = self.extent.width as f32;
        let h = self.extent.height as f32;
        [[0.0, 0.0], [w, 0.0], [w, h], [0.0, h]]
            .map(|corner| self.transform.transform(corner))
    }
    /// Radius of a dab of `brush` at full pressure, in device pixels.
    /// For drawing a cursor outline.
    #[must_use]
    pub fn cursor_radius(&self, brush: &Brush) -> f32 {
        // Uniform scale factor of the view.
        let scale = self.transform.determinant().abs().sqrt();
        brush.effective_size(1.0) / 2.0 * scale
    }

    // ===== Strokes =====

    /// Feed one pointer sample through the stroke state machine, painting with `brush` and
    /// `color` onto the current layer. Returns the number of dabs drawn.
    ///
    /// A press starts a stroke only if it lands on the canvas. While held, the stroke follows the
    /// pointer even off the edges. Releasing ends it.
    pub fn handle_pointer_event(
        &mut self,
        event: PointerEvent,
        brush: &Brush,
        color: Color,
    ) -> usize {
        let position = self.device_to_canvas(event.position);
        let pressure = event.effective_pressure();
        let was_down = std::mem::replace(&mut self.button_down, event.pressed);

        if !event.pressed {
            self.end_stroke();
            0
        } else if self.stroke.is_stroking() {
            self.stroke_to(position, pressure, brush, color)
        } else if !was_down {
            usize::from(self.begin_stroke(position, pressure, brush, color))
        } else {
            // Held since a press that didn't start a stroke.
            0
        }
    }
    /// Start a stroke at a canvas-space position, drawing the first dab immediately.
    /// Returns `false` and does nothing if the position is off-canvas.
    pub fn begin_stroke(
        &mut self,
        position: [f32; 2],
        pressure: f32,
        brush: &Brush,
        color: Color,
    ) -> bool {
        if !self.contains(position) {
            log::trace!("press at {position:?} is off-canvas, no stroke");
            return false;
        }
        log::trace!("stroke begin at {position:?} with {:?}", brush.name);
        let dab = self.stroke.begin(position, pressure);
        self.draw(&dab, brush, color);
        true
    }
    /// Continue the stroke in progress to a canvas-space position.
    /// Returns the number of dabs drawn.
    pub fn stroke_to(
        &mut self,
        position: [f32; 2],
        pressure: f32,
        brush: &Brush,
        color: Color,
    ) -> usize {
        // Dabs further than this outside the canvas can't touch it.
        let size = brush.effective_size(0.0).max(brush.effective_size(1.0));
        let reach = size.max(SMALL_SIZE) / 2.0 + 1.0;
        let min = [-reach, -reach];
        let max = [self.width() as f32 + reach, self.height() as f32 + reach];

        let dabs = self
            .stroke
            .advance(position, pressure, brush)
            .within(min, max);
        let count = dabs.len();
        for dab in dabs {
            self.draw(&dab, brush, color);
        }
        count
    }
    /// End the stroke in progress, if any.
    pub fn end_stroke(&mut self) {
        if self.stroke.end() {
            log::trace!("stroke end");
        }
    }
    /// Whether a stroke is in progress. Displays may use this to trade vsync for input latency.
    #[must_use]
    pub fn is_stroking(&self) -> bool {
        self.stroke.is_stroking()
    }
    fn draw(&mut self, dab: &Dab, brush: &Brush, color: Color) {
        let layer = &mut self.layers[self.current];
        if dab.rasterize(brush, color, layer) > 0 {
            self.dirty = true;
        }
    }

    // ===== Layers =====

    /// Layers, bottom to top.
    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }
    #[must_use]
    pub fn layer(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index)
    }
    pub fn layer_mut(&mut self, index: usize) -> Option<&mut Layer> {
        self.layers.get_mut(index)
    }
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }
    #[must_use]
    pub fn current_layer(&self) -> &Layer {
        &self.layers[self.current]
    }
    pub fn current_layer_mut(&mut self) -> &mut Layer {
        self.dirty = true;
        &mut self.layers[self.current]
    }
    /// Make `index` the layer painted onto. Ends any stroke in progress.
    /// # Errors
    /// If there is no such layer.
    pub fn select_layer(&mut self, index: usize) -> Result<(), LayerError> {
        if index >= self.layers.len() {
            return Err(LayerError::OutOfRange(index));
        }
        if index != self.current {
            self.end_stroke();
            self.current = index;
            self.dirty = true;
        }
        Ok(())
    }
    /// Insert a new white layer directly above the current one, and select it.
    /// Returns the new layer's index.
    pub fn add_layer(&mut self) -> usize {
        self.end_stroke();
        let name = Self::layer_name(self.layers.len() + 1);
        let index = self.current + 1;
        log::debug!("adding {name:?} at {index}");
        self.layers.insert(index, Layer::new(name, self.extent));
        self.current = index;
        self.dirty = true;
        index
    }
    /// Remove and return the layer at `index`. The selection stays on the same layer if it
    /// survives, otherwise moves down one.
    /// # Errors
    /// If `index` doesn't exist, or is the only layer. The canvas is unchanged.
    pub fn remove_layer(&mut self, index: usize) -> Result<Layer, LayerError> {
        if index >= self.layers.len() {
            log::warn!("can't remove layer {index}, out of range");
            return Err(LayerError::OutOfRange(index));
        }
        if self.layers.len() <= 1 {
            log::warn!("can't remove the only layer");
            return Err(LayerError::LastLayer);
        }
        if index == self.current {
            self.end_stroke();
        }
        let removed = self.layers.remove(index);
        if index <= self.current && self.current > 0 {
            self.current -= 1;
        }
        log::debug!("removed {:?}, {} remaining", removed.name, self.layers.len());
        self.dirty = true;
        Ok(removed)
    }
    /// Fill the current layer with `color`.
    pub fn clear(&mut self, color: Color) {
        self.current_layer_mut().clear(color);
    }

    // ===== Display & IO =====

    /// Whether pixels changed since the last call. Resets the flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
    /// RGBA8 pixels of the current layer, row-major with a stride of `width * 4`.
    #[must_use]
    pub fn export_pixels(&self) -> &[u8] {
        self.current_layer().pixels()
    }
    /// Copy of the current layer as a flat bitmap.
    #[must_use]
    pub fn export(&self) -> Bitmap {
        Bitmap::from_layer(self.current_layer())
    }
    /// Replace the current layer's pixels with `bitmap`.
    /// # Errors
    /// If the bitmap isn't RGBA with the canvas' exact dimensions. The layer is left untouched.
    pub fn import(&mut self, bitmap: &Bitmap) -> Result<(), ImportError> {
        bitmap.validate_for(self.extent)?;
        let replaced = self.current_layer_mut().replace_pixels(&bitmap.data);
        // Length already validated.
        debug_assert!(replaced);
        Ok(())
    }
}

impl std::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas")
            .field("extent", &self.extent)
            .field(
                "layers",
                &self.layers.iter().map(|l| &l.name).collect::<Vec<_>>(),
            )
            .field("current", &self.current)
            .field("transform", &self.transform)
            .field("stroke", &self.stroke)
            .finish_non_exhaustive()
    }
}
