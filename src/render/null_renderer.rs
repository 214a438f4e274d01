use crate::core::SurfaceSize;
use crate::error::ChartResult;
use crate::render::{RenderFrame, Renderer};

/// Headless renderer used by tests and non-visual hosts.
///
/// Still validates every frame so tests catch non-finite geometry.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub surface: SurfaceSize,
    pub frames_rendered: usize,
    pub last_frame: Option<RenderFrame>,
}

impl NullRenderer {
    #[must_use]
    pub fn with_surface(width: f64, height: f64) -> Self {
        Self {
            surface: SurfaceSize::new(width, height),
            ..Self::default()
        }
    }
}

impl Renderer for NullRenderer {
    fn surface_size(&self) -> SurfaceSize {
        self.surface
    }

    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;
        self.frames_rendered += 1;
        self.last_frame = Some(frame.clone());
        Ok(())
    }
}
