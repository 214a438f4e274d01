mod frame;
mod null_renderer;

pub use frame::RenderFrame;
pub use null_renderer::NullRenderer;

use crate::core::SurfaceSize;
use crate::error::ChartResult;

/// Contract implemented by the host's drawing surface.
///
/// The engine asks for `surface_size` on every input event instead of
/// caching it, and hands `render` a fully materialized frame so painting
/// stays isolated from viewport logic.
pub trait Renderer {
    fn surface_size(&self) -> SurfaceSize;

    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()>;
}
