use std::sync::Arc;

use crate::assets::decode::Bitmap;
use crate::export::encode::EncodedImage;
use crate::foundation::error::PackshotResult;
use crate::render::compositor::Compositor;
use crate::render::view::{LiveFrame, LiveView};
use crate::state::params::CompositionParams;

/// Result of an export request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExportOutcome {
    /// Encoded image at the requested resolution.
    Exported(EncodedImage),
    /// The live view has not rendered yet; there is nothing to export.
    Unavailable,
}

/// Renders the live composition off-screen at another resolution.
///
/// The live view is read, never written. Export draws the latest parameters and bitmap into a
/// fresh surface of the target size, so edits not yet shown on screen are still exported.
#[derive(Clone, Debug)]
pub struct Exporter {
    compositor: Arc<Compositor>,
}

impl Exporter {
    /// Exporter drawing with `compositor`.
    pub fn new(compositor: Arc<Compositor>) -> Self {
        Self { compositor }
    }

    /// Export the current composition of `view` at `scale` times its canvas size.
    ///
    /// Unavailable until the view has rendered once.
    pub fn export(&self, view: &LiveView, scale: f64) -> PackshotResult<ExportOutcome> {
        if view.frame().is_none() {
            tracing::debug!("export requested before first render");
            return Ok(ExportOutcome::Unavailable);
        }
        let (params, bitmap) = view.current_inputs();
        self.export_inputs(&params, bitmap.as_deref(), scale)
            .map(ExportOutcome::Exported)
    }

    /// Export a captured frame at `scale` times its canvas size.
    #[tracing::instrument(level = "debug", skip(self, frame))]
    pub fn export_frame(&self, frame: &LiveFrame, scale: f64) -> PackshotResult<EncodedImage> {
        self.export_inputs(&frame.params, frame.bitmap.as_deref(), scale)
    }

    fn export_inputs(
        &self,
        params: &CompositionParams,
        bitmap: Option<&Bitmap>,
        scale: f64,
    ) -> PackshotResult<EncodedImage> {
        let target = params.size().scaled_round(scale)?;
        let surface = self.compositor.render_at(params, bitmap, target)?;
        let image = EncodedImage::png(&surface)?;
        tracing::debug!(size = %image.size(), bytes = image.bytes().len(), "export encoded");
        Ok(image)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/pipeline.rs"]
mod tests;
