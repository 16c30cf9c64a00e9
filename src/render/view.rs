use std::sync::Arc;

use tokio::sync::watch;

use crate::assets::decode::Bitmap;
use crate::assets::loader::BitmapLoader;
use crate::foundation::error::PackshotResult;
use crate::render::compositor::Compositor;
use crate::render::surface::Surface;
use crate::state::invalidation::Invalidation;
use crate::state::params::CompositionParams;
use crate::state::store::StateStore;

/// What the live view last displayed, and the inputs it was drawn from.
#[derive(Clone, Debug)]
pub struct LiveFrame {
    /// Parameters of the displayed composition.
    pub params: Arc<CompositionParams>,
    /// Bitmap of the displayed composition.
    pub bitmap: Option<Arc<Bitmap>>,
    /// Drawn surface.
    pub surface: Arc<Surface>,
}

/// Result of a [`LiveView::refresh`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The surface was redrawn because of these dirty stages.
    Rendered(Invalidation),
    /// Nothing visible changed; the existing surface was kept.
    Unchanged,
    /// The store or loader went away; no further changes will arrive.
    Closed,
}

/// Counters for the live view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ViewStats {
    /// Successful redraws.
    pub renders: u64,
    /// Refreshes that found nothing to redraw.
    pub skipped: u64,
    /// Redraws that failed (the previous surface stays displayed).
    pub failures: u64,
}

/// Live display surface kept in sync with a [`StateStore`] and a [`BitmapLoader`].
pub struct LiveView {
    compositor: Arc<Compositor>,
    params_rx: watch::Receiver<Arc<CompositionParams>>,
    bitmap_rx: watch::Receiver<Option<Arc<Bitmap>>>,
    frame: Option<LiveFrame>,
    stats: ViewStats,
}

impl std::fmt::Debug for LiveView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveView")
            .field("has_frame", &self.frame.is_some())
            .field("stats", &self.stats)
            .finish()
    }
}

impl LiveView {
    /// Subscribe to `store` and `loader`. Nothing is drawn until the first refresh.
    pub fn new(compositor: Arc<Compositor>, store: &StateStore, loader: &BitmapLoader) -> Self {
        Self {
            compositor,
            params_rx: store.subscribe(),
            bitmap_rx: loader.subscribe(),
            frame: None,
            stats: ViewStats::default(),
        }
    }

    /// Last successfully rendered frame.
    pub fn frame(&self) -> Option<&LiveFrame> {
        self.frame.as_ref()
    }

    /// Latest parameters and bitmap published to this view, whether or not they are drawn yet.
    ///
    /// Reading does not mark them seen, so the next refresh still redraws.
    pub fn current_inputs(&self) -> (Arc<CompositionParams>, Option<Arc<Bitmap>>) {
        (
            self.params_rx.borrow().clone(),
            self.bitmap_rx.borrow().clone(),
        )
    }

    /// Counters since construction.
    pub fn stats(&self) -> ViewStats {
        self.stats
    }

    /// Compositor shared with the export pipeline.
    pub fn compositor(&self) -> &Arc<Compositor> {
        &self.compositor
    }

    /// Bring the surface up to date with the latest parameters and bitmap.
    ///
    /// On a render error the previous frame stays in place and the error is returned.
    pub fn refresh(&mut self) -> PackshotResult<RefreshOutcome> {
        let params = self.params_rx.borrow_and_update().clone();
        let bitmap = self.bitmap_rx.borrow_and_update().clone();

        let invalidation = match &self.frame {
            None => Invalidation::full(),
            Some(frame) => Invalidation::between(
                &frame.params,
                &params,
                bitmap.is_some(),
                !same_bitmap(&frame.bitmap, &bitmap),
            ),
        };

        if !invalidation.needs_redraw() {
            if let Some(frame) = &mut self.frame {
                frame.params = params;
                frame.bitmap = bitmap;
            }
            self.stats.skipped += 1;
            return Ok(RefreshOutcome::Unchanged);
        }

        let surface = match self.compositor.render(&params, bitmap.as_deref()) {
            Ok(s) => s,
            Err(e) => {
                self.stats.failures += 1;
                tracing::warn!(error = %e, "live render failed, keeping previous frame");
                return Err(e);
            }
        };
        tracing::debug!(?invalidation, size = %surface.size(), "live view redrawn");
        self.frame = Some(LiveFrame {
            params,
            bitmap,
            surface: Arc::new(surface),
        });
        self.stats.renders += 1;
        Ok(RefreshOutcome::Rendered(invalidation))
    }

    /// Wait for the parameters or the bitmap to change, then refresh.
    ///
    /// Refreshes immediately if nothing has been drawn yet.
    pub async fn next_frame(&mut self) -> PackshotResult<RefreshOutcome> {
        if self.frame.is_some() {
            let open = tokio::select! {
                r = self.params_rx.changed() => r.is_ok(),
                r = self.bitmap_rx.changed() => r.is_ok(),
            };
            if !open {
                return Ok(RefreshOutcome::Closed);
            }
        }
        self.refresh()
    }
}

fn same_bitmap(a: &Option<Arc<Bitmap>>, b: &Option<Arc<Bitmap>>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        _ => false,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/view.rs"]
mod tests;
