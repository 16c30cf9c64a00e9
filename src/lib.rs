//! Packshot composites a product photo onto a styled background with an optional drop shadow
//! and caption, and exports the result as PNG at any resolution multiplier.
//!
//! The pieces, leaves first:
//!
//! - [`StateStore`] holds [`CompositionParams`] and applies [`ParamsPatch`]es
//! - [`BitmapLoader`] decodes product photos off the executor with last-request-wins semantics
//! - [`Compositor`] draws `(params, bitmap) -> Surface`, synchronously and deterministically
//! - [`LiveView`] keeps a display surface in sync with the store and loader
//! - [`Exporter`] re-renders what the live view shows at another size and encodes it as PNG
//! - [`DeliveryChain`] hands the PNG to share, clipboard or download, in that order
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod assets;
mod config;
mod export;
mod foundation;
mod logging;
mod render;
mod state;

pub use crate::foundation::color::Rgba8;
pub use crate::foundation::core::{Affine, MAX_SURFACE_EXTENT, Point, Rect, Size, Vec2};
pub use crate::foundation::error::{PackshotError, PackshotResult};

pub use crate::state::invalidation::Invalidation;
pub use crate::state::params::{
    BackgroundKind, CompositionParams, MAX_SHADOW_OPACITY, TextWeight, initialize,
};
pub use crate::state::patch::{ParamsPatch, apply_patch};
pub use crate::state::store::StateStore;

pub use crate::assets::decode::{Bitmap, decode_image};
pub use crate::assets::fonts::{FontBook, FontConfig, ResolvedFont, SANS_FALLBACK_FAMILIES};
pub use crate::assets::loader::{
    BitmapLoader, FsResolver, LoadFailure, LoadOutcome, LoadTicket, MemoryResolver,
    SourceResolver, SourceRef,
};

pub use crate::render::background::{CHECKER_EVEN, CHECKER_ODD, CHECKER_TILE_PX};
pub use crate::render::compositor::Compositor;
pub use crate::render::placement::ProductPlacement;
pub use crate::render::surface::Surface;
pub use crate::render::view::{LiveFrame, LiveView, RefreshOutcome, ViewStats};

pub use crate::export::delivery::{
    AttemptResult, DeliveryAttempt, DeliveryChain, DeliveryKind, DeliveryOutcome,
    DeliveryReport, DeliveryTarget, InMemoryTarget,
};
pub use crate::export::encode::{EncodedImage, PNG_MIME, read_dimensions, suggested_file_name};
pub use crate::export::pipeline::{ExportOutcome, Exporter};
pub use crate::export::targets::{CommandShare, Download, SystemClipboard};

pub use crate::config::{
    DeliveryConfig, ENV_DOWNLOAD_DIR, ENV_FONT_DIR, ENV_SHARE_COMMAND, LoggingConfig,
    PackshotConfig,
};
pub use crate::logging::init_logging;
