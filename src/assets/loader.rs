use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Context;
use tokio::sync::watch;

use crate::assets::decode::{Bitmap, decode_image};
use crate::foundation::core::Size;
use crate::foundation::error::{PackshotError, PackshotResult};

/// Opaque reference to a product photo (path, URL, key...).
///
/// The loader never interprets it; a [`SourceResolver`] turns it into bytes.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SourceRef(String);

impl SourceRef {
    /// Wrap a source string.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// The raw source string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SourceRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SourceRef {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<&Path> for SourceRef {
    fn from(p: &Path) -> Self {
        Self::new(p.to_string_lossy())
    }
}

/// Fetches the encoded bytes behind a [`SourceRef`].
///
/// Called on a blocking worker thread, so implementations may do synchronous IO.
pub trait SourceResolver: Send + Sync {
    /// Return the encoded image bytes for `source`.
    fn fetch(&self, source: &SourceRef) -> PackshotResult<Vec<u8>>;
}

/// Resolves sources as filesystem paths, optionally relative to a root directory.
#[derive(Clone, Debug, Default)]
pub struct FsResolver {
    root: Option<PathBuf>,
}

impl FsResolver {
    /// Resolver for absolute paths or paths relative to the working directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver joining relative sources onto `root`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }
}

impl SourceResolver for FsResolver {
    fn fetch(&self, source: &SourceRef) -> PackshotResult<Vec<u8>> {
        let p = Path::new(source.as_str());
        let path = match &self.root {
            Some(root) if p.is_relative() => root.join(p),
            _ => p.to_path_buf(),
        };
        std::fs::read(&path)
            .with_context(|| format!("read product photo '{}'", path.display()))
            .map_err(PackshotError::from)
    }
}

/// In-memory resolver keyed by source string.
#[derive(Clone, Debug, Default)]
pub struct MemoryResolver {
    entries: HashMap<String, Arc<Vec<u8>>>,
}

impl MemoryResolver {
    /// Empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `bytes` under `source`.
    pub fn with(mut self, source: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.entries.insert(source.into(), Arc::new(bytes));
        self
    }
}

impl SourceResolver for MemoryResolver {
    fn fetch(&self, source: &SourceRef) -> PackshotResult<Vec<u8>> {
        self.entries
            .get(source.as_str())
            .map(|b| b.as_ref().clone())
            .ok_or_else(|| PackshotError::decode(format!("unknown source '{source}'")))
    }
}

/// Why a load produced no bitmap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadFailure {
    /// The source that failed.
    pub source: SourceRef,
    /// Human-readable cause.
    pub reason: String,
}

/// Result of one [`BitmapLoader::load`] call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The decoded bitmap became current.
    Applied {
        /// Generation of the request.
        generation: u64,
        /// Intrinsic size of the new bitmap.
        size: Size,
    },
    /// No source was given; the current bitmap was cleared.
    Cleared {
        /// Generation of the request.
        generation: u64,
    },
    /// A newer request superseded this one; its result was discarded.
    Stale {
        /// Generation of the discarded request.
        generation: u64,
        /// Latest generation at completion time.
        latest: u64,
    },
    /// Fetch or decode failed; the current bitmap is unchanged.
    Failed {
        /// Generation of the request.
        generation: u64,
        /// Failure details.
        failure: LoadFailure,
    },
}

/// Handle for an in-flight load, produced by [`BitmapLoader::begin`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    source: Option<SourceRef>,
}

impl LoadTicket {
    /// Generation tag of this request.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Source requested, if any.
    pub fn source(&self) -> Option<&SourceRef> {
        self.source.as_ref()
    }
}

struct LoaderShared {
    resolver: Arc<dyn SourceResolver>,
    latest: AtomicU64,
    tx: watch::Sender<Option<Arc<Bitmap>>>,
}

/// Asynchronous product photo loader with last-request-wins semantics.
///
/// Each request gets a generation from a monotonically increasing counter. Completions are
/// applied only if their generation is still the latest; superseded ones are dropped. The check
/// and the counter bump both run under the watch channel's lock, so they are ordered even on a
/// multi-threaded runtime.
#[derive(Clone)]
pub struct BitmapLoader {
    inner: Arc<LoaderShared>,
}

impl std::fmt::Debug for BitmapLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BitmapLoader")
            .field("latest", &self.latest_generation())
            .field("has_bitmap", &self.current().is_some())
            .finish()
    }
}

impl BitmapLoader {
    /// Loader fetching sources through `resolver`.
    pub fn new(resolver: impl SourceResolver + 'static) -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            inner: Arc::new(LoaderShared {
                resolver: Arc::new(resolver),
                latest: AtomicU64::new(0),
                tx,
            }),
        }
    }

    /// The current bitmap, if any.
    pub fn current(&self) -> Option<Arc<Bitmap>> {
        self.inner.tx.borrow().clone()
    }

    /// Subscribe to bitmap replacements.
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<Bitmap>>> {
        self.inner.tx.subscribe()
    }

    /// Most recently issued generation (0 before any request).
    pub fn latest_generation(&self) -> u64 {
        self.inner.latest.load(Ordering::Acquire)
    }

    /// Register a new request and return its ticket.
    ///
    /// With no source the current bitmap is cleared immediately.
    pub fn begin(&self, source: Option<SourceRef>) -> LoadTicket {
        let mut generation = 0;
        let clear = source.is_none();
        self.inner.tx.send_if_modified(|current| {
            generation = self.inner.latest.fetch_add(1, Ordering::AcqRel) + 1;
            if clear && current.is_some() {
                *current = None;
                return true;
            }
            false
        });
        tracing::debug!(generation, source = ?source, "bitmap load requested");
        LoadTicket { generation, source }
    }

    /// Apply the decoded result for `ticket`, unless a newer request exists.
    pub fn complete(&self, ticket: LoadTicket, result: PackshotResult<Bitmap>) -> LoadOutcome {
        let generation = ticket.generation;
        let Some(source) = ticket.source else {
            return LoadOutcome::Cleared { generation };
        };

        let mut outcome = None;
        self.inner.tx.send_if_modified(|current| {
            let latest = self.inner.latest.load(Ordering::Acquire);
            if latest != generation {
                outcome = Some(LoadOutcome::Stale { generation, latest });
                return false;
            }
            match result {
                Ok(bitmap) => {
                    outcome = Some(LoadOutcome::Applied {
                        generation,
                        size: bitmap.size(),
                    });
                    *current = Some(Arc::new(bitmap));
                    true
                }
                Err(e) => {
                    outcome = Some(LoadOutcome::Failed {
                        generation,
                        failure: LoadFailure {
                            source: source.clone(),
                            reason: e.to_string(),
                        },
                    });
                    false
                }
            }
        });

        let outcome = outcome.unwrap_or(LoadOutcome::Stale {
            generation,
            latest: self.latest_generation(),
        });
        match &outcome {
            LoadOutcome::Applied { size, .. } => {
                tracing::debug!(generation, %source, %size, "bitmap applied");
            }
            LoadOutcome::Stale { latest, .. } => {
                tracing::debug!(generation, latest, %source, "stale bitmap completion discarded");
            }
            LoadOutcome::Failed { failure, .. } => {
                tracing::warn!(generation, %source, reason = %failure.reason, "bitmap load failed");
            }
            LoadOutcome::Cleared { .. } => {}
        }
        outcome
    }

    /// Fetch and decode `source` off the async executor, then apply it if still current.
    ///
    /// Passing `None` clears the bitmap synchronously and supersedes any in-flight load.
    pub async fn load(&self, source: Option<SourceRef>) -> LoadOutcome {
        let ticket = self.begin(source);
        let Some(src) = ticket.source.clone() else {
            return LoadOutcome::Cleared {
                generation: ticket.generation,
            };
        };

        let resolver = self.inner.resolver.clone();
        let result = tokio::task::spawn_blocking(move || {
            let bytes = resolver.fetch(&src)?;
            decode_image(&bytes)
        })
        .await
        .unwrap_or_else(|e| Err(PackshotError::decode(format!("decode task failed: {e}"))));

        self.complete(ticket, result)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;
