use std::sync::{Arc, Mutex};

use crate::config::DeliveryConfig;
use crate::export::encode::EncodedImage;
use crate::export::targets::{CommandShare, Download, SystemClipboard};
use crate::foundation::error::{PackshotError, PackshotResult};

/// Which slot of the chain a target fills.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeliveryKind {
    /// Native share sheet or an external share program.
    Share,
    /// System clipboard.
    Clipboard,
    /// File written to disk.
    Download,
}

impl std::fmt::Display for DeliveryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Share => "share",
            Self::Clipboard => "clipboard",
            Self::Download => "download",
        })
    }
}

/// A place an exported image can be handed to.
///
/// `supports` and `deliver` run on a blocking worker thread and may do synchronous IO.
pub trait DeliveryTarget: Send + Sync {
    /// Slot this target fills.
    fn kind(&self) -> DeliveryKind;
    /// Whether the target can take images of type `mime` right now.
    fn supports(&self, mime: &str) -> bool;
    /// Hand over `image`, returning a short description of where it went.
    fn deliver(&self, image: &EncodedImage) -> PackshotResult<String>;
}

/// How one attempt went.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttemptResult {
    /// The target declined the MIME type or is not configured.
    Unsupported,
    /// The target tried and failed.
    Failed(String),
    /// The target accepted the image.
    Delivered(String),
}

/// One step of the chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeliveryAttempt {
    /// Target tried.
    pub kind: DeliveryKind,
    /// What happened.
    pub result: AttemptResult,
}

/// Final state of a delivery.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// Delivered by the given target.
    Delivered(DeliveryKind),
    /// Every target was unsupported or failed.
    Undelivered,
}

/// Everything the chain did for one image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Attempts in the order they were made.
    pub attempts: Vec<DeliveryAttempt>,
    /// Messages meant for the user.
    pub notices: Vec<String>,
    /// Final state.
    pub outcome: DeliveryOutcome,
}

impl DeliveryReport {
    /// Whether some target took the image.
    pub fn is_delivered(&self) -> bool {
        matches!(self.outcome, DeliveryOutcome::Delivered(_))
    }
}

/// Ordered fallback chain: the first target that accepts the image wins.
#[derive(Clone, Default)]
pub struct DeliveryChain {
    targets: Vec<Arc<dyn DeliveryTarget>>,
}

impl std::fmt::Debug for DeliveryChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.targets.iter().map(|t| t.kind()))
            .finish()
    }
}

impl DeliveryChain {
    /// Empty chain; every delivery is `Undelivered`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a target, tried after those already present.
    pub fn with_target(mut self, target: impl DeliveryTarget + 'static) -> Self {
        self.targets.push(Arc::new(target));
        self
    }

    /// Share, clipboard, download, as enabled in `config`.
    pub fn from_config(config: &DeliveryConfig) -> Self {
        let mut chain = Self::new();
        if config.share {
            chain = chain.with_target(CommandShare::from_command_line(
                config.share_command.as_deref(),
            ));
        }
        if config.clipboard {
            chain = chain.with_target(SystemClipboard);
        }
        if config.download {
            chain = chain.with_target(Download::new(config.resolved_download_dir()));
        }
        chain
    }

    /// Kinds in the order they are tried.
    pub fn kinds(&self) -> Vec<DeliveryKind> {
        self.targets.iter().map(|t| t.kind()).collect()
    }

    /// Try each target in order until one delivers.
    pub async fn deliver(&self, image: &EncodedImage) -> DeliveryReport {
        let mut attempts = Vec::with_capacity(self.targets.len());
        let mut notices = Vec::new();

        for target in &self.targets {
            let kind = target.kind();
            let (t, img) = (target.clone(), image.clone());
            let result = tokio::task::spawn_blocking(move || {
                t.supports(img.mime()).then(|| t.deliver(&img))
            })
            .await
            .unwrap_or_else(|e| Some(Err(PackshotError::delivery(format!("task failed: {e}")))));
            let Some(result) = result else {
                tracing::debug!(%kind, mime = image.mime(), "delivery target unsupported");
                attempts.push(DeliveryAttempt {
                    kind,
                    result: AttemptResult::Unsupported,
                });
                continue;
            };

            match result {
                Ok(detail) => {
                    tracing::debug!(%kind, %detail, "image delivered");
                    attempts.push(DeliveryAttempt {
                        kind,
                        result: AttemptResult::Delivered(detail),
                    });
                    return DeliveryReport {
                        attempts,
                        notices,
                        outcome: DeliveryOutcome::Delivered(kind),
                    };
                }
                Err(e) => {
                    tracing::warn!(%kind, error = %e, "delivery attempt failed");
                    if kind == DeliveryKind::Clipboard {
                        notices.push(format!("Could not copy the image to the clipboard: {e}"));
                    }
                    attempts.push(DeliveryAttempt {
                        kind,
                        result: AttemptResult::Failed(e.to_string()),
                    });
                }
            }
        }

        tracing::warn!(attempts = attempts.len(), "image could not be delivered");
        DeliveryReport {
            attempts,
            notices,
            outcome: DeliveryOutcome::Undelivered,
        }
    }
}

/// Collects deliveries in memory.
///
/// Can be made to fail or to decline, to exercise chain fallbacks.
#[derive(Debug)]
pub struct InMemoryTarget {
    kind: DeliveryKind,
    mode: InMemoryMode,
    received: Arc<Mutex<Vec<EncodedImage>>>,
}

#[derive(Clone, Debug)]
enum InMemoryMode {
    Accept,
    Decline,
    Fail(String),
}

impl InMemoryTarget {
    /// Target accepting every image.
    pub fn accepting(kind: DeliveryKind) -> Self {
        Self {
            kind,
            mode: InMemoryMode::Accept,
            received: Arc::default(),
        }
    }

    /// Target reporting no support.
    pub fn declining(kind: DeliveryKind) -> Self {
        Self {
            mode: InMemoryMode::Decline,
            ..Self::accepting(kind)
        }
    }

    /// Target failing with `reason`.
    pub fn failing(kind: DeliveryKind, reason: impl Into<String>) -> Self {
        Self {
            mode: InMemoryMode::Fail(reason.into()),
            ..Self::accepting(kind)
        }
    }

    /// Shared handle to received images; stays valid after the target moves into a chain.
    pub fn received(&self) -> Arc<Mutex<Vec<EncodedImage>>> {
        self.received.clone()
    }
}

impl DeliveryTarget for InMemoryTarget {
    fn kind(&self) -> DeliveryKind {
        self.kind
    }

    fn supports(&self, _mime: &str) -> bool {
        !matches!(self.mode, InMemoryMode::Decline)
    }

    fn deliver(&self, image: &EncodedImage) -> PackshotResult<String> {
        if let InMemoryMode::Fail(reason) = &self.mode {
            return Err(PackshotError::delivery(reason.clone()));
        }
        let mut received = self
            .received
            .lock()
            .map_err(|_| PackshotError::delivery("in-memory target poisoned"))?;
        received.push(image.clone());
        Ok(format!("kept {} in memory", image.file_name()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/delivery.rs"]
mod tests;
