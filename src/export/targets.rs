use std::borrow::Cow;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::Context;

use crate::export::delivery::{DeliveryKind, DeliveryTarget};
use crate::export::encode::{EncodedImage, PNG_MIME};
use crate::foundation::error::{PackshotError, PackshotResult};

/// Shares through an external program, which receives the path of a temporary PNG.
///
/// Unsupported when no program is configured.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandShare {
    program: Option<String>,
    args: Vec<String>,
    staging_dir: Option<PathBuf>,
}

impl CommandShare {
    /// Parse a whitespace-separated command line; `None` or blank disables sharing.
    pub fn from_command_line(cmd: Option<&str>) -> Self {
        let mut parts = cmd.unwrap_or_default().split_whitespace().map(str::to_string);
        Self {
            program: parts.next(),
            args: parts.collect(),
            staging_dir: None,
        }
    }

    /// Stage temporary files under `dir` instead of the system temp directory.
    pub fn with_staging_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.staging_dir = Some(dir.into());
        self
    }

    /// Write the PNG to a uniquely named file; it is removed when the handle drops.
    fn stage(&self, image: &EncodedImage) -> PackshotResult<tempfile::NamedTempFile> {
        let stem = image
            .file_name()
            .strip_suffix(".png")
            .unwrap_or(image.file_name());
        let mut builder = tempfile::Builder::new();
        builder.prefix(stem).suffix(".png");
        let mut file = match &self.staging_dir {
            Some(dir) => {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("create staging dir '{}'", dir.display()))?;
                builder.tempfile_in(dir)
            }
            None => builder.tempfile(),
        }
        .context("create staged png")?;
        file.write_all(image.bytes())
            .and_then(|()| file.flush())
            .with_context(|| format!("write staged png '{}'", file.path().display()))?;
        Ok(file)
    }
}

impl DeliveryTarget for CommandShare {
    fn kind(&self) -> DeliveryKind {
        DeliveryKind::Share
    }

    fn supports(&self, mime: &str) -> bool {
        self.program.is_some() && mime == PNG_MIME
    }

    fn deliver(&self, image: &EncodedImage) -> PackshotResult<String> {
        let Some(program) = &self.program else {
            return Err(PackshotError::delivery("no share command configured"));
        };
        let staged = self.stage(image)?;

        let output = Command::new(program)
            .args(&self.args)
            .arg(staged.path())
            .output()
            .map_err(|e| PackshotError::delivery(format!("failed to spawn '{program}': {e}")))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PackshotError::delivery(format!(
                "'{program}' exited with status {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        Ok(format!("shared {} via {program}", image.file_name()))
    }
}

/// Writes the decoded pixels to the system clipboard.
///
/// Unsupported when no clipboard can be opened, e.g. on a headless machine. A clipboard that
/// opens but rejects the write is a failure.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SystemClipboard;

impl DeliveryTarget for SystemClipboard {
    fn kind(&self) -> DeliveryKind {
        DeliveryKind::Clipboard
    }

    fn supports(&self, mime: &str) -> bool {
        mime == PNG_MIME && arboard::Clipboard::new().is_ok()
    }

    fn deliver(&self, image: &EncodedImage) -> PackshotResult<String> {
        let rgba = image.decode_rgba8()?;
        let mut clip = arboard::Clipboard::new()
            .map_err(|e| PackshotError::delivery(format!("clipboard unavailable: {e}")))?;
        clip.set_image(arboard::ImageData {
            width: image.width() as usize,
            height: image.height() as usize,
            bytes: Cow::Owned(rgba),
        })
        .map_err(|e| PackshotError::delivery(format!("clipboard write failed: {e}")))?;
        Ok(format!("copied {} to clipboard", image.size()))
    }
}

/// Saves the PNG into a directory without overwriting existing files.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Download {
    dir: PathBuf,
}

impl Download {
    /// Save into `dir`, creating it on first use.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Target directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DeliveryTarget for Download {
    fn kind(&self) -> DeliveryKind {
        DeliveryKind::Download
    }

    fn supports(&self, _mime: &str) -> bool {
        true
    }

    fn deliver(&self, image: &EncodedImage) -> PackshotResult<String> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create download dir '{}'", self.dir.display()))?;
        let path = write_new_file(&self.dir, image.file_name(), image.bytes())?;
        Ok(format!("saved {}", path.display()))
    }
}

/// Write `bytes` to `dir/name`, or `name (1)`, `name (2)`, ... if taken.
///
/// A file that cannot be written completely is removed again.
pub fn write_new_file(dir: &Path, name: &str, bytes: &[u8]) -> PackshotResult<PathBuf> {
    let (stem, ext) = match name.rsplit_once('.') {
        Some((s, e)) if !s.is_empty() => (s, Some(e)),
        _ => (name, None),
    };

    for n in 0u32.. {
        let candidate = match (n, ext) {
            (0, _) => name.to_string(),
            (n, Some(ext)) => format!("{stem} ({n}).{ext}"),
            (n, None) => format!("{stem} ({n})"),
        };
        let path = dir.join(candidate);
        let file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path);
        match file {
            Ok(f) => {
                write_or_remove(&path, f, bytes)?;
                return Ok(path);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
            Err(e) => {
                return Err(PackshotError::delivery(format!(
                    "open '{}': {e}",
                    path.display()
                )));
            }
        }
    }
    Err(PackshotError::delivery("no free file name"))
}

fn write_or_remove(path: &Path, mut out: impl Write, bytes: &[u8]) -> PackshotResult<()> {
    let written = out.write_all(bytes).and_then(|()| out.flush());
    drop(out);
    if let Err(e) = written {
        if let Err(rm) = std::fs::remove_file(path) {
            tracing::warn!(path = %path.display(), error = %rm, "partial file left behind");
        }
        return Err(PackshotError::delivery(format!(
            "write '{}': {e}",
            path.display()
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/export/targets.rs"]
mod tests;
