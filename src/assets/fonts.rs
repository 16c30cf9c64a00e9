use std::path::Path;
use std::sync::Arc;

use usvg::fontdb;

/// Family names tried, in order, before the generic sans-serif family.
pub const SANS_FALLBACK_FAMILIES: &[&str] = &["Inter", "Helvetica Neue", "Helvetica", "Arial"];

/// Font configuration consumed by [`FontBook::system`].
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FontConfig {
    /// Extra directories scanned for `.ttf`, `.otf` and `.ttc` files.
    pub directories: Vec<std::path::PathBuf>,
    /// Family tried ahead of the built-in fallback stack.
    pub preferred_family: Option<String>,
    /// Skip the platform font directories.
    pub skip_system_fonts: bool,
}

/// A face picked for a caption: raw font file bytes plus collection index.
#[derive(Clone)]
pub struct ResolvedFont {
    /// Whole font file (collections included).
    pub bytes: Arc<Vec<u8>>,
    /// Face index inside `bytes`.
    pub index: u32,
    /// Family name reported by the font database.
    pub family: String,
}

impl std::fmt::Debug for ResolvedFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedFont")
            .field("family", &self.family)
            .field("index", &self.index)
            .field("bytes_len", &self.bytes.len())
            .finish()
    }
}

/// Font database used for caption text.
#[derive(Clone)]
pub struct FontBook {
    db: Arc<fontdb::Database>,
    preferred: Option<String>,
}

impl std::fmt::Debug for FontBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontBook")
            .field("faces", &self.face_count())
            .field("preferred", &self.preferred)
            .finish()
    }
}

impl FontBook {
    /// Load platform fonts plus the configured directories.
    pub fn system(config: &FontConfig) -> Self {
        let mut db = fontdb::Database::new();
        if !config.skip_system_fonts {
            db.load_system_fonts();
        }
        for dir in &config.directories {
            load_fonts_from_dir(&mut db, dir);
        }
        tracing::debug!(faces = db.len(), "font database loaded");
        Self {
            db: Arc::new(db),
            preferred: config.preferred_family.clone(),
        }
    }

    /// A book with no faces; captions are skipped.
    pub fn empty() -> Self {
        Self {
            db: Arc::new(fontdb::Database::new()),
            preferred: None,
        }
    }

    /// A book holding only the faces in `bytes`.
    pub fn from_font_bytes(bytes: Vec<u8>) -> Self {
        let mut db = fontdb::Database::new();
        db.load_font_data(bytes);
        Self {
            db: Arc::new(db),
            preferred: None,
        }
    }

    /// Number of faces known to the book.
    pub fn face_count(&self) -> usize {
        self.db.len()
    }

    /// Pick a face for `weight` from the sans-serif fallback stack.
    ///
    /// Falls back to the first face in the database when no family in the stack matches.
    pub fn resolve(&self, weight: u16) -> Option<ResolvedFont> {
        let mut families: Vec<fontdb::Family<'_>> = Vec::new();
        if let Some(p) = &self.preferred {
            families.push(fontdb::Family::Name(p.as_str()));
        }
        families.extend(SANS_FALLBACK_FAMILIES.iter().map(|n| fontdb::Family::Name(*n)));
        families.push(fontdb::Family::SansSerif);

        let query = fontdb::Query {
            families: &families,
            weight: fontdb::Weight(weight),
            stretch: fontdb::Stretch::Normal,
            style: fontdb::Style::Normal,
        };
        let id = self
            .db
            .query(&query)
            .or_else(|| self.db.faces().next().map(|f| f.id))?;

        let family = self
            .db
            .face(id)
            .and_then(|f| f.families.first().map(|(name, _)| name.clone()))
            .unwrap_or_default();
        self.db
            .with_face_data(id, |data, index| ResolvedFont {
                bytes: Arc::new(data.to_vec()),
                index,
                family,
            })
    }
}

fn load_fonts_from_dir(db: &mut fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        tracing::debug!(dir = %dir.display(), "font directory not readable");
        return;
    };

    for entry in rd.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if ext != "ttf" && ext != "otf" && ext != "ttc" {
            continue;
        }
        if let Err(e) = db.load_font_file(&path) {
            tracing::warn!(path = %path.display(), error = %e, "failed to load font file");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
