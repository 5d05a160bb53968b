// this_file: backends/capgen-skia/src/fonts.rs

//! Font file loading and discovery.

use capgen_core::{CaptchaError, Result};
use log::{debug, info, warn};
use owned_ttf_parser::{AsFaceRef, OwnedFace};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

const FONT_EXTENSIONS: &[&str] = &["ttf", "otf", "ttc"];

/// A parsed font file (first face of collections).
pub struct FontFace {
    label: String,
    path: Option<PathBuf>,
    face: OwnedFace,
}

impl FontFace {
    /// Read and parse a font file from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CaptchaError::FontNotFound {
                path: path.to_path_buf(),
            });
        }
        let data = std::fs::read(path)?;
        let label = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let mut font = Self::parse(label, data, path)?;
        font.path = Some(path.to_path_buf());
        debug!(target: "capgen::fonts", "loaded font {} from {}", font.label, path.display());
        Ok(font)
    }

    /// Parse an in-memory font file.
    pub fn from_bytes(label: impl Into<String>, data: Vec<u8>) -> Result<Self> {
        let label = label.into();
        let pseudo_path = PathBuf::from(&label);
        Self::parse(label, data, &pseudo_path)
    }

    fn parse(label: String, data: Vec<u8>, path: &Path) -> Result<Self> {
        let face = OwnedFace::from_vec(data, 0).map_err(|err| CaptchaError::InvalidFont {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
        Ok(Self {
            label,
            path: None,
            face,
        })
    }

    /// Short name used in renderer labels.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Source file, when the font came from disk.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn face(&self) -> &ttf_parser::Face<'_> {
        self.face.as_face_ref()
    }

    /// Whether the font maps `ch` to a real glyph.
    pub fn has_glyph(&self, ch: char) -> bool {
        self.face().glyph_index(ch).is_some()
    }
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("label", &self.label)
            .field("path", &self.path)
            .finish()
    }
}

/// Load every path, failing on the first unreadable font.
pub fn load_fonts<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<Arc<FontFace>>> {
    paths
        .iter()
        .map(|path| FontFace::from_path(path).map(Arc::new))
        .collect()
}

/// Recursively list font files below `dir`, sorted by path.
pub fn discover_fonts(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(CaptchaError::FontNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut fonts = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(target: "capgen::fonts", "skipping unreadable entry: {err}");
                continue;
            }
        };
        if entry.file_type().is_file() && has_font_extension(entry.path()) {
            fonts.push(entry.into_path());
        }
    }
    fonts.sort();
    info!(target: "capgen::fonts", "discovered {} font files in {}", fonts.len(), dir.display());
    Ok(fonts)
}

/// Font files from the platform font directories that exist on this machine.
pub fn discover_system_fonts() -> Vec<PathBuf> {
    let mut fonts = Vec::new();
    for dir in capgen_core::utils::system_font_dirs() {
        let expanded = shellexpand::tilde(&dir);
        let dir_path = Path::new(expanded.as_ref());
        if !dir_path.is_dir() {
            continue;
        }
        match discover_fonts(dir_path) {
            Ok(found) => fonts.extend(found),
            Err(err) => warn!(target: "capgen::fonts", "cannot scan {}: {err}", dir_path.display()),
        }
    }
    fonts
}

fn has_font_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            FONT_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}
