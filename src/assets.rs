use std::collections::HashMap;
use std::path::Path;

use crate::geometry::Size;

/// Source of sprite dimensions for arrows, shadows and header images.
///
/// Only sizes are needed; pixels stay with the host renderer.
pub trait SpriteCatalog {
    fn sprite_size(&self, name: &str) -> Option<Size>;

    /// Size of `name`, or 32×32 when the sprite is unknown.
    fn size_or_default(&self, name: &str) -> Size {
        match self.sprite_size(name) {
            Some(size) => size,
            None => {
                tracing::warn!(sprite = name, "sprite not found; assuming 32x32");
                Size::default()
            }
        }
    }
}

// ── DirectoryCatalog ──────────────────────────────────────────────────────────

/// Sizes of every `.png` under a directory, keyed by file stem.
///
/// Only image headers are read.
#[derive(Clone, Debug, Default)]
pub struct DirectoryCatalog {
    sizes: HashMap<String, Size>,
}

impl DirectoryCatalog {
    /// Scan `path` recursively. Duplicate stems keep the first file found;
    /// unreadable files are skipped with a warning.
    pub fn scan(path: impl AsRef<Path>) -> Self {
        let mut sizes = HashMap::new();

        for entry in walkdir::WalkDir::new(path.as_ref())
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let file_path = entry.path();
            if file_path.extension().and_then(|s| s.to_str()) != Some("png") {
                continue;
            }
            let name = match file_path.file_stem().and_then(|s| s.to_str()) {
                Some(n) if !n.is_empty() => n.to_string(),
                _ => continue,
            };
            if sizes.contains_key(&name) {
                tracing::warn!(name, path = ?file_path, "duplicate sprite name; skipping");
                continue;
            }

            match image::image_dimensions(file_path) {
                Ok((w, h)) => {
                    sizes.insert(name, Size::new(w as i32, h as i32));
                }
                Err(e) => tracing::warn!(path = ?file_path, "failed to read sprite header: {e}"),
            }
        }

        tracing::debug!(count = sizes.len(), "sprite catalog scanned");
        Self { sizes }
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }
}

impl SpriteCatalog for DirectoryCatalog {
    fn sprite_size(&self, name: &str) -> Option<Size> {
        self.sizes.get(name).copied()
    }
}

// ── MemoryCatalog ─────────────────────────────────────────────────────────────

/// Catalog filled by hand.
#[derive(Clone, Debug, Default)]
pub struct MemoryCatalog {
    sizes: HashMap<String, Size>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, w: i32, h: i32) -> Self {
        self.sizes.insert(name.to_string(), Size::new(w, h));
        self
    }
}

impl SpriteCatalog for MemoryCatalog {
    fn sprite_size(&self, name: &str) -> Option<Size> {
        self.sizes.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_sprite_defaults_to_32() {
        let cat = MemoryCatalog::new().with("Arrow", 16, 24);
        assert_eq!(cat.size_or_default("Arrow"), Size::new(16, 24));
        assert_eq!(cat.size_or_default("Missing"), Size::new(32, 32));
    }

    #[test]
    fn scan_reads_png_headers() {
        let dir = std::env::temp_dir().join(format!("jdialog_catalog_{}", std::process::id()));
        std::fs::create_dir_all(dir.join("nested")).unwrap();
        image::RgbaImage::new(20, 12).save(dir.join("nested/Tag.png")).unwrap();
        std::fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let cat = DirectoryCatalog::scan(&dir);
        assert_eq!(cat.len(), 1);
        assert_eq!(cat.sprite_size("Tag"), Some(Size::new(20, 12)));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn scan_of_missing_directory_is_empty() {
        assert!(DirectoryCatalog::scan("/no/such/dir/for/jdialog").is_empty());
    }
}
