//! Artifact discovery on the content filesystem
//!
//! The external engine writes albums to disk under naming this service does
//! not control: a compiled document named exactly after the album id, or a
//! directory whose name merely *contains* the album id. The locator finds
//! both by walking the filesystem on every call — no caching, so results are
//! always fresh relative to the engine's out-of-band writes.

use crate::config::StorageConfig;
use crate::types::{AlbumInfo, ImageFile};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Fixed extension of the compiled per-album document
pub const DOCUMENT_EXTENSION: &str = "pdf";

/// Locates artifacts (documents and image sets) for album identifiers
#[derive(Clone)]
pub struct ArtifactLocator {
    content_root: PathBuf,
    document_dir: PathBuf,
    image_extensions: Vec<String>,
}

impl ArtifactLocator {
    /// Create a locator over the configured content root and document dir
    pub fn new(storage: &StorageConfig) -> Self {
        Self {
            content_root: storage.content_root.clone(),
            document_dir: storage.document_dir.clone(),
            image_extensions: storage.image_extensions.clone(),
        }
    }

    /// Find the compiled document for an album, if it exists
    ///
    /// The document name must match the album id exactly (plus the fixed
    /// extension); there is no substring matching on this path.
    pub async fn find_document(&self, album_id: &str) -> Option<PathBuf> {
        let candidate = self
            .document_dir
            .join(format!("{album_id}.{DOCUMENT_EXTENSION}"));
        match fs::metadata(&candidate).await {
            Ok(meta) if meta.is_file() => Some(candidate),
            _ => None,
        }
    }

    /// Find the directory holding an album's page images, if one exists
    ///
    /// Two passes over the content root:
    /// 1. immediate child directories whose *name* contains the album id;
    /// 2. a full recursive scan for any directory whose *path* contains it.
    ///
    /// A directory only qualifies if it holds at least one recognized image
    /// somewhere beneath it. Entries are visited in lexicographic order, so
    /// the first qualifying match is deterministic.
    pub async fn find_image_set(&self, album_id: &str) -> Option<PathBuf> {
        for dir in sorted_child_dirs(&self.content_root).await {
            let name = dir.file_name().and_then(|n| n.to_str()).unwrap_or("");
            if name.contains(album_id) && self.dir_has_images(&dir).await {
                return Some(dir);
            }
        }

        self.find_image_set_recursive(&self.content_root, album_id)
            .await
    }

    /// List all recognized images under an album directory, recursively
    ///
    /// Descriptors carry the file name and the path relative to `dir`,
    /// sorted by that relative path for deterministic ordering.
    pub async fn list_images(&self, dir: &Path) -> Vec<ImageFile> {
        let mut paths = Vec::new();
        self.collect_images(dir, &mut paths).await;
        paths.sort();

        paths
            .into_iter()
            .filter_map(|path| {
                let name = path.file_name()?.to_str()?.to_string();
                let relative = path.strip_prefix(dir).ok()?.to_path_buf();
                Some(ImageFile {
                    name,
                    path: relative,
                })
            })
            .collect()
    }

    /// List every album discoverable on disk, with artifact flags
    ///
    /// Albums come from two sources: documents in the document directory
    /// (album id = file stem) and qualifying child directories of the content
    /// root (album id = directory name). An album found in both places
    /// appears once.
    pub async fn list_albums(&self) -> Vec<AlbumInfo> {
        let mut albums: Vec<AlbumInfo> = Vec::new();

        for path in sorted_children(&self.document_dir).await {
            let is_document = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(DOCUMENT_EXTENSION));
            if !is_document {
                continue;
            }
            if let Some(album_id) = path.file_stem().and_then(|s| s.to_str()) {
                let has_images = self.find_image_set(album_id).await.is_some();
                albums.push(AlbumInfo {
                    album_id: album_id.to_string(),
                    has_pdf: true,
                    has_images,
                });
            }
        }

        for dir in sorted_child_dirs(&self.content_root).await {
            let Some(album_id) = dir.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !self.dir_has_images(&dir).await {
                continue;
            }
            if albums.iter().any(|a| a.album_id == album_id) {
                continue;
            }
            let has_pdf = self.find_document(album_id).await.is_some();
            albums.push(AlbumInfo {
                album_id: album_id.to_string(),
                has_pdf,
                has_images: true,
            });
        }

        albums
    }

    /// Whether a file path has a recognized image extension
    pub fn is_image(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                self.image_extensions
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(ext))
            })
    }

    /// Recursive fallback pass: any directory whose full path contains the id
    fn find_image_set_recursive<'a>(
        &'a self,
        path: &'a Path,
        album_id: &'a str,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Option<PathBuf>> + Send + 'a>> {
        Box::pin(async move {
            for dir in sorted_child_dirs(path).await {
                if dir.to_string_lossy().contains(album_id) && self.dir_has_images(&dir).await {
                    return Some(dir);
                }
                if let Some(found) = self.find_image_set_recursive(&dir, album_id).await {
                    return Some(found);
                }
            }
            None
        })
    }

    /// Whether at least one recognized image exists under `dir`, recursively
    fn dir_has_images<'a>(
        &'a self,
        dir: &'a Path,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = bool> + Send + 'a>> {
        Box::pin(async move {
            for path in sorted_children(dir).await {
                let is_dir = fs::metadata(&path).await.map(|m| m.is_dir()).unwrap_or(false);
                if is_dir {
                    if self.dir_has_images(&path).await {
                        return true;
                    }
                } else if self.is_image(&path) {
                    return true;
                }
            }
            false
        })
    }

    /// Collect every recognized image under `dir` into `out`
    fn collect_images<'a>(
        &'a self,
        dir: &'a Path,
        out: &'a mut Vec<PathBuf>,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = ()> + Send + 'a>> {
        Box::pin(async move {
            for path in sorted_children(dir).await {
                let is_dir = fs::metadata(&path).await.map(|m| m.is_dir()).unwrap_or(false);
                if is_dir {
                    self.collect_images(&path, out).await;
                } else if self.is_image(&path) {
                    out.push(path);
                }
            }
        })
    }
}

/// Media type for serving a file, derived from its extension
pub fn media_type(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some(DOCUMENT_EXTENSION) => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// All entries of a directory, sorted by path for deterministic traversal
///
/// An unreadable or missing directory yields no entries — the caller treats
/// that the same as an empty one.
async fn sorted_children(dir: &Path) -> Vec<PathBuf> {
    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };

    let mut children = Vec::new();
    while let Ok(Some(entry)) = entries.next_entry().await {
        children.push(entry.path());
    }
    children.sort();
    children
}

/// Immediate child directories, sorted by path
async fn sorted_child_dirs(dir: &Path) -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    for path in sorted_children(dir).await {
        if fs::metadata(&path).await.map(|m| m.is_dir()).unwrap_or(false) {
            dirs.push(path);
        }
    }
    dirs
}
