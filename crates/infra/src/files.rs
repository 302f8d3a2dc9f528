//! Storage of uploaded pictures and documents.
//!
//! Uploads are addressed by `namespace/name`, which is also what upload fields
//! store. Names are sanitized on the way in and never overwrite an existing
//! file.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

/// Top-level upload directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// Procurement pictures; contents must be a recognizable image.
    Images,
    /// Procurement documents, any content.
    Files,
}

impl Namespace {
    pub const ALL: [Namespace; 2] = [Namespace::Images, Namespace::Files];

    pub fn as_str(self) -> &'static str {
        match self {
            Namespace::Images => "images",
            Namespace::Files => "files",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, FileStorageError> {
        Self::ALL
            .into_iter()
            .find(|ns| ns.as_str() == raw)
            .ok_or_else(|| FileStorageError::UnknownNamespace(raw.to_string()))
    }
}

impl core::fmt::Display for Namespace {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum FileStorageError {
    #[error("unknown upload namespace `{0}`")]
    UnknownNamespace(String),

    #[error("invalid file name `{0}`")]
    InvalidName(String),

    #[error("upload is empty")]
    Empty,

    #[error("`{0}` is not a supported image")]
    NotAnImage(String),

    #[error("file `{0}` not found")]
    NotFound(String),

    #[error("file storage i/o error: {0}")]
    Io(#[from] io::Error),
}

/// Backend holding uploaded files.
pub trait FileStorage: Send + Sync {
    /// Store `bytes` and return the path to keep in the upload field.
    fn save(&self, namespace: Namespace, filename: &str, bytes: &[u8]) -> Result<String, FileStorageError>;

    /// Contents of a previously returned path.
    fn open(&self, path: &str) -> Result<Vec<u8>, FileStorageError>;

    /// Whether `path` names a stored upload. Malformed paths are never stored.
    fn exists(&self, path: &str) -> bool;
}

/// Reduce a client-supplied file name to a safe single path component.
pub fn sanitize_filename(raw: &str) -> Result<String, FileStorageError> {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() || cleaned.chars().all(|c| c == '_') {
        return Err(FileStorageError::InvalidName(raw.to_string()));
    }
    Ok(cleaned.to_string())
}

/// Split a stored path into namespace and file name.
pub fn split_path(path: &str) -> Result<(Namespace, &str), FileStorageError> {
    let (ns, name) = path
        .split_once('/')
        .ok_or_else(|| FileStorageError::InvalidName(path.to_string()))?;
    let namespace = Namespace::parse(ns)?;
    if name.is_empty() || name.contains('/') || name.contains('\\') || name.starts_with('.') {
        return Err(FileStorageError::InvalidName(path.to_string()));
    }
    Ok((namespace, name))
}

/// MIME type guessed from the file extension.
pub fn content_type(path: &str) -> &'static str {
    let extension = path
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "pdf" => "application/pdf",
        "txt" => "text/plain; charset=utf-8",
        "csv" => "text/csv",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        _ => "application/octet-stream",
    }
}

fn check_contents(namespace: Namespace, filename: &str, bytes: &[u8]) -> Result<(), FileStorageError> {
    if bytes.is_empty() {
        return Err(FileStorageError::Empty);
    }
    if namespace == Namespace::Images && image::guess_format(bytes).is_err() {
        return Err(FileStorageError::NotAnImage(filename.to_string()));
    }
    Ok(())
}

/// `mask.png` -> `mask_1a2b3c4d.png`
fn disambiguate(name: &str) -> String {
    let suffix = Uuid::now_v7().simple().to_string();
    let suffix = &suffix[suffix.len() - 8..];
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{stem}_{suffix}.{ext}"),
        _ => format!("{name}_{suffix}"),
    }
}

/// Uploads kept under a directory on disk.
#[derive(Debug, Clone)]
pub struct LocalFileStorage {
    root: PathBuf,
}

impl LocalFileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl FileStorage for LocalFileStorage {
    fn save(&self, namespace: Namespace, filename: &str, bytes: &[u8]) -> Result<String, FileStorageError> {
        let name = sanitize_filename(filename)?;
        check_contents(namespace, &name, bytes)?;

        let name = publish_new(&self.root.join(namespace.as_str()), &name, bytes)?;

        let stored = format!("{namespace}/{name}");
        info!(path = %stored, bytes = bytes.len(), "upload stored");
        Ok(stored)
    }

    fn open(&self, path: &str) -> Result<Vec<u8>, FileStorageError> {
        let (namespace, name) = split_path(path)?;
        match fs::read(self.root.join(namespace.as_str()).join(name)) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(FileStorageError::NotFound(path.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    fn exists(&self, path: &str) -> bool {
        split_path(path)
            .map(|(namespace, name)| self.root.join(namespace.as_str()).join(name).is_file())
            .unwrap_or(false)
    }
}

/// Write `bytes` under `dir` as `name`, or a disambiguated variant when the
/// name is taken, and return the name used. An existing file is never replaced,
/// even by a concurrent writer.
fn publish_new(dir: &Path, name: &str, bytes: &[u8]) -> io::Result<String> {
    fs::create_dir_all(dir)?;
    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(bytes)?;
    temp.as_file().sync_all()?;

    let mut candidate = name.to_string();
    loop {
        match temp.persist_noclobber(dir.join(&candidate)) {
            Ok(_) => return Ok(candidate),
            Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => {
                temp = e.file;
                candidate = disambiguate(name);
            }
            Err(e) => return Err(e.error),
        }
    }
}

/// Uploads kept in memory, for tests.
#[derive(Debug, Default)]
pub struct InMemoryFileStorage {
    files: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl InMemoryFileStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FileStorage for InMemoryFileStorage {
    fn save(&self, namespace: Namespace, filename: &str, bytes: &[u8]) -> Result<String, FileStorageError> {
        let name = sanitize_filename(filename)?;
        check_contents(namespace, &name, bytes)?;

        let mut files = self
            .files
            .write()
            .map_err(|_| io::Error::other("file storage lock poisoned"))?;
        let mut path = format!("{namespace}/{name}");
        while files.contains_key(&path) {
            path = format!("{namespace}/{}", disambiguate(&name));
        }
        files.insert(path.clone(), bytes.to_vec());
        Ok(path)
    }

    fn open(&self, path: &str) -> Result<Vec<u8>, FileStorageError> {
        split_path(path)?;
        let files = self
            .files
            .read()
            .map_err(|_| io::Error::other("file storage lock poisoned"))?;
        files
            .get(path)
            .cloned()
            .ok_or_else(|| FileStorageError::NotFound(path.to_string()))
    }

    fn exists(&self, path: &str) -> bool {
        split_path(path).is_ok()
            && self
                .files
                .read()
                .map(|files| files.contains_key(path))
                .unwrap_or(false)
    }
}
