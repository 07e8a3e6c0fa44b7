//! Upload directory management for recipe images.
//!
//! Files are written under a single flat directory and referenced from the
//! `recipes.image` column by their server-local path. A freshly written file
//! is held as a [`PendingUpload`] until the row referencing it exists; a
//! pending upload that is dropped or discarded removes its file again.

use crate::constants::UPLOADS_ROUTE;
use crate::error::AppError;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

const RANDOM_SUFFIX_LEN: usize = 12;

/// Flat directory holding uploaded recipe images.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the upload directory if it does not exist yet.
    ///
    /// # Errors
    /// Returns an error when the directory cannot be created.
    pub fn ensure_dir(&self) -> Result<(), AppError> {
        fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    /// Write `bytes` under a freshly generated name.
    ///
    /// The file is never overwritten: the name is opened with `create_new`,
    /// so a collision surfaces as an error instead of replacing another
    /// recipe's image.
    ///
    /// # Returns
    /// A [`PendingUpload`] that must be [kept](PendingUpload::keep) once the
    /// referencing row is stored.
    ///
    /// # Errors
    /// Returns an error when the directory or file cannot be written.
    pub fn write(&self, bytes: &[u8], original_name: &str) -> Result<PendingUpload, AppError> {
        self.ensure_dir()?;
        let path = self.dir.join(generate_file_name(original_name));
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)?;
        // From here on the guard owns the file and cleans it up on failure.
        let pending = PendingUpload { path, kept: false };
        write_and_sync(file, bytes)?;
        tracing::debug!(path = %pending.path.display(), size = bytes.len(), "Wrote upload");
        Ok(pending)
    }

    /// Best-effort removal of a stored image.
    ///
    /// Failures are logged and otherwise ignored; callers never block on
    /// image cleanup.
    pub fn remove(&self, stored_path: &str) {
        if let Err(err) = fs::remove_file(stored_path) {
            tracing::error!("Error deleting image file {}: {}", stored_path, err);
        }
    }
}

/// An uploaded file not yet referenced by any row.
#[derive(Debug)]
pub struct PendingUpload {
    path: PathBuf,
    kept: bool,
}

impl PendingUpload {
    #[cfg(test)]
    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Path string as persisted in `recipes.image`.
    pub fn stored_path(&self) -> String {
        self.path.to_string_lossy().to_string()
    }

    /// Mark the file as referenced and hand back its stored path.
    pub fn keep(mut self) -> String {
        self.kept = true;
        self.stored_path()
    }

    /// Remove the file because the row referencing it was never stored.
    pub fn discard(mut self) {
        self.kept = true;
        remove_pending_file(&self.path);
    }
}

impl Drop for PendingUpload {
    fn drop(&mut self) {
        if !self.kept {
            remove_pending_file(&self.path);
        }
    }
}

fn write_and_sync(mut file: File, bytes: &[u8]) -> std::io::Result<()> {
    file.write_all(bytes)?;
    file.sync_all()
}

fn remove_pending_file(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => tracing::debug!(path = %path.display(), "Removed unreferenced upload"),
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        Err(err) => tracing::error!(
            "Failed to remove unreferenced upload {}: {}",
            path.display(),
            err
        ),
    }
}

/// Generate `<millis>-<random hex><.ext>` for an uploaded file.
///
/// The extension comes from the client-supplied name and is dropped unless it
/// is plain ASCII alphanumeric.
pub fn generate_file_name(original_name: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let random = uuid::Uuid::new_v4().simple().to_string();
    format!(
        "{}-{}{}",
        millis,
        &random[..RANDOM_SUFFIX_LEN],
        extension_of(original_name)
    )
}

/// Extension of `original_name` including the leading dot, or `""`.
pub fn extension_of(original_name: &str) -> String {
    let base = file_name_of(original_name);
    match base.rfind('.') {
        Some(0) | None => String::new(),
        Some(dot) => {
            let ext = &base[dot + 1..];
            if !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()) {
                format!(".{}", ext)
            } else {
                String::new()
            }
        }
    }
}

/// Last path component of `path`, accepting both `/` and `\` separators.
pub fn file_name_of(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Public URL for a stored image path: `<base_url>/uploads/<basename>`.
pub fn public_url(base_url: &str, stored_path: &str) -> String {
    format!(
        "{}{}/{}",
        base_url.trim_end_matches('/'),
        UPLOADS_ROUTE,
        file_name_of(stored_path)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn extension_is_kept_with_leading_dot() {
        assert_eq!(extension_of("photo.jpg"), ".jpg");
        assert_eq!(extension_of("archive.tar.gz"), ".gz");
        assert_eq!(extension_of("C:\\fakepath\\dish.PNG"), ".PNG");
    }

    #[test]
    fn missing_or_unusual_extensions_are_dropped() {
        assert_eq!(extension_of("photo"), "");
        assert_eq!(extension_of(".hidden"), "");
        assert_eq!(extension_of("trailing."), "");
        assert_eq!(extension_of("weird.j p g"), "");
    }

    #[test]
    fn generated_names_are_unique_within_a_millisecond() {
        let names: std::collections::HashSet<String> =
            (0..64).map(|_| generate_file_name("photo.jpg")).collect();
        assert_eq!(names.len(), 64);
        for name in &names {
            assert!(name.ends_with(".jpg"), "name: {}", name);
            let (millis, rest) = name.split_once('-').expect("separator");
            assert!(millis.parse::<i64>().is_ok(), "name: {}", name);
            assert_eq!(rest.len(), RANDOM_SUFFIX_LEN + ".jpg".len());
        }
    }

    #[test]
    fn public_url_uses_basename_only() {
        assert_eq!(
            public_url("http://localhost:5000", "uploads/1-abc.jpg"),
            "http://localhost:5000/uploads/1-abc.jpg"
        );
        assert_eq!(
            public_url("http://localhost:5000/", "/srv/data/uploads/1-abc.jpg"),
            "http://localhost:5000/uploads/1-abc.jpg"
        );
        assert_eq!(
            public_url("http://h:1", "1-abc.jpg"),
            "http://h:1/uploads/1-abc.jpg"
        );
    }

    #[test]
    fn write_creates_directory_and_kept_file_survives() {
        let temp = TempDir::new().expect("temp dir");
        let store = UploadStore::new(temp.path().join("uploads"));

        let pending = store.write(b"jpeg bytes", "photo.jpg").expect("write");
        assert!(pending.path().starts_with(store.dir()));
        let stored = pending.keep();

        assert_eq!(fs::read(&stored).expect("read"), b"jpeg bytes");
    }

    #[test]
    fn dropped_or_discarded_uploads_are_removed() {
        let temp = TempDir::new().expect("temp dir");
        let store = UploadStore::new(temp.path().join("uploads"));

        let dropped = store.write(b"a", "a.png").expect("write");
        let dropped_path = dropped.path().to_path_buf();
        drop(dropped);
        assert!(!dropped_path.exists());

        let discarded = store.write(b"b", "b.png").expect("write");
        let discarded_path = discarded.path().to_path_buf();
        discarded.discard();
        assert!(!discarded_path.exists());

        let remaining = fs::read_dir(store.dir()).expect("read dir").count();
        assert_eq!(remaining, 0);
    }

    #[test]
    fn remove_tolerates_missing_files() {
        let temp = TempDir::new().expect("temp dir");
        let store = UploadStore::new(temp.path());
        let missing = temp.path().join("never-written.jpg");
        store.remove(missing.to_str().expect("path"));

        let pending = store.write(b"x", "x.gif").expect("write");
        let stored = pending.keep();
        store.remove(&stored);
        assert!(!Path::new(&stored).exists());
    }
}
