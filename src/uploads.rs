//! Filesystem buckets for uploaded PDF documents
//!
//! There is no database record for uploads: a file exists when it is present
//! in the bucket directory. Listing order is filesystem-dependent and only
//! used for display.

use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Upload errors
#[derive(Debug, Error)]
pub enum Error {
    /// The file does not carry a `.pdf` extension
    #[error("File {0} has an invalid extension and was skipped")]
    InvalidExtension(String),

    /// The file name would resolve outside the bucket directory
    #[error("File name {0} is not a plain file name")]
    UnsafeFileName(String),

    /// Underlying filesystem failure
    #[error("Filesystem error: {0}")]
    Io(#[from] io::Error),
}

/// The two document classes the portal stores
#[derive(Clone, Copy, Debug)]
pub enum Bucket {
    /// Network diagram attachments
    NetworkDiagrams,

    /// Work report attachments
    WorkReports,
}

/// Filesystem-backed store for both upload buckets
#[derive(Clone)]
pub struct UploadStore {
    network_diagrams: PathBuf,
    work_reports: PathBuf,

    /// Work report names are label-derived and collide on purpose; writes to
    /// them are serialized so concurrent uploads cannot interleave
    report_write_lock: Arc<Mutex<()>>,
}

impl UploadStore {
    /// Open the store, creating both bucket directories when missing
    pub async fn open<P, Q>(network_diagrams: P, work_reports: Q) -> io::Result<Self>
    where
        P: Into<PathBuf>,
        Q: Into<PathBuf>,
    {
        let network_diagrams = network_diagrams.into();
        let work_reports = work_reports.into();

        tokio::fs::create_dir_all(&network_diagrams).await?;
        tokio::fs::create_dir_all(&work_reports).await?;

        Ok(Self {
            network_diagrams,
            work_reports,
            report_write_lock: Arc::new(Mutex::new(())),
        })
    }

    fn bucket_dir(&self, bucket: Bucket) -> &Path {
        match bucket {
            Bucket::NetworkDiagrams => &self.network_diagrams,
            Bucket::WorkReports => &self.work_reports,
        }
    }

    /// Store a network diagram under a collision-free name
    ///
    /// The stored name is `<random id>_<sanitized original name>`, so the
    /// same diagram can be uploaded any number of times.
    pub async fn store_network_diagram(
        &self,
        original_name: &str,
        data: &[u8],
    ) -> Result<String, Error> {
        if !has_pdf_extension(original_name) {
            return Err(Error::InvalidExtension(original_name.to_string()));
        }

        let stored_name = format!(
            "{}_{}",
            Uuid::new_v4().simple(),
            sanitize_file_name(original_name)
        );

        tokio::fs::write(self.network_diagrams.join(&stored_name), data).await?;

        Ok(stored_name)
    }

    /// Store a work report under its label-derived name
    ///
    /// The stored name is `<label with spaces as underscores>_<sanitized
    /// original name>`. Re-uploading the same label and name overwrites the
    /// previous file; that is the intended way to replace a report.
    pub async fn store_work_report(
        &self,
        label: &str,
        original_name: &str,
        data: &[u8],
    ) -> Result<String, Error> {
        if !has_pdf_extension(original_name) {
            return Err(Error::InvalidExtension(original_name.to_string()));
        }

        let stored_name = format!(
            "{}_{}",
            sanitize_file_name(&label.trim().replace(' ', "_")),
            sanitize_file_name(original_name)
        );

        let _guard = self.report_write_lock.lock().await;
        tokio::fs::write(self.work_reports.join(&stored_name), data).await?;

        Ok(stored_name)
    }

    /// List the file names currently present in a bucket
    pub async fn list(&self, bucket: Bucket) -> io::Result<Vec<String>> {
        let mut entries = tokio::fs::read_dir(self.bucket_dir(bucket)).await?;
        let mut names = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            names.push(entry.file_name().to_string_lossy().to_string());
        }

        Ok(names)
    }

    /// Read a stored file back, or `None` when it does not exist
    ///
    /// The name must be a plain file name; anything that could resolve
    /// outside the bucket directory is rejected outright.
    pub async fn fetch(&self, bucket: Bucket, file_name: &str) -> Result<Option<Vec<u8>>, Error> {
        if !is_safe_file_name(file_name) {
            return Err(Error::UnsafeFileName(file_name.to_string()));
        }

        match tokio::fs::read(self.bucket_dir(bucket).join(file_name)).await {
            Ok(data) => Ok(Some(data)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

/// Does the file name end in `.pdf`, case-insensitive?
///
/// A bare `.pdf` counts; only the extension is checked.
pub fn has_pdf_extension(file_name: &str) -> bool {
    file_name
        .rsplit_once('.')
        .is_some_and(|(_, extension)| extension.eq_ignore_ascii_case("pdf"))
}

/// Reduce a client-supplied name to a harmless file name
///
/// Directory components are dropped and anything outside `[A-Za-z0-9._-]`
/// is replaced with an underscore.
pub fn sanitize_file_name(file_name: &str) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name);

    base.chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-') {
                ch
            } else {
                '_'
            }
        })
        .collect()
}

/// Is the name a plain file name that stays inside its bucket?
fn is_safe_file_name(file_name: &str) -> bool {
    !file_name.is_empty()
        && file_name != "."
        && file_name != ".."
        && !file_name.contains(['/', '\\'])
}
