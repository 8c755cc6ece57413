use crate::api::error::AppError;
use crate::services::cleanup::cleanup_files;
use crate::services::storage::LocalStorage;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio_util::io::{ReaderStream, SyncIoBridge};
use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

/// Name of the attachment sent by the bulk download
pub const ARCHIVE_FILENAME: &str = "all_uploads.zip";

/// Bytes buffered between the zip writer and the response body
const PIPE_CAPACITY: usize = 64 * 1024;

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("No files to download")]
    Empty,

    #[error("Unable to read upload directory: {0}")]
    Unreadable(#[source] io::Error),
}

impl From<ArchiveError> for AppError {
    fn from(err: ArchiveError) -> Self {
        match err {
            ArchiveError::Empty => AppError::NotFound(err.to_string()),
            ArchiveError::Unreadable(_) => AppError::Internal(err.to_string()),
        }
    }
}

/// Bundles all stored uploads into a zip stream and purges them afterwards.
pub struct ArchiveService {
    storage: Arc<LocalStorage>,
    gate: Arc<Mutex<()>>,
}

impl ArchiveService {
    pub fn new(storage: Arc<LocalStorage>) -> Self {
        Self {
            storage,
            gate: Arc::new(Mutex::new(())),
        }
    }

    /// Starts streaming a zip of every stored file.
    ///
    /// The zip is written on a blocking thread into a bounded pipe and the
    /// returned stream drains the other end, so only `PIPE_CAPACITY` bytes are
    /// ever held in memory. Once the last chunk has been handed out and the
    /// writer reported success, the archived files are deleted. Only one bulk
    /// download runs at a time; the gate is held until the stream ends or is
    /// dropped.
    pub async fn stream_all(
        &self,
    ) -> Result<impl Stream<Item = io::Result<Bytes>> + Send + 'static, ArchiveError> {
        let gate = self.gate.clone().lock_owned().await;

        let names = self
            .storage
            .list_files()
            .await
            .map_err(ArchiveError::Unreadable)?;
        if names.is_empty() {
            return Err(ArchiveError::Empty);
        }

        tracing::info!("📦 Archiving {} stored files", names.len());

        let (reader, writer) = tokio::io::duplex(PIPE_CAPACITY);
        let sink = SyncIoBridge::new(writer);
        let root = self.storage.root().to_path_buf();
        let builder = tokio::task::spawn_blocking(move || {
            let result = write_zip(sink, &root, &names);
            if let Err(e) = &result {
                tracing::error!("Archive build failed: {}", e);
            }
            result
        });

        let storage = self.storage.clone();
        Ok(async_stream::stream! {
            let _gate = gate;
            let mut chunks = ReaderStream::new(reader);
            let mut broken = false;

            while let Some(chunk) = chunks.next().await {
                broken = chunk.is_err();
                yield chunk;
                if broken {
                    break;
                }
            }

            if !broken {
                match builder.await {
                    Ok(Ok(archived)) => {
                        let report = cleanup_files(&storage, &archived).await;
                        tracing::info!(
                            "🧹 Archive sent, removed {} files ({} failed)",
                            report.deleted,
                            report.failed
                        );
                    }
                    Ok(Err(e)) => yield Err(e),
                    Err(e) => {
                        tracing::error!("Archive task panicked: {}", e);
                        yield Err(io::Error::other(e));
                    }
                }
            }
        })
    }
}

/// Writes a flat zip of `names` (relative to `root`) into `sink`.
///
/// Returns the names that actually went into the archive; files that vanished
/// after enumeration are skipped.
fn write_zip<W: Write>(sink: W, root: &Path, names: &[String]) -> io::Result<Vec<String>> {
    let mut sink = BufWriter::with_capacity(PIPE_CAPACITY, sink);
    let mut zip = ZipWriter::new_stream(&mut sink);
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(9)); // maximum deflate effort

    let mut archived = Vec::with_capacity(names.len());
    for name in names {
        let mut file = match File::open(root.join(name)) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::warn!("Stored file {} disappeared before archiving", name);
                continue;
            }
            Err(e) => return Err(e),
        };

        zip.start_file(name.as_str(), options)
            .map_err(io::Error::other)?;
        io::copy(&mut file, &mut zip)?;
        archived.push(name.clone());
    }

    zip.finish().map_err(io::Error::other)?;
    sink.flush()?;
    Ok(archived)
}
