use crate::utils::naming::generate_stored_name;
use crate::utils::validation::SNIFF_LEN;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};

/// Subdirectory of the upload dir where in-flight uploads are buffered
pub const STAGING_DIR: &str = ".staging";

/// Attempts at finding a free stored name before giving up
const MAX_NAME_ATTEMPTS: usize = 5;

/// Upload bytes written to a private temp file, not yet visible in storage.
pub struct StagedFile {
    temp: NamedTempFile,
    pub size: u64,
    pub head: Vec<u8>,
}

/// A file published into the upload directory.
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub original_name: String,
    pub stored_name: String,
    pub size: u64,
}

/// Flat on-disk store of uploads.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
    staging: PathBuf,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let staging = root.join(STAGING_DIR);
        Self { root, staging }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_of(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Creates the upload and staging directories if missing.
    pub async fn ensure_dirs(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.staging).await
    }

    /// Streams an upload into a temp file under the staging directory.
    pub async fn stage<R>(&self, mut reader: R) -> io::Result<StagedFile>
    where
        R: AsyncRead + Unpin + Send,
    {
        let temp = NamedTempFile::new_in(&self.staging)?;
        let mut temp_file_async = tokio::fs::File::from_std(temp.reopen()?);

        let mut buffer = [0u8; 8192];
        let mut head = Vec::with_capacity(SNIFF_LEN);
        let mut size = 0u64;

        loop {
            let n = reader.read(&mut buffer).await?;
            if n == 0 {
                break;
            }
            if head.len() < SNIFF_LEN {
                let take = n.min(SNIFF_LEN - head.len());
                head.extend_from_slice(&buffer[..take]);
            }
            temp_file_async.write_all(&buffer[..n]).await?;
            size += n as u64;
        }

        temp_file_async.flush().await?;
        temp_file_async.sync_all().await?;

        Ok(StagedFile { temp, size, head })
    }

    /// Publishes a staged upload under a freshly generated name.
    ///
    /// The rename never replaces an existing file; on collision a new name is
    /// generated. Runs on the blocking pool.
    pub async fn persist(&self, staged: StagedFile, original_name: &str) -> io::Result<StoredFile> {
        let storage = self.clone();
        let original_name = original_name.to_string();
        tokio::task::spawn_blocking(move || storage.publish(staged, &original_name))
            .await
            .map_err(io::Error::other)?
    }

    fn publish(&self, staged: StagedFile, original_name: &str) -> io::Result<StoredFile> {
        let StagedFile { mut temp, size, .. } = staged;

        for _ in 0..MAX_NAME_ATTEMPTS {
            let stored_name = generate_stored_name(original_name);
            match temp.persist_noclobber(self.path_of(&stored_name)) {
                Ok(_) => {
                    return Ok(StoredFile {
                        original_name: original_name.to_string(),
                        stored_name,
                        size,
                    });
                }
                Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => {
                    tracing::warn!("Stored name {} already taken, retrying", stored_name);
                    temp = e.file;
                }
                Err(e) => return Err(e.error),
            }
        }

        Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            "could not find a free name for the upload",
        ))
    }

    /// Names of every stored file, sorted.
    pub async fn list_files(&self) -> io::Result<Vec<String>> {
        let mut entries = tokio::fs::read_dir(&self.root).await?;
        let mut names = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => tracing::warn!("Skipping non UTF-8 file name {:?}", raw),
            }
        }

        names.sort();
        Ok(names)
    }

    pub async fn delete_file(&self, name: &str) -> io::Result<()> {
        tokio::fs::remove_file(self.path_of(name)).await
    }
}
