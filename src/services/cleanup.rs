use crate::services::storage::LocalStorage;

/// Outcome of one post-archive purge.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CleanupReport {
    pub deleted: usize,
    pub failed: usize,
}

/// Deletes every named file, continuing past individual failures.
///
/// Failures are only logged; the archive they belonged to is already sent.
pub async fn cleanup_files(storage: &LocalStorage, names: &[String]) -> CleanupReport {
    let mut report = CleanupReport::default();

    for name in names {
        match storage.delete_file(name).await {
            Ok(()) => report.deleted += 1,
            Err(e) => {
                tracing::error!("Failed to delete archived file {}: {}", name, e);
                report.failed += 1;
            }
        }
    }

    report
}
