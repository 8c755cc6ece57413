use crate::config::UploadConfig;
use crate::services::storage::LocalStorage;
use anyhow::Context;
use std::sync::Arc;
use tracing::info;

pub async fn setup_storage(config: &UploadConfig) -> anyhow::Result<Arc<LocalStorage>> {
    let storage = LocalStorage::new(&config.upload_dir);

    info!("📁 Local Storage: {}", storage.root().display());

    storage.ensure_dirs().await.with_context(|| {
        format!(
            "failed to create upload directory {}",
            storage.root().display()
        )
    })?;

    let existing = storage.list_files().await?.len();
    info!("✅ Upload directory ready ({} stored files)", existing);

    Ok(Arc::new(storage))
}
