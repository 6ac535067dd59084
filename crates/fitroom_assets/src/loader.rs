use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex, PoisonError,
        atomic::{AtomicUsize, Ordering},
    },
};

use tokio::sync::OnceCell;

use crate::{
    asset_server::gltf_parser::parse_gltf, blob_store::BlobStore, error::AssetError,
    handle::ResourceHandle, scene::SceneData,
};

type Slot = Arc<OnceCell<Arc<SceneData>>>;

/// Turns a [`ResourceHandle`] into a decoded [`SceneData`], memoised per handle.
///
/// The cached graph is handed out behind `Arc` and is never mutated; callers
/// that need to change materials clone it first.
#[derive(Clone)]
pub struct ModelLoader {
    blobs: BlobStore,
    cache: Arc<Mutex<HashMap<ResourceHandle, Slot>>>,
    decodes: Arc<AtomicUsize>,
}

impl ModelLoader {
    pub fn new(blobs: BlobStore) -> Self {
        Self {
            blobs,
            cache: Arc::default(),
            decodes: Arc::default(),
        }
    }

    /// Concurrent and repeated calls for one handle share a single decode.
    /// Failures are not cached, the next call tries again.
    ///
    /// A slot only outlives the call while its blob is live. Release revokes
    /// the blob before evicting, so a load racing a release always sees the
    /// revocation here and cleans up after itself.
    pub async fn load(&self, handle: &ResourceHandle) -> Result<Arc<SceneData>, AssetError> {
        let slot = {
            let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
            cache.entry(handle.clone()).or_default().clone()
        };

        let result = slot.get_or_try_init(|| self.decode(handle)).await.cloned();
        if result.is_err() || !self.blobs.contains(handle) {
            self.drop_slot(handle, &slot);
        }
        result
    }

    fn drop_slot(&self, handle: &ResourceHandle, slot: &Slot) {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if cache.get(handle).is_some_and(|current| Arc::ptr_eq(current, slot)) {
            cache.remove(handle);
        }
    }

    async fn decode(&self, handle: &ResourceHandle) -> Result<Arc<SceneData>, AssetError> {
        let blob = self.blobs.fetch(handle)?;
        self.decodes.fetch_add(1, Ordering::SeqCst);
        log::info!("[ModelLoader] Decoding '{}' ({})", blob.name, handle);

        let bytes = blob.bytes.clone();
        let scene = tokio::task::spawn_blocking(move || parse_gltf(&bytes))
            .await
            .map_err(|e| AssetError::Task(e.to_string()))??;

        let stats = scene.stats();
        log::info!(
            "[ModelLoader] Decoded '{}': {} nodes, {} drawables, {} triangles",
            blob.name,
            stats.nodes,
            stats.drawables,
            stats.triangles
        );
        Ok(Arc::new(scene))
    }

    pub fn cached(&self, handle: &ResourceHandle) -> Option<Arc<SceneData>> {
        let cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        cache.get(handle).and_then(|slot| slot.get().cloned())
    }

    /// Forgets the decoded graph of a released handle.
    pub fn evict(&self, handle: &ResourceHandle) -> bool {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        cache.remove(handle).is_some()
    }

    /// Handles that currently hold a cache slot.
    pub fn cached_count(&self) -> usize {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Number of decodes actually run (cache hits excluded).
    pub fn decode_count(&self) -> usize {
        self.decodes.load(Ordering::SeqCst)
    }
}
