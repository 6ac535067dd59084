use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, PoisonError, RwLock},
};

use crate::{error::AssetError, handle::ResourceHandle};

/// Bytes behind a live [`ResourceHandle`].
#[derive(Clone, Debug)]
pub struct Blob {
    pub name: String,
    pub bytes: Arc<[u8]>,
}

#[derive(Default)]
struct BlobTable {
    live: HashMap<ResourceHandle, Blob>,
    /// Tombstones, so a second revoke is reported instead of looking like an
    /// unknown handle. Only the handle string is kept; the bytes are freed.
    revoked: HashSet<ResourceHandle>,
}

/// Transient local URLs for uploaded files.
///
/// Cloning shares the same table, so the decode workers can fetch bytes
/// while the controller keeps ownership of creation and revocation.
#[derive(Clone, Default)]
pub struct BlobStore {
    storage: Arc<RwLock<BlobTable>>,
}

impl BlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_object_url(&self, name: &str, bytes: impl Into<Arc<[u8]>>) -> ResourceHandle {
        let handle = ResourceHandle::new();
        let blob = Blob {
            name: name.to_owned(),
            bytes: bytes.into(),
        };
        log::debug!("Created {} for '{}' ({} bytes)", handle, name, blob.bytes.len());

        let mut table = self.storage.write().unwrap_or_else(PoisonError::into_inner);
        table.live.insert(handle.clone(), blob);
        handle
    }

    pub fn fetch(&self, handle: &ResourceHandle) -> Result<Blob, AssetError> {
        let table = self.storage.read().unwrap_or_else(PoisonError::into_inner);
        match table.live.get(handle) {
            Some(blob) => Ok(blob.clone()),
            None if table.revoked.contains(handle) => Err(AssetError::AlreadyReleased(handle.clone())),
            None => Err(AssetError::NotFound(handle.clone())),
        }
    }

    /// Releases the bytes. A handle can be revoked exactly once.
    pub fn revoke(&self, handle: &ResourceHandle) -> Result<(), AssetError> {
        let mut table = self.storage.write().unwrap_or_else(PoisonError::into_inner);
        if table.live.remove(handle).is_some() {
            table.revoked.insert(handle.clone());
            log::debug!("Revoked {}", handle);
            Ok(())
        } else if table.revoked.contains(handle) {
            Err(AssetError::AlreadyReleased(handle.clone()))
        } else {
            Err(AssetError::NotFound(handle.clone()))
        }
    }

    pub fn contains(&self, handle: &ResourceHandle) -> bool {
        let table = self.storage.read().unwrap_or_else(PoisonError::into_inner);
        table.live.contains_key(handle)
    }

    pub fn live_count(&self) -> usize {
        let table = self.storage.read().unwrap_or_else(PoisonError::into_inner);
        table.live.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_returns_uploaded_bytes() {
        let store = BlobStore::new();
        let handle = store.create_object_url("avatar.glb", vec![1u8, 2, 3]);

        let blob = store.fetch(&handle).unwrap();
        assert_eq!(blob.name, "avatar.glb");
        assert_eq!(&*blob.bytes, &[1, 2, 3]);
        assert_eq!(store.live_count(), 1);
    }

    #[test]
    fn double_revoke_is_reported() {
        let store = BlobStore::new();
        let handle = store.create_object_url("shirt.gltf", vec![0u8]);

        assert!(store.revoke(&handle).is_ok());
        assert_eq!(store.revoke(&handle), Err(AssetError::AlreadyReleased(handle.clone())));
        assert_eq!(store.fetch(&handle).unwrap_err(), AssetError::AlreadyReleased(handle));
        assert_eq!(store.live_count(), 0);
    }

    #[test]
    fn clones_share_the_table() {
        let store = BlobStore::new();
        let worker_view = store.clone();
        let handle = store.create_object_url("a.glb", vec![9u8]);

        assert!(worker_view.contains(&handle));
        store.revoke(&handle).unwrap();
        assert!(!worker_view.contains(&handle));
    }
}
