use std::{collections::HashMap, sync::Arc};

use crate::{
    asset_server::AssetWorkerMessage, error::AssetError, handle::ResourceHandle, scene::SceneData,
};

#[derive(Clone, Debug)]
pub enum ModelStatus {
    Pending,
    Ready(Arc<SceneData>),
    Failed(AssetError),
}

/// Where each tracked handle's decode stands.
///
/// Only handles registered with [`ModelLookup::track`] are updated, so
/// completions for released handles fall on the floor.
#[derive(Default, Debug)]
pub struct ModelLookup {
    map: HashMap<ResourceHandle, ModelStatus>,
}

impl ModelLookup {
    pub fn track(&mut self, handle: &ResourceHandle) {
        self.map.insert(handle.clone(), ModelStatus::Pending);
    }

    pub fn forget(&mut self, handle: &ResourceHandle) {
        self.map.remove(handle);
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }

    pub fn status(&self, handle: &ResourceHandle) -> Option<&ModelStatus> {
        self.map.get(handle)
    }

    pub fn is_pending(&self, handle: &ResourceHandle) -> bool {
        matches!(self.map.get(handle), Some(ModelStatus::Pending))
    }

    /// Records a completion. Returns the new status, or `None` when the
    /// handle is no longer tracked.
    pub fn apply(&mut self, msg: AssetWorkerMessage) -> Option<(ResourceHandle, ModelStatus)> {
        match msg {
            AssetWorkerMessage::ModelLoaded { handle, result } => {
                let Some(entry) = self.map.get_mut(&handle) else {
                    log::debug!("[ModelLookup] Dropping stale completion for {}", handle);
                    return None;
                };

                *entry = match result {
                    Ok(scene) => ModelStatus::Ready(scene),
                    Err(e) => ModelStatus::Failed(e),
                };
                Some((handle, entry.clone()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob_store::BlobStore;

    #[test]
    fn untracked_completions_are_ignored() {
        let blobs = BlobStore::new();
        let handle = blobs.create_object_url("old.glb", vec![0u8]);
        let mut lookup = ModelLookup::default();

        let applied = lookup.apply(AssetWorkerMessage::ModelLoaded {
            handle: handle.clone(),
            result: Ok(Arc::new(SceneData::default())),
        });

        assert!(applied.is_none());
        assert!(lookup.status(&handle).is_none());
    }

    #[test]
    fn tracked_handles_move_from_pending_to_result() {
        let blobs = BlobStore::new();
        let handle = blobs.create_object_url("new.glb", vec![0u8]);
        let mut lookup = ModelLookup::default();
        lookup.track(&handle);
        assert!(lookup.is_pending(&handle));

        let applied = lookup.apply(AssetWorkerMessage::ModelLoaded {
            handle: handle.clone(),
            result: Err(AssetError::Decode("bad".into())),
        });

        assert!(matches!(applied, Some((_, ModelStatus::Failed(_)))));
        assert!(!lookup.is_pending(&handle));
    }
}
