pub mod asset_events;
pub mod asset_server;
pub mod assets;
pub mod blob_store;
pub mod error;
pub mod handle;
pub mod loader;
pub mod material;
pub mod recolor;
pub mod scene;

#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;

pub use asset_events::{ModelLookup, ModelStatus};
pub use asset_server::{AssetServer, AssetWorkerMessage};
pub use blob_store::{Blob, BlobStore};
pub use error::AssetError;
pub use handle::ResourceHandle;
pub use loader::ModelLoader;
pub use recolor::recolor;
pub use scene::SceneData;
