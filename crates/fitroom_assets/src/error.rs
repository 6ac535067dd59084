use thiserror::Error;

use crate::handle::ResourceHandle;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    #[error("resource {0} is not live")]
    NotFound(ResourceHandle),
    #[error("resource {0} was already released")]
    AlreadyReleased(ResourceHandle),
    #[error("failed to decode model: {0}")]
    Decode(String),
    #[error("decode task failed: {0}")]
    Task(String),
}

impl AssetError {
    pub fn is_decode(&self) -> bool {
        matches!(self, AssetError::Decode(_))
    }
}

impl From<gltf::Error> for AssetError {
    fn from(e: gltf::Error) -> Self {
        AssetError::Decode(e.to_string())
    }
}

impl From<image::ImageError> for AssetError {
    fn from(e: image::ImageError) -> Self {
        AssetError::Decode(format!("Failed to decode image: {}", e))
    }
}
