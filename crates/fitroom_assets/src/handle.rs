use std::{fmt, sync::Arc};

use uuid::Uuid;

const SCHEME: &str = "blob:fitroom/";

/// Opaque reference to uploaded model bytes, usable as a load source.
///
/// Only [`BlobStore`](crate::blob_store::BlobStore) mints these. Cloning is
/// cheap and clones compare equal, so the handle doubles as a cache key.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceHandle(Arc<str>);

impl ResourceHandle {
    pub(crate) fn new() -> Self {
        Self(format!("{}{}", SCHEME, Uuid::new_v4()).into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResourceHandle({})", self.0)
    }
}

impl fmt::Display for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_are_unique_blob_urls() {
        let a = ResourceHandle::new();
        let b = ResourceHandle::new();

        assert_ne!(a, b);
        assert!(a.as_str().starts_with("blob:fitroom/"));
        assert_eq!(a.clone(), a);
    }
}
