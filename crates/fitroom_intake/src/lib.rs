use std::{fmt, path::Path};

use fitroom_assets::{BlobStore, ResourceHandle};
use thiserror::Error;

mod drop_zone;

pub use drop_zone::{DropOverlay, DropZone};

/// Which scene slot an upload is meant for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SlotLabel {
    Avatar,
    Clothing,
}

impl fmt::Display for SlotLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SlotLabel::Avatar => "Avatar",
            SlotLabel::Clothing => "Clothing",
        })
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntakeError {
    /// The text doubles as the user-facing warning.
    #[error("Please upload a valid {label} file ({expected})")]
    InvalidExtension {
        label: SlotLabel,
        expected: String,
        file_name: String,
    },
    #[error("{0} upload is disabled right now")]
    Disabled(SlotLabel),
    #[error("no file was provided")]
    NoFile,
}

/// A picked or dropped file: its name and its bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileInput {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl FileInput {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { name, bytes })
    }
}

/// Accepted file extensions, compared case-insensitively.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AllowList {
    extensions: Vec<String>,
}

impl Default for AllowList {
    fn default() -> Self {
        Self::new(["glb", "gltf"])
    }
}

impl AllowList {
    pub fn new<S: AsRef<str>>(extensions: impl IntoIterator<Item = S>) -> Self {
        Self {
            extensions: extensions
                .into_iter()
                .map(|e| e.as_ref().trim_start_matches('.').to_ascii_lowercase())
                .collect(),
        }
    }

    /// Looks only at the text after the last dot; a name without one never matches.
    pub fn accepts(&self, file_name: &str) -> bool {
        match file_name.rsplit_once('.') {
            Some((_, extension)) => {
                let extension = extension.to_ascii_lowercase();
                self.extensions.iter().any(|e| *e == extension)
            }
            None => false,
        }
    }

    /// `.glb,.gltf` style listing for warnings and file pickers.
    pub fn describe(&self) -> String {
        self.extensions
            .iter()
            .map(|e| format!(".{}", e))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Validates uploads for one slot and turns them into resource handles.
#[derive(Clone)]
pub struct Intake {
    label: SlotLabel,
    allow: AllowList,
    blobs: BlobStore,
}

impl Intake {
    pub fn new(label: SlotLabel, allow: AllowList, blobs: BlobStore) -> Self {
        Self { label, allow, blobs }
    }

    pub fn label(&self) -> SlotLabel {
        self.label
    }

    pub fn allow_list(&self) -> &AllowList {
        &self.allow
    }

    pub fn validate(&self, file: &FileInput) -> Result<(), IntakeError> {
        if self.allow.accepts(&file.name) {
            Ok(())
        } else {
            log::warn!("Rejected {} upload '{}'", self.label, file.name);
            Err(IntakeError::InvalidExtension {
                label: self.label,
                expected: self.allow.describe(),
                file_name: file.name.clone(),
            })
        }
    }

    /// Validates `file` and, on success, mints a handle for its bytes and
    /// hands it to `on_accept`. A rejected file creates nothing and never
    /// reaches the callback.
    pub fn submit<F, R>(&self, file: FileInput, on_accept: F) -> Result<R, IntakeError>
    where
        F: FnOnce(ResourceHandle) -> R,
    {
        let handle = self.accept(file)?;
        Ok(on_accept(handle))
    }

    fn accept(&self, file: FileInput) -> Result<ResourceHandle, IntakeError> {
        self.validate(&file)?;
        let handle = self.blobs.create_object_url(&file.name, file.bytes);
        log::info!("Accepted {} upload '{}' as {}", self.label, file.name, handle);
        Ok(handle)
    }
}
