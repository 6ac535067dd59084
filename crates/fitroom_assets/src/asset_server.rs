use std::sync::Arc;

use fitroom_core::IoTaskPool;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use crate::{error::AssetError, handle::ResourceHandle, loader::ModelLoader, scene::SceneData};

pub mod gltf_parser;

// Internal Message (Heavy - sent from the decode tasks back to the owner of the state)
#[derive(Debug)]
pub enum AssetWorkerMessage {
    ModelLoaded {
        handle: ResourceHandle,
        result: Result<Arc<SceneData>, AssetError>,
    },
}

/// Fire-and-forget front end of the [`ModelLoader`].
///
/// Requests return immediately; completions arrive on the receiver created
/// by [`AssetServer::new`], to be drained on the thread that owns the state.
#[derive(Clone)]
pub struct AssetServer {
    loader: ModelLoader,
    event_sender: UnboundedSender<AssetWorkerMessage>,
    // The "Ticket" to the Async World
    io_handle: IoTaskPool,
}

impl AssetServer {
    pub fn new(loader: ModelLoader, io_handle: IoTaskPool) -> (Self, UnboundedReceiver<AssetWorkerMessage>) {
        let (event_sender, receiver) = unbounded_channel();
        (
            Self {
                loader,
                event_sender,
                io_handle,
            },
            receiver,
        )
    }

    pub fn loader(&self) -> &ModelLoader {
        &self.loader
    }

    pub fn load_model(&self, handle: &ResourceHandle) {
        let loader = self.loader.clone();
        let sender = self.event_sender.clone();
        let handle = handle.clone();

        // Use the handle to spawn, works from ANY thread
        self.io_handle.0.spawn(async move {
            let result = loader.load(&handle).await;

            if let Err(e) = &result {
                log::error!("[AssetServer] {} failed: {}", handle, e);
            }

            // The receiver is gone only when the owner shut down
            let _ = sender.send(AssetWorkerMessage::ModelLoaded { handle, result });
        });
    }
}
