pub use tokio;

pub mod camera;
pub mod color;
pub mod config;
pub mod time;
pub mod transform;

pub use color::Rgb;
pub use config::ViewerConfig;

/// Handle to the dedicated I/O runtime.
/// Decoding work is spawned through this so it works from ANY thread.
#[derive(Clone, Debug)]
pub struct IoTaskPool(pub tokio::runtime::Handle);

impl IoTaskPool {
    /// Builds the multi-threaded runtime that backs the pool.
    /// The caller owns the runtime and must keep it alive while the pool is in use.
    pub fn build_runtime() -> std::io::Result<tokio::runtime::Runtime> {
        tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("fitroom-io")
            .build()
    }

    pub fn from_runtime(runtime: &tokio::runtime::Runtime) -> Self {
        Self(runtime.handle().clone())
    }

    /// Uses the runtime the caller is already running on.
    pub fn current() -> Self {
        Self(tokio::runtime::Handle::current())
    }
}
