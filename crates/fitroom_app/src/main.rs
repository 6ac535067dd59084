//! Headless viewer front end.
//!
//! Usage:
//!   fitroom --avatar body.glb                         # avatar only
//!   fitroom --avatar body.glb --clothing shirt.gltf --color "#ff0000"
//!   fitroom --avatar body.glb --clothing shirt.glb --hide-clothing

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use clap::Parser;
use fitroom_app::{AppController, ControllerError, ControllerEvent};
use fitroom_core::{IoTaskPool, ViewerConfig, time::Time};
use fitroom_intake::FileInput;
use fitroom_scene::{ContentNode, RenderTree};

const FRAME: Duration = Duration::from_millis(16);

#[derive(Parser)]
#[command(name = "fitroom")]
#[command(about = "Load an avatar and a clothing item and compose the scene")]
struct Cli {
    /// Avatar model (.glb or .gltf)
    #[arg(long)]
    avatar: Option<PathBuf>,
    /// Clothing model, placed over the avatar
    #[arg(long)]
    clothing: Option<PathBuf>,
    /// Clothing colour as #rrggbb
    #[arg(long)]
    color: Option<String>,
    #[arg(long)]
    hide_clothing: bool,
    /// JSON viewer configuration
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ViewerConfig::load(path).with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ViewerConfig::default(),
    };

    let runtime = IoTaskPool::build_runtime().context("Failed to start I/O runtime")?;
    let mut controller = AppController::new(config, IoTaskPool::from_runtime(&runtime));

    if let Some(path) = &cli.avatar {
        upload(&mut controller, path, AppController::upload_avatar)?;
    }
    if let Some(path) = &cli.clothing {
        upload(&mut controller, path, AppController::upload_clothing)?;
    }
    if let Some(color) = &cli.color {
        controller.set_clothing_color(color)?;
    }
    if cli.hide_clothing {
        controller.set_clothing_visible(false);
    }

    let mut time = Time::default();
    let events = runtime.block_on(async {
        let mut events = controller.settle().await;
        // the fixed-delay timer only advances through update()
        while controller.state().loading {
            tokio::time::sleep(FRAME).await;
            events.extend(controller.update(time.update()));
        }
        events
    });
    log::info!("Scene ready after {:.2}s", time.elapsed_seconds());

    for event in events {
        if let ControllerEvent::ModelFailed { role, error, .. } = event {
            eprintln!("{:?} could not be displayed: {}", role, error);
        }
    }

    print_tree(&controller.render());
    controller.reset()?;
    Ok(())
}

/// Rejected files are warnings, not fatal errors.
fn upload<F>(controller: &mut AppController, path: &Path, submit: F) -> Result<()>
where
    F: FnOnce(&mut AppController, FileInput) -> Result<fitroom_assets::ResourceHandle, ControllerError>,
{
    let file = FileInput::from_path(path).with_context(|| format!("Failed to read {}", path.display()))?;
    match submit(controller, file) {
        Ok(handle) => log::info!("{} -> {}", path.display(), handle),
        Err(e @ (ControllerError::Intake(_) | ControllerError::AvatarRequired)) => eprintln!("{}", e),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

fn print_tree(tree: &RenderTree) {
    println!("display: {:?}", tree.display);
    println!("camera:  eye {}", tree.camera.transform.translation);
    if let Some(prompt) = tree.prompt {
        println!("prompt:  {}", prompt);
    }
    if let Some(message) = tree.loading_message() {
        println!("status:  {}", message);
    }

    for node in &tree.content {
        match node {
            ContentNode::Placeholder(p) => println!("  placeholder box {} {}", p.size, p.color),
            ContentNode::Model(instance) => {
                let stats = instance.scene.stats();
                println!(
                    "  {:?} {} nodes={} drawables={} surfaces={} triangles={} at {}",
                    instance.role,
                    instance.handle,
                    stats.nodes,
                    stats.drawables,
                    stats.surfaces,
                    stats.triangles,
                    instance.transform.translation,
                );
            }
            ContentNode::Pending { role, handle } => println!("  {:?} {} loading", role, handle),
            ContentNode::Failed { role, message, .. } => println!("  {:?} failed: {}", role, message),
        }
    }
}
