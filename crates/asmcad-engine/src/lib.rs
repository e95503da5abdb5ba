//! Asmcad Engine - Editor runtime for the block-based OpenSCAD builder
//!
//! The engine is a thin orchestration layer over asmcad-scene and
//! asmcad-scad. It turns raw input events into gestures on the scene, owns
//! the window tree (palette, canvas, module gallery, sinks) and writes the
//! generated program whenever something is dropped on the view sink.
//!
//! ## Example
//!
//! ```rust
//! use asmcad_engine::{Editor, Settings};
//! use asmcad_scene::{ImageCache, ImageSource, IVec2, Picture};
//!
//! struct NoImages;
//! impl ImageSource for NoImages {
//!     fn load(&self, name: &str) -> asmcad_scene::Result<Picture> {
//!         Err(asmcad_scene::Error::AssetNotFound(name.to_string()))
//!     }
//! }
//!
//! let mut editor = Editor::new(&Settings::default(), ImageCache::new(NoImages));
//!
//! // Drag a cube from the palette onto the canvas
//! editor.drag(IVec2::new(450, 20), IVec2::new(300, 400))?;
//! assert_eq!(editor.generate(editor.workbench().canvas), "cube([10, 10, 10]);\n");
//! # Ok::<(), anyhow::Error>(())
//! ```

mod artifact;
mod editor;
mod error;
mod event;
mod outline;
mod settings;
mod workbench;

pub use artifact::{staging_path, write_artifact};
pub use editor::{Control, Editor, Gesture};
pub use error::{EditorError, Result};
pub use event::{InputEvent, parse_events};
pub use outline::outline;
pub use settings::{
    Settings, load_settings, load_settings_from, save_settings, save_settings_to, settings_path,
};
pub use workbench::Workbench;
