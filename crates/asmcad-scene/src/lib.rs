//! Asmcad Scene - Retained scene tree for the assembly editor
//!
//! This crate holds everything the editor knows about the assembly being
//! built: the node arena, layout, hit-testing, the drop protocol and the
//! draw pass. It has no windowing or rendering dependency; the host hands
//! it pointer positions and a [`Canvas`] to draw on.
//!
//! ## Key Types
//!
//! - [`Scene`] - Generational arena of nodes with an optional root
//! - [`NodeKind`] - Shapes, modifiers, boolean operators, module aliases,
//!   containers and sinks
//! - [`DropOutcome`] - Result of handing a dragged object to the tree
//! - [`ImageCache`] - Lazily loaded icons shared between nodes
//!
//! ## Example
//!
//! ```rust
//! use asmcad_scene::{BooleanOp, DropPolicy, IVec2, Layout, NodeKind, Scene, ShapeKind};
//!
//! let mut scene = Scene::default();
//! let canvas = scene.add_template(
//!     NodeKind::container(Layout::vertical(Some(400), Some(300)), DropPolicy::Structural),
//!     None,
//! );
//! scene.set_root(canvas);
//! scene.layout();
//!
//! let union = scene.add_instance(NodeKind::operator(BooleanOp::Union), None);
//! let cube = scene.add_instance(NodeKind::shape(ShapeKind::Cube), None);
//! scene.push_child(union, cube);
//!
//! let outcome = scene.drop_at(IVec2::new(10, 10), union);
//! assert!(outcome.is_accepted());
//! ```

mod draw;
mod drop;
mod error;
mod geometry;
mod input;
mod interact;
mod layout;
mod node;
mod picture;
mod scene;

pub use draw::{Canvas, Color, CommandList, DrawCommand};
pub use drop::DropOutcome;
pub use error::{Error, Result};
pub use geometry::Rect;
pub use picture::{FileImageSource, ImageCache, ImageHandle, ImageSource, Picture};
pub use input::{
    Button, COARSE_STEP, FIELD_COUNT, FINE_STEP, InputField, Params, format_number,
};
pub use interact::{Focus, Taken};
pub use layout::Metrics;
pub use node::{
    BooleanOp, Container, DropPolicy, Layout, Modifier, ModifierKind, ModuleAlias, Node, NodeId,
    NodeKind, Operator, Role, Shape, ShapeKind, SinkKind,
};
pub use scene::{Scene, Slot, module_name};

pub use glam::IVec2;
