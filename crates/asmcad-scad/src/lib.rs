//! Asmcad SCAD - OpenSCAD source generation
//!
//! Walks a sub-tree of an [`asmcad_scene::Scene`] and writes the equivalent
//! OpenSCAD program. Operators that have been published as modules are
//! defined once at the top of the output and called by name everywhere else.
//!
//! ## Example
//!
//! ```rust
//! use asmcad_scad::build_scad;
//! use asmcad_scene::{BooleanOp, NodeKind, Scene, ShapeKind};
//!
//! let mut scene = Scene::default();
//! let union = scene.add_instance(NodeKind::operator(BooleanOp::Union), None);
//! let cube = scene.add_instance(NodeKind::shape(ShapeKind::Cube), None);
//! scene.push_child(union, cube);
//!
//! let code = build_scad(&scene, union);
//! assert_eq!(code, "union(){\ncube([10, 10, 10]);\n}\n");
//! ```

mod scad_gen;

pub use scad_gen::{ScadGenerator, build_scad};
