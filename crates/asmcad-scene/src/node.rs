//! Node types of the scene graph
//!
//! Every element of the editor (palette icons, the canvas, the module gallery,
//! the two drop zones) is a [`Node`] stored in a [`crate::Scene`]. The kind of
//! a node is a closed set, see [`NodeKind`].

use std::fmt;

use crate::geometry::Rect;
use crate::input::{InputField, Params};
use crate::picture::ImageHandle;

/// Identifier for a node in the scene (generational).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.0, self.1)
    }
}

/// Whether a node is a palette original or a draggable copy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Never structurally mutated; picking it up produces a clone
    Template,
    /// Created by cloning a template; picking it up moves it
    Instance,
}

/// OpenSCAD primitive solids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Cube,
    Cylinder,
    Sphere,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 3] = [ShapeKind::Cube, ShapeKind::Cylinder, ShapeKind::Sphere];

    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Cube => "cube",
            ShapeKind::Cylinder => "cylinder",
            ShapeKind::Sphere => "sphere",
        }
    }

    pub fn image_name(&self) -> &'static str {
        match self {
            ShapeKind::Cube => "img/cube.png",
            ShapeKind::Cylinder => "img/cylinder.png",
            ShapeKind::Sphere => "img/sphere.png",
        }
    }

    /// Fields a fresh palette shape starts with. A sphere only needs a radius.
    pub fn default_params(&self) -> Params {
        match self {
            ShapeKind::Cube => Params::new([
                InputField::new(10.0),
                InputField::new(10.0),
                InputField::new(10.0),
            ]),
            ShapeKind::Cylinder => Params::new([
                InputField::new(10.0),
                InputField::new(5.0),
                InputField::new(5.0),
            ]),
            ShapeKind::Sphere => Params::new([
                InputField::new(5.0),
                InputField::disabled(),
                InputField::disabled(),
            ]),
        }
    }
}

/// Transforms applied to the statement that follows them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModifierKind {
    Translate,
    Rotate,
}

impl ModifierKind {
    pub const ALL: [ModifierKind; 2] = [ModifierKind::Translate, ModifierKind::Rotate];

    pub fn name(&self) -> &'static str {
        match self {
            ModifierKind::Translate => "translate",
            ModifierKind::Rotate => "rotate",
        }
    }

    pub fn image_name(&self) -> &'static str {
        match self {
            ModifierKind::Translate => "img/translate.png",
            ModifierKind::Rotate => "img/rotate.png",
        }
    }

    pub fn default_params(&self) -> Params {
        Params::new([
            InputField::new(0.0),
            InputField::new(0.0),
            InputField::new(0.0),
        ])
    }
}

/// CSG boolean operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BooleanOp {
    Union,
    Difference,
    Intersection,
}

impl BooleanOp {
    pub const ALL: [BooleanOp; 3] = [
        BooleanOp::Union,
        BooleanOp::Difference,
        BooleanOp::Intersection,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BooleanOp::Union => "union",
            BooleanOp::Difference => "difference",
            BooleanOp::Intersection => "intersection",
        }
    }

    pub fn image_name(&self) -> &'static str {
        match self {
            BooleanOp::Union => "img/union.png",
            BooleanOp::Difference => "img/difference.png",
            BooleanOp::Intersection => "img/intersection.png",
        }
    }
}

/// Terminal drop targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SinkKind {
    /// Destroys whatever is dropped on it
    Delete,
    /// Writes the OpenSCAD text of whatever is dropped on it
    View,
}

impl SinkKind {
    pub fn image_name(&self) -> &'static str {
        match self {
            SinkKind::Delete => "img/delete.png",
            SinkKind::View => "img/view.png",
        }
    }
}

/// How a container places its children
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Left to right. With a width, rows wrap at the right edge; without
    /// one, a single row as wide as its children.
    Flow { width: Option<i32> },
    /// Top to bottom. With a viewport, the container is that tall and its
    /// content scrolls; without one, it is as tall as its content.
    Vertical {
        width: Option<i32>,
        viewport: Option<i32>,
        scroll: i32,
        content: i32,
    },
}

impl Layout {
    pub fn flow(width: Option<i32>) -> Self {
        Layout::Flow { width }
    }

    pub fn vertical(width: Option<i32>, viewport: Option<i32>) -> Self {
        Layout::Vertical {
            width,
            viewport,
            scroll: 0,
            content: 0,
        }
    }
}

/// What a container does with an object dropped on its free space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropPolicy {
    /// Appends the object (canvas, operand rows)
    Structural,
    /// Only forwards drops to its children (palette, window frame)
    DisplayOnly,
    /// Module gallery: takes operator instances and gives them a module
    Modules,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    pub layout: Layout,
    pub policy: DropPolicy,
    pub children: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Operator {
    pub op: BooleanOp,
    /// Boolean operands, in emission order
    pub operands: Vec<NodeId>,
    /// Named module alias, created on first request
    pub module: Option<NodeId>,
    /// Area covered by the operands after layout
    pub operand_row: Rect,
}

/// Named reference to an operator's sub-assembly
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleAlias {
    /// The operator this alias stands for. Never owning: the operator may be
    /// gone, in which case the id no longer resolves.
    pub operator: NodeId,
    /// Text shown on the alias icon
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub kind: ShapeKind,
    pub params: Params,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Modifier {
    pub kind: ModifierKind,
    pub params: Params,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Shape(Shape),
    Modifier(Modifier),
    Operator(Operator),
    Module(ModuleAlias),
    Container(Container),
    Sink(SinkKind),
}

impl NodeKind {
    pub fn shape(kind: ShapeKind) -> Self {
        NodeKind::Shape(Shape {
            kind,
            params: kind.default_params(),
        })
    }

    pub fn modifier(kind: ModifierKind) -> Self {
        NodeKind::Modifier(Modifier {
            kind,
            params: kind.default_params(),
        })
    }

    pub fn operator(op: BooleanOp) -> Self {
        NodeKind::Operator(Operator {
            op,
            operands: Vec::new(),
            module: None,
            operand_row: Rect::ZERO,
        })
    }

    pub fn container(layout: Layout, policy: DropPolicy) -> Self {
        NodeKind::Container(Container {
            layout,
            policy,
            children: Vec::new(),
        })
    }

    pub fn sink(kind: SinkKind) -> Self {
        NodeKind::Sink(kind)
    }

    /// Short name used in logs and tree dumps
    pub fn label(&self) -> String {
        match self {
            NodeKind::Shape(s) => s.kind.name().to_string(),
            NodeKind::Modifier(m) => m.kind.name().to_string(),
            NodeKind::Operator(o) => o.op.name().to_string(),
            NodeKind::Module(m) => m.label.clone(),
            NodeKind::Container(c) => match c.layout {
                Layout::Flow { .. } => "flow".to_string(),
                Layout::Vertical { .. } => "vertical".to_string(),
            },
            NodeKind::Sink(SinkKind::Delete) => "delete".to_string(),
            NodeKind::Sink(SinkKind::View) => "view".to_string(),
        }
    }

    pub fn params(&self) -> Option<&Params> {
        match self {
            NodeKind::Shape(s) => Some(&s.params),
            NodeKind::Modifier(m) => Some(&m.params),
            _ => None,
        }
    }

    pub fn params_mut(&mut self) -> Option<&mut Params> {
        match self {
            NodeKind::Shape(s) => Some(&mut s.params),
            NodeKind::Modifier(m) => Some(&mut m.params),
            _ => None,
        }
    }

    /// Owned children in placement order (container children or operands)
    pub fn children(&self) -> &[NodeId] {
        match self {
            NodeKind::Container(c) => &c.children,
            NodeKind::Operator(o) => &o.operands,
            _ => &[],
        }
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<NodeId>> {
        match self {
            NodeKind::Container(c) => Some(&mut c.children),
            NodeKind::Operator(o) => Some(&mut o.operands),
            _ => None,
        }
    }
}

/// A single element of the scene
#[derive(Debug, Clone)]
pub struct Node {
    /// Never reused within a scene; module names derive from it
    pub uid: u64,
    /// Layout result, written by the parent's layout pass
    pub bounds: Rect,
    /// Background picture, shared among all nodes of the same kind
    pub image: Option<ImageHandle>,
    pub role: Role,
    /// Template this instance was cloned from
    pub cloned_from: Option<NodeId>,
    /// True while a drag cursor hovers this node
    pub dragged_over: bool,
    /// Owning node. Non-owning back edge; `None` when detached or root.
    pub parent: Option<NodeId>,
    pub kind: NodeKind,
}

impl Node {
    pub fn is_template(&self) -> bool {
        self.role == Role::Template
    }

    pub fn is_instance(&self) -> bool {
        self.role == Role::Instance
    }
}
