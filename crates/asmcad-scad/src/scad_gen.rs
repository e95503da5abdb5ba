//! Scene to OpenSCAD code generator

// String writing is infallible, so .unwrap() is safe here
#![allow(clippy::unwrap_used)]

use std::collections::HashSet;
use std::fmt::Write;

use asmcad_scene::{NodeId, NodeKind, Params, Scene, ShapeKind, format_number, module_name};

/// What a node left in the output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Emitted {
    Nothing,
    /// A transform still waiting for the statement it applies to
    Prefix,
    Statement,
}

/// Generate OpenSCAD code for a scene sub-tree
#[derive(Debug, Default)]
pub struct ScadGenerator {
    /// Operators whose module definition has been written
    defined: HashSet<NodeId>,
    /// Hoisted module definitions
    modules: String,
}

impl ScadGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate the program for `id` and everything it owns. Module
    /// definitions come first, followed by the statements.
    pub fn generate(&mut self, scene: &Scene, id: NodeId) -> String {
        self.defined.clear();
        self.modules.clear();

        let mut body = String::new();
        if self.generate_node(scene, id, &mut body) == Emitted::Prefix {
            writeln!(body, ";").unwrap();
        }

        tracing::debug!(
            "Generated {} module(s) and {} bytes of statements for {}",
            self.defined.len(),
            body.len(),
            id
        );
        let mut code = std::mem::take(&mut self.modules);
        code.push_str(&body);
        code
    }

    fn generate_node(&mut self, scene: &Scene, id: NodeId, code: &mut String) -> Emitted {
        let Some(node) = scene.get(id) else {
            return Emitted::Nothing;
        };

        match &node.kind {
            NodeKind::Shape(shape) => {
                let p = &shape.params;
                match shape.kind {
                    ShapeKind::Cube => writeln!(
                        code,
                        "cube([{}, {}, {}]);",
                        num(p, 0),
                        num(p, 1),
                        num(p, 2)
                    ),
                    ShapeKind::Cylinder => writeln!(
                        code,
                        "cylinder(h = {}, r1 = {}, r2 = {});",
                        num(p, 0),
                        num(p, 1),
                        num(p, 2)
                    ),
                    ShapeKind::Sphere => {
                        writeln!(code, "sphere(r = {});", num(p, 0))
                    }
                }
                .unwrap();
                Emitted::Statement
            }
            NodeKind::Modifier(modifier) => {
                let p = &modifier.params;
                write!(
                    code,
                    "{}([{}, {}, {}]) ",
                    modifier.kind.name(),
                    num(p, 0),
                    num(p, 1),
                    num(p, 2)
                )
                .unwrap();
                Emitted::Prefix
            }
            NodeKind::Operator(_) => {
                if scene.module_of(id).is_some() {
                    self.define_module(scene, id);
                    writeln!(code, "{}();", module_name(node.uid)).unwrap();
                } else {
                    self.generate_block(scene, id, code);
                }
                Emitted::Statement
            }
            NodeKind::Module(alias) => {
                let operator = alias.operator;
                match scene.get(operator) {
                    Some(target) if matches!(target.kind, NodeKind::Operator(_)) => {
                        self.define_module(scene, operator);
                        writeln!(code, "{}();", module_name(target.uid)).unwrap();
                        Emitted::Statement
                    }
                    _ => {
                        tracing::warn!(
                            "Module alias {} ({}) refers to a missing operator",
                            id,
                            alias.label
                        );
                        Emitted::Nothing
                    }
                }
            }
            NodeKind::Container(container) => {
                self.generate_children(scene, &container.children, code)
            }
            NodeKind::Sink(_) => Emitted::Nothing,
        }
    }

    /// `<op>(){ operands }`
    fn generate_block(&mut self, scene: &Scene, operator: NodeId, code: &mut String) {
        let Some(NodeKind::Operator(op)) = scene.get(operator).map(|n| &n.kind) else {
            return;
        };
        writeln!(code, "{}(){{", op.op.name()).unwrap();
        if self.generate_children(scene, &op.operands, code) == Emitted::Prefix {
            writeln!(code, ";").unwrap();
        }
        writeln!(code, "}}").unwrap();
    }

    /// Emit children in order. A trailing transform is left to the caller,
    /// which is the only one who knows whether the enclosing block ends here.
    fn generate_children(&mut self, scene: &Scene, children: &[NodeId], code: &mut String) -> Emitted {
        let mut last = Emitted::Nothing;
        for &child in children {
            match self.generate_node(scene, child, code) {
                Emitted::Nothing => {}
                emitted => last = emitted,
            }
        }
        last
    }

    /// Write the module definition of `operator` unless it already exists
    fn define_module(&mut self, scene: &Scene, operator: NodeId) {
        let Some(node) = scene.get(operator) else {
            return;
        };
        // Mark first so a self-referencing module terminates
        if !self.defined.insert(operator) {
            return;
        }

        let mut block = String::new();
        self.generate_block(scene, operator, &mut block);

        let mut definition = String::new();
        writeln!(definition, "module {}(){{", module_name(node.uid)).unwrap();
        definition.push_str(&block);
        writeln!(definition, "}}").unwrap();
        writeln!(definition).unwrap();
        self.modules.push_str(&definition);
    }
}

fn num(params: &Params, index: usize) -> String {
    format_number(params.value(index))
}

/// Build the OpenSCAD program for a scene sub-tree
pub fn build_scad(scene: &Scene, id: NodeId) -> String {
    ScadGenerator::new().generate(scene, id)
}
