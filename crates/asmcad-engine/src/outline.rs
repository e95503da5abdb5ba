//! Text dump of the laid-out tree

use std::fmt::Write;

use asmcad_scene::{NodeId, NodeKind, Scene};

/// One line per node, indented by depth:
/// `cube #12v0 @ 0,100 100x100 [10, 10, 10]`
pub fn outline(scene: &Scene, id: NodeId) -> String {
    let mut out = String::new();
    outline_into(scene, id, 0, &mut out);
    out
}

fn outline_into(scene: &Scene, id: NodeId, depth: usize, out: &mut String) {
    let Some(node) = scene.get(id) else {
        return;
    };
    let b = node.bounds;
    let _ = write!(
        out,
        "{:indent$}{} {} @ {},{} {}x{}",
        "",
        node.kind.label(),
        id,
        b.origin.x,
        b.origin.y,
        b.size.x,
        b.size.y,
        indent = depth * 2
    );
    if node.is_template() {
        out.push_str(" (template)");
    }
    if let Some(params) = node.kind.params() {
        let values: Vec<String> = params
            .fields()
            .iter()
            .filter(|f| f.enabled)
            .map(|f| f.text())
            .collect();
        let _ = write!(out, " [{}]", values.join(", "));
    }
    out.push('\n');

    if let NodeKind::Operator(op) = &node.kind
        && let Some(module) = op.module
    {
        outline_into(scene, module, depth + 1, out);
    }
    for &child in node.kind.children() {
        outline_into(scene, child, depth + 1, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asmcad_scene::{BooleanOp, ShapeKind};

    #[test]
    fn test_outline_nesting() {
        let mut scene = Scene::default();
        let union = scene.add_instance(NodeKind::operator(BooleanOp::Union), None);
        let sphere = scene.add_instance(NodeKind::shape(ShapeKind::Sphere), None);
        scene.push_child(union, sphere);
        scene.get_module(union);
        scene.set_root(union);
        scene.layout();

        let text = outline(&scene, union);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("union "));
        assert!(lines[0].ends_with("@ 0,0 300x100"));
        assert!(lines[1].starts_with("  mod"));
        assert!(lines[1].ends_with("(template)"));
        assert!(lines[2].starts_with("  sphere "));
        assert!(lines[2].ends_with("@ 200,0 100x100 [5]"));
    }
}
