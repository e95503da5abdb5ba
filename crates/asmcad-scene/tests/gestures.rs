//! End-to-end pointer gestures against a small workbench

// Tests are allowed to use expect/unwrap for cleaner error messages
#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]

use approx::assert_relative_eq;
use asmcad_scene::{
    BooleanOp, Button, DropOutcome, DropPolicy, IVec2, Layout, NodeId, NodeKind, Scene, ShapeKind,
};

struct Bench {
    scene: Scene,
    cube: NodeId,
    union: NodeId,
    canvas: NodeId,
    gallery: NodeId,
}

/// Palette row with a cube and a union template, then the canvas (500 wide)
/// next to the module gallery (300 wide), both 400 tall.
fn bench() -> Bench {
    let mut scene = Scene::default();
    let root = scene.add_template(
        NodeKind::container(Layout::vertical(Some(800), Some(600)), DropPolicy::DisplayOnly),
        None,
    );
    let palette = scene.add_template(
        NodeKind::container(Layout::flow(Some(800)), DropPolicy::DisplayOnly),
        None,
    );
    let cube = scene.add_template(NodeKind::shape(ShapeKind::Cube), None);
    let union = scene.add_template(NodeKind::operator(BooleanOp::Union), None);
    scene.push_child(palette, cube);
    scene.push_child(palette, union);

    let workspace = scene.add_template(
        NodeKind::container(Layout::flow(Some(800)), DropPolicy::DisplayOnly),
        None,
    );
    let canvas = scene.add_template(
        NodeKind::container(Layout::vertical(Some(500), Some(400)), DropPolicy::Structural),
        None,
    );
    let gallery = scene.add_template(
        NodeKind::container(Layout::vertical(Some(300), Some(400)), DropPolicy::Modules),
        None,
    );
    scene.push_child(workspace, canvas);
    scene.push_child(workspace, gallery);

    scene.push_child(root, palette);
    scene.push_child(root, workspace);
    scene.set_root(root);
    scene.layout();

    Bench {
        scene,
        cube,
        union,
        canvas,
        gallery,
    }
}

#[test]
fn palette_drag_creates_an_independent_copy() {
    let mut b = bench();
    let taken = b.scene.take(IVec2::new(50, 50)).expect("cube template under pointer");
    assert!(taken.origin.is_none());
    assert_ne!(taken.node, b.cube);

    b.scene.move_detached(taken.node, IVec2::new(240, 290));
    let outcome = b.scene.drop_at(IVec2::new(250, 300), taken.node);
    assert_eq!(outcome, DropOutcome::Placed(b.canvas));
    assert_eq!(b.scene.children_of(b.canvas), &[taken.node]);
    assert_eq!(b.scene.bounds(taken.node).unwrap().origin, IVec2::new(0, 100));

    // The palette entry keeps its own values
    let focus = b
        .scene
        .click(IVec2::new(50, 145), Button::Left)
        .expect("first field of the placed cube");
    assert!(b.scene.scroll_field(focus, 2));
    assert_relative_eq!(b.scene.field(focus).unwrap().value, 12.0);

    let template = b.scene.get(b.cube).unwrap().kind.params().unwrap();
    assert_relative_eq!(template.value(0), 10.0);
}

#[test]
fn rejected_drop_returns_to_its_slot() {
    let mut b = bench();
    for _ in 0..2 {
        let taken = b.scene.take(IVec2::new(50, 50)).unwrap();
        b.scene.drop_at(IVec2::new(250, 300), taken.node);
    }
    let first = b.scene.children_of(b.canvas)[0];
    let second = b.scene.children_of(b.canvas)[1];

    let taken = b.scene.take(IVec2::new(50, 120)).expect("first cube");
    assert_eq!(taken.node, first);
    assert_eq!(b.scene.children_of(b.canvas), &[second]);

    // Empty palette area
    let outcome = b.scene.drop_at(IVec2::new(700, 50), taken.node);
    assert_eq!(outcome, DropOutcome::Rejected);
    assert!(b.scene.return_to(taken.node, taken.origin));
    assert_eq!(b.scene.children_of(b.canvas), &[first, second]);
    assert_eq!(b.scene.bounds(first).unwrap().origin, IVec2::new(0, 100));
}

#[test]
fn published_module_hands_out_references() {
    let mut b = bench();
    let taken = b.scene.take(IVec2::new(150, 50)).expect("union template");
    let op = taken.node;
    assert_ne!(op, b.union);
    assert_eq!(
        b.scene.drop_at(IVec2::new(600, 300), op),
        DropOutcome::Placed(b.gallery)
    );

    let canonical = b.scene.module_of(op).expect("module published");
    assert_eq!(b.scene.bounds(canonical).unwrap().origin, IVec2::new(600, 100));

    let reference = b.scene.take(IVec2::new(650, 150)).expect("module alias");
    assert!(reference.origin.is_none());
    assert_ne!(reference.node, canonical);
    assert_eq!(
        b.scene.drop_at(IVec2::new(250, 300), reference.node),
        DropOutcome::Placed(b.canvas)
    );

    let refs: Vec<NodeId> = b.scene.references_to(op).collect();
    assert_eq!(refs, vec![reference.node]);
    assert!(b.scene.is_referenced_outside(op));
}

#[test]
fn wheel_scrolls_the_canvas_only_while_it_overflows() {
    let mut b = bench();
    for _ in 0..3 {
        let taken = b.scene.take(IVec2::new(50, 50)).unwrap();
        b.scene.drop_at(IVec2::new(250, 300), taken.node);
    }
    // 300 pixels of content in a 400 pixel viewport
    assert!(b.scene.scroll_at(IVec2::new(250, 300), -3));
    let first = b.scene.children_of(b.canvas)[0];
    assert_eq!(b.scene.bounds(first).unwrap().origin, IVec2::new(0, 100));

    for _ in 0..3 {
        let taken = b.scene.take(IVec2::new(50, 50)).unwrap();
        b.scene.drop_at(IVec2::new(250, 300), taken.node);
    }
    // 600 of content, so at most 200 of scroll
    assert!(b.scene.scroll_at(IVec2::new(250, 300), -20));
    assert_eq!(b.scene.bounds(first).unwrap().origin, IVec2::new(0, -100));
}
