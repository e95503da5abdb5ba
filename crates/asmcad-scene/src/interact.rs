//! Pointer interaction: hit-testing, taking objects, hover feedback, clicks
//! and wheel scrolling

use glam::IVec2;

use crate::input::{Button, InputField};
use crate::node::{Layout, NodeId, NodeKind};
use crate::scene::{Scene, Slot};

/// An object lifted off the scene by a drag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Taken {
    /// The detached node now following the cursor
    pub node: NodeId,
    /// Where it was taken from; `None` for a fresh clone of a template
    pub origin: Option<Slot>,
}

/// The input field receiving wheel events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Focus {
    pub node: NodeId,
    pub field: usize,
}

impl Scene {
    /// Deepest draggable node under `p`.
    ///
    /// Children are tried in order and the first hit wins. Operators answer
    /// for their icon; sinks and bare containers are never draggable.
    pub fn pick(&self, p: IVec2) -> Option<NodeId> {
        self.pick_in(self.root()?, p)
    }

    fn pick_in(&self, id: NodeId, p: IVec2) -> Option<NodeId> {
        let node = self.get(id)?;
        if !node.bounds.contains(p) {
            return None;
        }

        match &node.kind {
            NodeKind::Container(c) => c.children.iter().find_map(|&child| self.pick_in(child, p)),
            NodeKind::Operator(o) => {
                if o.operand_row.contains(p)
                    && let Some(hit) = o.operands.iter().find_map(|&child| self.pick_in(child, p))
                {
                    return Some(hit);
                }
                if let Some(module) = o.module
                    && self.bounds(module).is_some_and(|b| b.contains(p))
                {
                    return Some(module);
                }
                Some(id)
            }
            NodeKind::Shape(_) | NodeKind::Modifier(_) | NodeKind::Module(_) => Some(id),
            NodeKind::Sink(_) => None,
        }
    }

    /// Start dragging whatever is under `p`.
    ///
    /// A template stays in place and a fresh instance is returned instead;
    /// an instance is removed from its owner and returned together with the
    /// slot it came from.
    pub fn take(&mut self, p: IVec2) -> Option<Taken> {
        let hit = self.pick(p)?;
        if self.get(hit)?.is_template() {
            let node = self.instantiate(hit)?;
            return Some(Taken { node, origin: None });
        }

        let origin = self.detach(hit);
        if let Some(slot) = origin {
            tracing::debug!("Took {} out of {} at {}", hit, slot.container, slot.index);
            self.relayout(slot.container);
            self.layout();
        }
        Some(Taken { node: hit, origin })
    }

    /// Move a detached node so it follows the cursor
    pub fn move_detached(&mut self, id: NodeId, p: IVec2) {
        self.layout_node(id, p);
    }

    /// Highlight every drop target under `p`; clear the rest
    pub fn drag_over(&mut self, p: IVec2) {
        self.clear_drag_over();
        let mut hovered = Vec::new();
        if let Some(root) = self.root() {
            self.collect_targets(root, p, &mut hovered);
        }
        for id in hovered {
            if let Some(node) = self.get_mut(id) {
                node.dragged_over = true;
            }
        }
    }

    fn collect_targets(&self, id: NodeId, p: IVec2, out: &mut Vec<NodeId>) {
        let Some(node) = self.get(id) else {
            return;
        };
        if !node.bounds.contains(p) {
            return;
        }
        if matches!(
            node.kind,
            NodeKind::Container(_) | NodeKind::Operator(_) | NodeKind::Sink(_)
        ) {
            out.push(id);
        }
        for &child in node.kind.children() {
            self.collect_targets(child, p, out);
        }
    }

    /// Drop all hover highlights
    pub fn clear_drag_over(&mut self) {
        let hovered: Vec<NodeId> = self
            .iter()
            .filter(|(_, n)| n.dragged_over)
            .map(|(id, _)| id)
            .collect();
        for id in hovered {
            if let Some(node) = self.get_mut(id) {
                node.dragged_over = false;
            }
        }
    }

    /// Click at `p`. An enabled input field under the pointer takes the
    /// button's step and becomes the focus; anything else yields `None`.
    pub fn click(&mut self, p: IVec2, button: Button) -> Option<Focus> {
        let hit = self.pick(p)?;
        let params = self.get_mut(hit)?.kind.params_mut()?;
        let field = params.field_at(p)?;
        if !params.field_mut(field)?.click(button) {
            return None;
        }
        tracing::debug!("Focused field {} of {} ({:?} step)", field, hit, button);
        Some(Focus { node: hit, field })
    }

    pub fn field(&self, focus: Focus) -> Option<&InputField> {
        self.get(focus.node)?.kind.params()?.field(focus.field)
    }

    /// Feed wheel ticks to a focused field. Returns `false` if the focus no
    /// longer resolves.
    pub fn scroll_field(&mut self, focus: Focus, ticks: i32) -> bool {
        let Some(field) = self
            .get_mut(focus.node)
            .and_then(|n| n.kind.params_mut())
            .and_then(|p| p.field_mut(focus.field))
        else {
            return false;
        };
        field.scroll(ticks);
        true
    }

    /// Scroll the innermost vertical container under `p`. Positive ticks
    /// (wheel up) move towards the top of the content.
    pub fn scroll_at(&mut self, p: IVec2, ticks: i32) -> bool {
        let Some(target) = self.root().and_then(|root| self.vertical_at(root, p)) else {
            return false;
        };
        let step = self.metrics().scroll_step;
        if let Some(NodeKind::Container(c)) = self.get_mut(target).map(|n| &mut n.kind)
            && let Layout::Vertical { scroll, .. } = &mut c.layout
        {
            *scroll = scroll.saturating_sub(ticks.saturating_mul(step));
        }
        // Clamping happens in the layout pass
        self.relayout(target);
        true
    }

    fn vertical_at(&self, id: NodeId, p: IVec2) -> Option<NodeId> {
        let node = self.get(id)?;
        if !node.bounds.contains(p) {
            return None;
        }
        let inner = node
            .kind
            .children()
            .iter()
            .find_map(|&child| self.vertical_at(child, p));
        match &node.kind {
            NodeKind::Container(c) if matches!(c.layout, Layout::Vertical { .. }) => inner.or(Some(id)),
            _ => inner,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Metrics;
    use crate::node::{BooleanOp, DropPolicy, ShapeKind, SinkKind};
    use approx::assert_relative_eq;

    fn metrics() -> Metrics {
        Metrics {
            item_width: 10,
            item_height: 10,
            field_height: 2,
            scroll_step: 5,
        }
    }

    /// palette row on top: [union template, cube template, delete sink];
    /// below it a structural canvas holding one union instance with a cube.
    struct Fixture {
        scene: Scene,
        union_template: NodeId,
        cube_template: NodeId,
        canvas: NodeId,
        op: NodeId,
        cube: NodeId,
    }

    fn fixture() -> Fixture {
        let mut scene = Scene::new(metrics());
        let root = scene.add_template(
            NodeKind::container(Layout::vertical(Some(100), Some(100)), DropPolicy::DisplayOnly),
            None,
        );
        let palette = scene.add_template(
            NodeKind::container(Layout::flow(Some(100)), DropPolicy::DisplayOnly),
            None,
        );
        let canvas = scene.add_template(
            NodeKind::container(Layout::vertical(Some(100), Some(50)), DropPolicy::Structural),
            None,
        );
        let union_template = scene.add_template(NodeKind::operator(BooleanOp::Union), None);
        let cube_template = scene.add_template(NodeKind::shape(ShapeKind::Cube), None);
        let delete = scene.add_template(NodeKind::sink(SinkKind::Delete), None);
        scene.push_child(root, palette);
        scene.push_child(root, canvas);
        scene.push_child(palette, union_template);
        scene.push_child(palette, cube_template);
        scene.push_child(palette, delete);

        let op = scene.add_instance(NodeKind::operator(BooleanOp::Union), None);
        let cube = scene.add_instance(NodeKind::shape(ShapeKind::Cube), None);
        scene.push_child(canvas, op);
        scene.push_child(op, cube);

        scene.set_root(root);
        scene.layout();
        Fixture {
            scene,
            union_template,
            cube_template,
            canvas,
            op,
            cube,
        }
    }

    #[test]
    fn test_pick_finds_deepest() {
        let f = fixture();
        // canvas starts at y = 10; operator icon at x 0..10, cube at x 10..20
        assert_eq!(f.scene.pick(IVec2::new(5, 15)), Some(f.op));
        assert_eq!(f.scene.pick(IVec2::new(15, 15)), Some(f.cube));
        assert_eq!(f.scene.pick(IVec2::new(15, 5)), Some(f.cube_template));
        // sink and empty canvas are not draggable
        assert_eq!(f.scene.pick(IVec2::new(25, 5)), None);
        assert_eq!(f.scene.pick(IVec2::new(50, 40)), None);
        assert_eq!(f.scene.pick(IVec2::new(500, 500)), None);
    }

    #[test]
    fn test_take_template_clones() {
        let mut f = fixture();
        let before = f.scene.children_of(f.union_template).len();
        let taken = f.scene.take(IVec2::new(5, 5));
        let Some(taken) = taken else {
            panic!("template should be takeable");
        };
        assert_ne!(taken.node, f.union_template);
        assert!(taken.origin.is_none());
        assert!(f.scene.get(taken.node).is_some_and(|n| n.is_instance()));
        assert!(f.scene.get(taken.node).is_some_and(|n| n.parent.is_none()));
        // template is still where it was
        assert_eq!(f.scene.pick(IVec2::new(5, 5)), Some(f.union_template));
        assert_eq!(f.scene.children_of(f.union_template).len(), before);
    }

    #[test]
    fn test_take_instance_detaches() {
        let mut f = fixture();
        let taken = f.scene.take(IVec2::new(15, 15));
        assert_eq!(
            taken,
            Some(Taken {
                node: f.cube,
                origin: Some(Slot {
                    container: f.op,
                    index: 0
                })
            })
        );
        assert!(f.scene.children_of(f.op).is_empty());
        // the operator shrank back to its icon
        assert_eq!(f.scene.bounds(f.op).map(|b| b.size.x), Some(10));
    }

    #[test]
    fn test_take_whole_operator() {
        let mut f = fixture();
        let taken = f.scene.take(IVec2::new(5, 15));
        assert_eq!(taken.map(|t| t.node), Some(f.op));
        assert!(f.scene.children_of(f.canvas).is_empty());
        // operands travel with the operator
        assert_eq!(f.scene.children_of(f.op), &[f.cube]);
    }

    #[test]
    fn test_drag_over_marks_targets_under_cursor() {
        let mut f = fixture();
        f.scene.drag_over(IVec2::new(15, 15));
        let hovered: Vec<NodeId> = f
            .scene
            .iter()
            .filter(|(_, n)| n.dragged_over)
            .map(|(id, _)| id)
            .collect();
        assert!(hovered.contains(&f.canvas));
        assert!(hovered.contains(&f.op));
        assert!(!hovered.contains(&f.cube));

        f.scene.drag_over(IVec2::new(90, 90));
        assert!(f.scene.get(f.op).is_some_and(|n| !n.dragged_over));
        f.scene.clear_drag_over();
        assert!(f.scene.iter().all(|(_, n)| !n.dragged_over));
    }

    #[test]
    fn test_click_and_scroll_field() {
        let mut f = fixture();
        // cube instance at (10, 10); fields at y 14, 16, 18
        let focus = f.scene.click(IVec2::new(15, 15), Button::Right);
        assert_eq!(
            focus,
            Some(Focus {
                node: f.cube,
                field: 0
            })
        );
        let Some(focus) = focus else { return };
        assert!(f.scene.scroll_field(focus, 3));
        let value = f.scene.field(focus).map(|field| field.value);
        assert_relative_eq!(value.unwrap_or_default(), 10.03);

        // clicking the icon area focuses nothing
        assert_eq!(f.scene.click(IVec2::new(15, 11), Button::Left), None);
    }

    #[test]
    fn test_scroll_field_on_destroyed_node() {
        let mut f = fixture();
        let Some(focus) = f.scene.click(IVec2::new(15, 17), Button::Left) else {
            panic!("field should take focus");
        };
        f.scene.destroy(f.cube);
        assert!(!f.scene.scroll_field(focus, 1));
    }

    #[test]
    fn test_scroll_canvas() {
        let mut f = fixture();
        for _ in 0..8 {
            let op = f.scene.add_instance(NodeKind::operator(BooleanOp::Union), None);
            f.scene.push_child(f.canvas, op);
        }
        f.scene.layout();
        // 9 rows of 10 in a 50 tall viewport
        assert!(f.scene.scroll_at(IVec2::new(50, 40), -2));
        assert_eq!(f.scene.bounds(f.op).map(|b| b.origin.y), Some(0));
        assert!(f.scene.scroll_at(IVec2::new(50, 40), -100));
        assert_eq!(f.scene.bounds(f.op).map(|b| b.origin.y), Some(-30));
        assert!(f.scene.scroll_at(IVec2::new(50, 40), 100));
        assert_eq!(f.scene.bounds(f.op).map(|b| b.origin.y), Some(10));
    }

    #[test]
    fn test_scroll_canvas_extreme_ticks() {
        let mut f = fixture();
        for _ in 0..8 {
            let op = f.scene.add_instance(NodeKind::operator(BooleanOp::Union), None);
            f.scene.push_child(f.canvas, op);
        }
        f.scene.layout();
        assert!(f.scene.scroll_at(IVec2::new(50, 40), i32::MIN));
        assert_eq!(f.scene.bounds(f.op).map(|b| b.origin.y), Some(-30));
        assert!(f.scene.scroll_at(IVec2::new(50, 40), i32::MAX));
        assert_eq!(f.scene.bounds(f.op).map(|b| b.origin.y), Some(10));
        assert!(f.scene.scroll_at(IVec2::new(50, 40), i32::MIN));
        assert!(f.scene.scroll_at(IVec2::new(50, 40), i32::MIN));
        assert_eq!(f.scene.bounds(f.op).map(|b| b.origin.y), Some(-30));
    }
}
