//! Layout engines
//!
//! Layout is a full, non-incremental pass: placing a node places everything it
//! owns. The result depends only on the origin, the child order and the
//! children's own sizes, so running it twice gives identical bounds.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::geometry::Rect;
use crate::node::{Layout, NodeId, NodeKind};
use crate::scene::Scene;

/// Fixed sizes used by the layout pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metrics {
    /// Width of one palette icon
    pub item_width: i32,
    /// Height of one palette icon
    pub item_height: i32,
    /// Height of one numeric input field
    pub field_height: i32,
    /// Pixels a vertical container scrolls per wheel tick
    pub scroll_step: i32,
}

impl Default for Metrics {
    fn default() -> Self {
        Self {
            item_width: 100,
            item_height: 100,
            field_height: 20,
            scroll_step: 20,
        }
    }
}

impl Metrics {
    pub fn item_size(&self) -> IVec2 {
        IVec2::new(self.item_width, self.item_height)
    }
}

impl Scene {
    /// Lay out the whole tree from the root's current origin
    pub fn layout(&mut self) {
        if let Some(root) = self.root() {
            self.relayout(root);
        }
    }

    /// Lay out `id` again where it currently stands
    pub fn relayout(&mut self, id: NodeId) {
        if let Some(origin) = self.bounds(id).map(|b| b.origin) {
            self.layout_node(id, origin);
        }
    }

    /// Place `id` (and everything it owns) at `origin`. Returns its size.
    pub fn layout_node(&mut self, id: NodeId, origin: IVec2) -> IVec2 {
        let Some(node) = self.get(id) else {
            return IVec2::ZERO;
        };

        match &node.kind {
            NodeKind::Container(c) => {
                let layout = c.layout;
                let children = c.children.clone();
                match layout {
                    Layout::Flow { width } => self.layout_flow(id, origin, width, &children),
                    Layout::Vertical {
                        width,
                        viewport,
                        scroll,
                        ..
                    } => self.layout_vertical(id, origin, width, viewport, scroll, &children),
                }
            }
            NodeKind::Operator(o) => {
                let module = o.module;
                let operands = o.operands.clone();
                self.layout_operator(id, origin, module, &operands)
            }
            NodeKind::Shape(_) | NodeKind::Modifier(_) | NodeKind::Module(_) | NodeKind::Sink(_) => {
                self.layout_leaf(id, origin)
            }
        }
    }

    fn set_bounds(&mut self, id: NodeId, bounds: Rect) {
        if let Some(node) = self.get_mut(id) {
            node.bounds = bounds;
        }
    }

    fn layout_leaf(&mut self, id: NodeId, origin: IVec2) -> IVec2 {
        let size = self.metrics().item_size();
        let field_height = self.metrics().field_height;
        let bounds = Rect::from_origin_size(origin, size);
        if let Some(node) = self.get_mut(id) {
            node.bounds = bounds;
            if let Some(params) = node.kind.params_mut() {
                params.layout(bounds, field_height);
            }
        }
        size
    }

    /// Left to right, wrapping to a new row when the next child would cross
    /// the right edge. A row always takes at least one child.
    fn layout_flow(
        &mut self,
        id: NodeId,
        origin: IVec2,
        width: Option<i32>,
        children: &[NodeId],
    ) -> IVec2 {
        let mut next = origin;
        let mut row_height = 0;
        let mut row_len = 0;
        let mut widest = 0;

        for &child in children {
            let mut size = self.layout_node(child, next);
            if let Some(width) = width
                && row_len > 0
                && next.x + size.x > origin.x + width
            {
                next.x = origin.x;
                next.y += row_height;
                row_height = 0;
                row_len = 0;
                size = self.layout_node(child, next);
            }
            next.x += size.x;
            widest = widest.max(next.x - origin.x);
            row_height = row_height.max(size.y);
            row_len += 1;
        }

        let size = IVec2::new(width.unwrap_or(widest), (next.y - origin.y) + row_height);
        self.set_bounds(id, Rect::from_origin_size(origin, size));
        size
    }

    /// Top to bottom. The scroll offset is clamped to the scrollable range
    /// and subtracted from every child position.
    fn layout_vertical(
        &mut self,
        id: NodeId,
        origin: IVec2,
        width: Option<i32>,
        viewport: Option<i32>,
        scroll: i32,
        children: &[NodeId],
    ) -> IVec2 {
        let place = |scene: &mut Scene, offset: i32| {
            let mut y = 0;
            let mut widest = 0;
            for &child in children {
                let size = scene.layout_node(child, origin + IVec2::new(0, y - offset));
                y += size.y;
                widest = widest.max(size.x);
            }
            (y, widest)
        };

        let (content, mut widest) = place(self, 0);
        let max_scroll = viewport.map_or(0, |v| (content - v).max(0));
        let scroll = scroll.clamp(0, max_scroll);
        if scroll != 0 {
            widest = place(self, scroll).1;
        }

        let size = IVec2::new(width.unwrap_or(widest), viewport.unwrap_or(content));
        if let Some(node) = self.get_mut(id) {
            node.bounds = Rect::from_origin_size(origin, size);
            if let NodeKind::Container(c) = &mut node.kind
                && let Layout::Vertical {
                    scroll: s,
                    content: c_height,
                    ..
                } = &mut c.layout
            {
                *s = scroll;
                *c_height = content;
            }
        }
        size
    }

    /// Icon, then the module alias (if any), then the operand row
    fn layout_operator(
        &mut self,
        id: NodeId,
        origin: IVec2,
        module: Option<NodeId>,
        operands: &[NodeId],
    ) -> IVec2 {
        let item = self.metrics().item_size();
        let mut x = origin.x + item.x;

        if let Some(module) = module.filter(|m| self.contains(*m)) {
            x += self.layout_node(module, IVec2::new(x, origin.y)).x;
        }

        let row_origin = IVec2::new(x, origin.y);
        let mut row_height = 0;
        for &operand in operands {
            let size = self.layout_node(operand, IVec2::new(x, origin.y));
            x += size.x;
            row_height = row_height.max(size.y);
        }

        let row = Rect::from_origin_size(row_origin, IVec2::new(x - row_origin.x, row_height));
        let size = IVec2::new(x - origin.x, item.y.max(row_height));
        if let Some(node) = self.get_mut(id) {
            node.bounds = Rect::from_origin_size(origin, size);
            if let NodeKind::Operator(op) = &mut node.kind {
                op.operand_row = row;
            }
        }
        size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{BooleanOp, DropPolicy, ShapeKind};

    fn metrics() -> Metrics {
        Metrics {
            item_width: 10,
            item_height: 10,
            field_height: 2,
            scroll_step: 5,
        }
    }

    fn flow_with_items(scene: &mut Scene, width: Option<i32>, n: usize) -> (NodeId, Vec<NodeId>) {
        let flow = scene.add_instance(
            NodeKind::container(Layout::flow(width), DropPolicy::Structural),
            None,
        );
        let items = (0..n)
            .map(|_| {
                let item = scene.add_instance(NodeKind::shape(ShapeKind::Cube), None);
                scene.push_child(flow, item);
                item
            })
            .collect();
        (flow, items)
    }

    fn all_bounds(scene: &Scene) -> Vec<Rect> {
        scene.iter().map(|(_, n)| n.bounds).collect()
    }

    #[test]
    fn test_flow_wraps_at_right_edge() {
        let mut scene = Scene::new(metrics());
        let (flow, items) = flow_with_items(&mut scene, Some(35), 5);
        let size = scene.layout_node(flow, IVec2::new(5, 7));

        let origins: Vec<IVec2> = items
            .iter()
            .filter_map(|i| scene.bounds(*i))
            .map(|b| b.origin)
            .collect();
        assert_eq!(
            origins,
            vec![
                IVec2::new(5, 7),
                IVec2::new(15, 7),
                IVec2::new(25, 7),
                IVec2::new(5, 17),
                IVec2::new(15, 17),
            ]
        );
        assert_eq!(size, IVec2::new(35, 20));
    }

    #[test]
    fn test_flow_exact_fit_does_not_wrap() {
        let mut scene = Scene::new(metrics());
        let (flow, items) = flow_with_items(&mut scene, Some(30), 3);
        scene.layout_node(flow, IVec2::ZERO);
        assert_eq!(scene.bounds(items[2]).map(|b| b.origin), Some(IVec2::new(20, 0)));
        assert_eq!(scene.bounds(flow).map(|b| b.size.y), Some(10));
    }

    #[test]
    fn test_flow_row_height_is_tallest_child() {
        let mut scene = Scene::new(metrics());
        let flow = scene.add_instance(
            NodeKind::container(Layout::flow(Some(25)), DropPolicy::Structural),
            None,
        );
        let op = scene.add_instance(NodeKind::operator(BooleanOp::Union), None);
        let inner = scene.add_instance(NodeKind::operator(BooleanOp::Union), None);
        // inner is 10 wide, op holds it: 20 wide, 10 tall
        scene.push_child(op, inner);
        let tall = scene.add_instance(
            NodeKind::container(Layout::vertical(Some(5), None), DropPolicy::Structural),
            None,
        );
        let a = scene.add_instance(NodeKind::shape(ShapeKind::Cube), None);
        let b = scene.add_instance(NodeKind::shape(ShapeKind::Cube), None);
        scene.push_child(tall, a);
        scene.push_child(tall, b);
        let last = scene.add_instance(NodeKind::shape(ShapeKind::Cube), None);
        scene.push_child(flow, tall);
        scene.push_child(flow, op);
        scene.push_child(flow, last);

        scene.layout_node(flow, IVec2::ZERO);
        // tall (5x20) and op (20x10) share the first row; last wraps below the tallest
        assert_eq!(scene.bounds(op).map(|b| b.origin), Some(IVec2::new(5, 0)));
        assert_eq!(scene.bounds(last).map(|b| b.origin), Some(IVec2::new(0, 20)));
        assert_eq!(scene.bounds(flow).map(|b| b.size.y), Some(30));
    }

    #[test]
    fn test_oversized_first_child_does_not_leave_empty_row() {
        let mut scene = Scene::new(metrics());
        let (flow, items) = flow_with_items(&mut scene, Some(5), 2);
        scene.layout_node(flow, IVec2::ZERO);
        assert_eq!(scene.bounds(items[0]).map(|b| b.origin), Some(IVec2::ZERO));
        assert_eq!(scene.bounds(items[1]).map(|b| b.origin), Some(IVec2::new(0, 10)));
    }

    #[test]
    fn test_unbounded_flow_is_single_row() {
        let mut scene = Scene::new(metrics());
        let (flow, items) = flow_with_items(&mut scene, None, 4);
        let size = scene.layout_node(flow, IVec2::ZERO);
        assert_eq!(size, IVec2::new(40, 10));
        assert_eq!(scene.bounds(items[3]).map(|b| b.origin.x), Some(30));
    }

    #[test]
    fn test_empty_flow_has_no_height() {
        let mut scene = Scene::new(metrics());
        let (flow, _) = flow_with_items(&mut scene, Some(50), 0);
        assert_eq!(scene.layout_node(flow, IVec2::ZERO), IVec2::new(50, 0));
    }

    #[test]
    fn test_vertical_stacks_children() {
        let mut scene = Scene::new(metrics());
        let column = scene.add_instance(
            NodeKind::container(Layout::vertical(Some(40), None), DropPolicy::Structural),
            None,
        );
        let items: Vec<NodeId> = (0..3)
            .map(|_| {
                let item = scene.add_instance(NodeKind::shape(ShapeKind::Sphere), None);
                scene.push_child(column, item);
                item
            })
            .collect();

        let size = scene.layout_node(column, IVec2::new(1, 2));
        assert_eq!(size, IVec2::new(40, 30));
        assert_eq!(scene.bounds(items[2]).map(|b| b.origin), Some(IVec2::new(1, 22)));
    }

    #[test]
    fn test_vertical_scroll_is_clamped() {
        let mut scene = Scene::new(metrics());
        let column = scene.add_instance(
            NodeKind::container(Layout::vertical(Some(40), Some(25)), DropPolicy::Structural),
            None,
        );
        let items: Vec<NodeId> = (0..4)
            .map(|_| {
                let item = scene.add_instance(NodeKind::shape(ShapeKind::Cube), None);
                scene.push_child(column, item);
                item
            })
            .collect();
        if let Some(NodeKind::Container(c)) = scene.get_mut(column).map(|n| &mut n.kind) {
            c.layout = Layout::Vertical {
                width: Some(40),
                viewport: Some(25),
                scroll: 1000,
                content: 0,
            };
        }

        let size = scene.layout_node(column, IVec2::ZERO);
        assert_eq!(size, IVec2::new(40, 25));
        // content 40, viewport 25: offset clamps to 15
        assert_eq!(scene.bounds(items[0]).map(|b| b.origin.y), Some(-15));
        match scene.get(column).map(|n| &n.kind) {
            Some(NodeKind::Container(c)) => assert_eq!(
                c.layout,
                Layout::Vertical {
                    width: Some(40),
                    viewport: Some(25),
                    scroll: 15,
                    content: 40
                }
            ),
            other => panic!("expected container, got {:?}", other),
        }
    }

    #[test]
    fn test_operator_wraps_icon_module_and_operands() {
        let mut scene = Scene::new(metrics());
        let op = scene.add_instance(NodeKind::operator(BooleanOp::Difference), None);
        let a = scene.add_instance(NodeKind::shape(ShapeKind::Cube), None);
        let b = scene.add_instance(NodeKind::shape(ShapeKind::Cylinder), None);
        scene.push_child(op, a);
        scene.push_child(op, b);

        assert_eq!(scene.layout_node(op, IVec2::ZERO), IVec2::new(30, 10));
        assert_eq!(scene.bounds(a).map(|r| r.origin.x), Some(10));

        let module = scene.get_module(op);
        assert_eq!(scene.layout_node(op, IVec2::ZERO), IVec2::new(40, 10));
        assert_eq!(module.and_then(|m| scene.bounds(m)), Some(Rect::new(10, 0, 10, 10)));
        assert_eq!(scene.bounds(a).map(|r| r.origin.x), Some(20));
        match scene.get(op).map(|n| &n.kind) {
            Some(NodeKind::Operator(o)) => assert_eq!(o.operand_row, Rect::new(20, 0, 20, 10)),
            other => panic!("expected operator, got {:?}", other),
        }
    }

    #[test]
    fn test_leaf_fields_follow_the_leaf() {
        let mut scene = Scene::new(metrics());
        let cube = scene.add_instance(NodeKind::shape(ShapeKind::Cube), None);
        scene.layout_node(cube, IVec2::new(50, 50));
        let field = scene
            .get(cube)
            .and_then(|n| n.kind.params())
            .map(|p| p.fields()[2].bounds);
        assert_eq!(field, Some(Rect::new(50, 58, 10, 2)));
    }

    #[test]
    fn test_layout_is_idempotent() {
        let mut scene = Scene::new(metrics());
        let (flow, _items) = flow_with_items(&mut scene, Some(25), 3);
        let op = scene.add_instance(NodeKind::operator(BooleanOp::Union), None);
        scene.push_child(flow, op);
        scene.get_module(op);
        let cube = scene.add_instance(NodeKind::shape(ShapeKind::Cube), None);
        scene.push_child(op, cube);
        scene.set_root(flow);

        scene.layout_node(flow, IVec2::new(3, 4));
        let first = all_bounds(&scene);
        scene.layout();
        scene.layout();
        assert_eq!(first, all_bounds(&scene));
    }
}
