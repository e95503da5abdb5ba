//! The node arena
//!
//! A [`Scene`] owns every node. Ownership between nodes is a plain tree: a
//! container or operator lists the ids it owns, and every owned node points
//! back to its owner through the non-owning `parent` field. Module aliases
//! refer to their operator by id only, so nothing here can form a cycle.

use glam::IVec2;

use crate::geometry::Rect;
use crate::layout::Metrics;
use crate::node::{DropPolicy, ModuleAlias, Node, NodeId, NodeKind, Role};
use crate::picture::ImageHandle;

/// Position of a node inside its owner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub container: NodeId,
    pub index: usize,
}

/// Arena holding the whole editor tree
#[derive(Debug, Clone)]
pub struct Scene {
    /// slots
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    next_uid: u64,
    root: Option<NodeId>,
    metrics: Metrics,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(Metrics::default())
    }
}

impl Scene {
    pub fn new(metrics: Metrics) -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            next_uid: 1,
            root: None,
            metrics,
        }
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn set_root(&mut self, root: NodeId) {
        self.root = Some(root);
    }

    // ========================================================================
    // Allocation
    // ========================================================================

    fn alloc(&mut self, node: Node) -> NodeId {
        if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx];
            self.nodes[idx] = Some(node);
            NodeId::new(idx as u32, generation)
        } else {
            let idx = self.nodes.len();
            self.nodes.push(Some(node));
            self.generations.push(1);
            NodeId::new(idx as u32, 1)
        }
    }

    fn free(&mut self, id: NodeId) {
        let idx = id.idx();
        if self.nodes.get(idx).is_some_and(Option::is_some) && self.generations[idx] == id.1 {
            self.nodes[idx] = None;
            self.generations[idx] = self.generations[idx].wrapping_add(1);
            self.free_list.push(idx);
        }
    }

    fn insert(
        &mut self,
        kind: NodeKind,
        role: Role,
        image: Option<ImageHandle>,
        cloned_from: Option<NodeId>,
    ) -> NodeId {
        let uid = self.next_uid;
        self.next_uid += 1;
        let size = self.default_size(&kind);
        self.alloc(Node {
            uid,
            bounds: Rect::from_origin_size(IVec2::ZERO, size),
            image,
            role,
            cloned_from,
            dragged_over: false,
            parent: None,
            kind,
        })
    }

    fn default_size(&self, kind: &NodeKind) -> IVec2 {
        match kind {
            NodeKind::Container(_) => IVec2::ZERO,
            _ => self.metrics.item_size(),
        }
    }

    /// Add a palette original
    pub fn add_template(&mut self, kind: NodeKind, image: Option<ImageHandle>) -> NodeId {
        self.insert(kind, Role::Template, image, None)
    }

    /// Add a node that can be moved freely (canvas rows, programmatic trees)
    pub fn add_instance(&mut self, kind: NodeKind, image: Option<ImageHandle>) -> NodeId {
        self.insert(kind, Role::Instance, image, None)
    }

    /// Clone a template into a fresh, detached instance.
    ///
    /// Instances are never cloned: asking for a copy of one returns `None`.
    /// The copy gets its own field values and shares only the picture; it
    /// starts without operands and without a module.
    pub fn instantiate(&mut self, template: NodeId) -> Option<NodeId> {
        let node = self.get(template)?;
        if !node.is_template() {
            tracing::debug!("Refusing to clone instance {}", template);
            return None;
        }

        let kind = match &node.kind {
            NodeKind::Shape(_) | NodeKind::Modifier(_) | NodeKind::Module(_) => node.kind.clone(),
            NodeKind::Operator(o) => NodeKind::operator(o.op),
            NodeKind::Container(_) | NodeKind::Sink(_) => return None,
        };
        let image = node.image.clone();
        let id = self.insert(kind, Role::Instance, image, Some(template));
        tracing::debug!("Cloned {} into {}", template, id);
        Some(id)
    }

    // ========================================================================
    // Access
    // ========================================================================

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        let idx = id.idx();
        if self.generations.get(idx).copied() != Some(id.1) {
            return None;
        }
        self.nodes.get(idx).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let idx = id.idx();
        if self.generations.get(idx).copied() != Some(id.1) {
            return None;
        }
        self.nodes.get_mut(idx).and_then(Option::as_mut)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn bounds(&self, id: NodeId) -> Option<Rect> {
        self.get(id).map(|n| n.bounds)
    }

    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Owned children in placement order (empty for leaves)
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.kind.children())
    }

    /// Whether `ancestor` owns `id`, directly or transitively
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = self.parent_of(id);
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.parent_of(p);
        }
        false
    }

    /// Live nodes in slot order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().filter_map(|(idx, slot)| {
            slot.as_ref()
                .map(|n| (NodeId::new(idx as u32, self.generations[idx]), n))
        })
    }

    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `id` and everything it owns, parents before children
    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.get(current) else {
                continue;
            };
            out.push(current);
            if let NodeKind::Operator(o) = &node.kind
                && let Some(module) = o.module
            {
                stack.push(module);
            }
            stack.extend(node.kind.children().iter().rev());
        }
        out
    }

    // ========================================================================
    // Structure
    // ========================================================================

    /// Insert `child` into `container` at `index` (clamped to the end).
    ///
    /// The child is first removed from wherever it was, so it is never listed
    /// by two owners. Returns `false` if `container` cannot own children or
    /// if the insertion would make a node its own ancestor.
    pub fn attach(&mut self, container: NodeId, child: NodeId, index: usize) -> bool {
        if container == child || self.is_ancestor(child, container) || !self.contains(child) {
            return false;
        }
        if !self.get(container).is_some_and(|n| accepts_children(&n.kind)) {
            return false;
        }

        if self.parent_of(child).is_some() && self.detach(child).is_none() {
            return false;
        }

        let Some(children) = self.get_mut(container).and_then(|n| n.kind.children_mut()) else {
            return false;
        };
        let index = index.min(children.len());
        children.insert(index, child);

        if let Some(node) = self.get_mut(child) {
            node.parent = Some(container);
        }
        true
    }

    /// Append `child` at the end of `container`
    pub fn push_child(&mut self, container: NodeId, child: NodeId) -> bool {
        self.attach(container, child, usize::MAX)
    }

    /// Remove `child` from its owner. Returns where it was.
    pub fn detach(&mut self, child: NodeId) -> Option<Slot> {
        let parent = self.parent_of(child)?;
        let children = self.get_mut(parent)?.kind.children_mut()?;
        // A canonical module alias names its operator as parent without
        // being one of its operands; it cannot be detached.
        let index = children.iter().position(|c| *c == child)?;
        children.remove(index);
        if let Some(node) = self.get_mut(child) {
            node.parent = None;
        }
        Some(Slot {
            container: parent,
            index,
        })
    }

    /// Remove `id` and everything it owns from the scene
    pub fn destroy(&mut self, id: NodeId) {
        if !self.contains(id) {
            return;
        }
        self.detach(id);
        for node in self.subtree(id) {
            self.free(node);
        }
        if self.root == Some(id) {
            self.root = None;
        }
    }

    // ========================================================================
    // Modules
    // ========================================================================

    /// The module alias of an operator instance, created on first request.
    ///
    /// Every call returns the same shared alias and refreshes the label its
    /// icon is drawn from. Templates and non-operators yield `None`.
    pub fn get_module(&mut self, operator: NodeId) -> Option<NodeId> {
        let node = self.get(operator)?;
        if !node.is_instance() {
            return None;
        }
        let NodeKind::Operator(op) = &node.kind else {
            return None;
        };
        let label = module_name(node.uid);

        let alias = match op.module.filter(|m| self.contains(*m)) {
            Some(existing) => existing,
            None => {
                // The alias itself stays put next to its operator; dragging it
                // clones a reference, hence Role::Template.
                let alias = self.insert(
                    NodeKind::Module(ModuleAlias {
                        operator,
                        label: label.clone(),
                    }),
                    Role::Template,
                    None,
                    None,
                );
                if let Some(n) = self.get_mut(alias) {
                    n.parent = Some(operator);
                }
                if let Some(NodeKind::Operator(op)) = self.get_mut(operator).map(|n| &mut n.kind) {
                    op.module = Some(alias);
                }
                tracing::debug!("Created module {} for operator {}", label, operator);
                alias
            }
        };

        if let Some(NodeKind::Module(m)) = self.get_mut(alias).map(|n| &mut n.kind) {
            m.label = label;
        }
        Some(alias)
    }

    /// Withdraw an operator's module.
    ///
    /// The canonical alias is destroyed and the operator stops being a
    /// module. An operator listed in a module gallery leaves the gallery
    /// with it. Refused while any reference to the module is alive.
    pub fn unpublish(&mut self, operator: NodeId) -> bool {
        let Some(alias) = self.module_of(operator) else {
            return false;
        };
        if self.references_to(operator).next().is_some() {
            tracing::debug!("Module of {} is still referenced; keeping it", operator);
            return false;
        }

        if let Some(NodeKind::Operator(op)) = self.get_mut(operator).map(|n| &mut n.kind) {
            op.module = None;
        }
        self.destroy(alias);

        let listed = self
            .parent_of(operator)
            .and_then(|p| self.get(p))
            .is_some_and(|p| matches!(&p.kind, NodeKind::Container(c) if c.policy == DropPolicy::Modules));
        if listed {
            self.destroy(operator);
        }
        self.layout();
        tracing::debug!("Unpublished module of {}", operator);
        true
    }

    /// The existing module alias of an operator, without creating one
    pub fn module_of(&self, operator: NodeId) -> Option<NodeId> {
        match &self.get(operator)?.kind {
            NodeKind::Operator(op) => op.module.filter(|m| self.contains(*m)),
            _ => None,
        }
    }

    /// Alias instances (not the canonical alias) that refer to `operator`
    pub fn references_to(&self, operator: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.iter().filter_map(move |(id, node)| match &node.kind {
            NodeKind::Module(m) if m.operator == operator && node.is_instance() => Some(id),
            _ => None,
        })
    }

    /// Whether some operator inside `id`'s subtree is still referenced by an
    /// alias living outside that subtree
    pub fn is_referenced_outside(&self, id: NodeId) -> bool {
        let subtree = self.subtree(id);
        subtree.iter().any(|member| {
            matches!(self.get(*member).map(|n| &n.kind), Some(NodeKind::Operator(_)))
                && self
                    .references_to(*member)
                    .any(|alias| !subtree.contains(&alias))
        })
    }
}

fn accepts_children(kind: &NodeKind) -> bool {
    matches!(kind, NodeKind::Container(_) | NodeKind::Operator(_))
}

/// Module name of the operator with the given uid
pub fn module_name(uid: u64) -> String {
    format!("mod{}", uid)
}
