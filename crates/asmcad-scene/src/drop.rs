//! Drop protocol
//!
//! `dropped` walks down from the root to the deepest target under the
//! release point. Children get the first chance; a container only keeps the
//! object itself when its policy allows it.

use std::collections::HashSet;

use glam::IVec2;

use crate::interact::Taken;
use crate::node::{DropPolicy, NodeId, NodeKind, SinkKind};
use crate::scene::{Scene, Slot};

/// Result of dropping an object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// Nobody took the object; the caller decides where it goes
    Rejected,
    /// Inserted into the given container or operator
    Placed(NodeId),
    /// Released over the delete sink; the caller destroys it
    Delete,
    /// Released over the view sink; the caller generates its text
    View,
}

impl DropOutcome {
    pub fn is_accepted(&self) -> bool {
        !matches!(self, DropOutcome::Rejected)
    }
}

impl Scene {
    /// Drop a detached instance at `p`
    pub fn drop_at(&mut self, p: IVec2, object: NodeId) -> DropOutcome {
        let Some(root) = self.root() else {
            return DropOutcome::Rejected;
        };
        if !self.get(object).is_some_and(|n| n.is_instance()) {
            return DropOutcome::Rejected;
        }

        let outcome = self.dropped(root, p, object);
        tracing::debug!("Dropped {} at ({}, {}): {:?}", object, p.x, p.y, outcome);
        outcome
    }

    fn dropped(&mut self, target: NodeId, p: IVec2, object: NodeId) -> DropOutcome {
        let Some(node) = self.get(target) else {
            return DropOutcome::Rejected;
        };
        if !node.bounds.contains(p) {
            return DropOutcome::Rejected;
        }

        match &node.kind {
            NodeKind::Container(c) => {
                let policy = c.policy;
                let children = c.children.clone();
                if let Some(outcome) = self.delegate(target, p, object, &children) {
                    return outcome;
                }
                match policy {
                    DropPolicy::DisplayOnly => DropOutcome::Rejected,
                    DropPolicy::Structural => self.place(target, object),
                    DropPolicy::Modules => self.publish(target, object),
                }
            }
            NodeKind::Operator(o) => {
                // Palette originals are inert
                if node.is_template() {
                    return DropOutcome::Rejected;
                }
                let operands = o.operands.clone();
                if let Some(outcome) = self.delegate(target, p, object, &operands) {
                    return outcome;
                }
                self.place(target, object)
            }
            NodeKind::Sink(SinkKind::Delete) => {
                if self.is_referenced_outside(object) {
                    tracing::debug!("{} is still referenced; not deleting", object);
                    DropOutcome::Rejected
                } else {
                    DropOutcome::Delete
                }
            }
            NodeKind::Sink(SinkKind::View) => DropOutcome::View,
            NodeKind::Shape(_) | NodeKind::Modifier(_) | NodeKind::Module(_) => {
                DropOutcome::Rejected
            }
        }
    }

    /// Offer the object to the children under `p`, in order
    fn delegate(
        &mut self,
        target: NodeId,
        p: IVec2,
        object: NodeId,
        children: &[NodeId],
    ) -> Option<DropOutcome> {
        for &child in children {
            if !self.bounds(child).is_some_and(|b| b.contains(p)) {
                continue;
            }
            let outcome = self.dropped(child, p, object);
            if outcome.is_accepted() {
                self.relayout(target);
                return Some(outcome);
            }
        }
        None
    }

    /// Append `object` to `target`
    fn place(&mut self, target: NodeId, object: NodeId) -> DropOutcome {
        if self.children_of(target).contains(&object) {
            return DropOutcome::Placed(target);
        }
        if self.would_recurse(target, object) {
            tracing::debug!("{} would make a module call itself inside {}", object, target);
            return DropOutcome::Rejected;
        }
        if !self.push_child(target, object) {
            return DropOutcome::Rejected;
        }
        self.relayout(target);
        DropOutcome::Placed(target)
    }

    /// Module gallery: only operator instances, which get their module
    fn publish(&mut self, gallery: NodeId, object: NodeId) -> DropOutcome {
        if !matches!(self.get(object).map(|n| &n.kind), Some(NodeKind::Operator(_))) {
            return DropOutcome::Rejected;
        }
        if self.get_module(object).is_none() {
            return DropOutcome::Rejected;
        }
        self.place(gallery, object)
    }

    /// Whether placing `object` under `target` would make some module
    /// (directly or through other modules) call itself
    pub fn would_recurse(&self, target: NodeId, object: NodeId) -> bool {
        let mut enclosing = vec![target];
        let mut current = self.parent_of(target);
        while let Some(p) = current {
            enclosing.push(p);
            current = self.parent_of(p);
        }

        let mut visited = HashSet::new();
        let mut pending = vec![object];
        while let Some(root) = pending.pop() {
            for id in self.subtree(root) {
                let Some(NodeKind::Module(alias)) = self.get(id).map(|n| &n.kind) else {
                    continue;
                };
                if enclosing.contains(&alias.operator) {
                    return true;
                }
                if visited.insert(alias.operator) {
                    pending.push(alias.operator);
                }
            }
        }
        false
    }

    /// Get rid of an object released over the delete sink.
    ///
    /// A fresh reference lifted off a module's canonical alias withdraws that
    /// module instead (see [`Scene::unpublish`]). Returns whether a module
    /// was withdrawn.
    pub fn discard(&mut self, taken: Taken) -> bool {
        let withdrawn = match self.get(taken.node).map(|n| &n.kind) {
            Some(NodeKind::Module(m)) if taken.origin.is_none() => Some(m.operator),
            _ => None,
        };
        self.destroy(taken.node);
        withdrawn.is_some_and(|operator| self.unpublish(operator))
    }

    /// Put a rejected object back where it was taken from. A fresh clone has
    /// nowhere to go and is destroyed. Returns whether it was reinserted.
    pub fn return_to(&mut self, object: NodeId, origin: Option<Slot>) -> bool {
        let restored = origin
            .filter(|slot| self.contains(slot.container))
            .is_some_and(|slot| self.attach(slot.container, object, slot.index));
        if restored {
            self.layout();
        } else {
            self.destroy(object);
        }
        restored
    }
}
