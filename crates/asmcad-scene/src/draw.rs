//! Draw pass
//!
//! The scene does not render anything itself. It walks the tree and issues
//! commands to a [`Canvas`] supplied by the host toolkit.

use glam::IVec2;

use crate::geometry::Rect;
use crate::interact::Focus;
use crate::node::{Layout, NodeId, NodeKind};
use crate::picture::Picture;
use crate::scene::Scene;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Render collaborator
pub trait Canvas {
    /// Blit a picture stretched over `at`
    fn draw_image(&mut self, picture: &Picture, at: Rect);

    /// Draw a one pixel outline
    fn draw_outline(&mut self, at: Rect, color: Color);

    /// Print text with its upper-left corner at `at`. Returns the printed
    /// width in pixels, or `None` if text could not be rendered.
    fn draw_text(&mut self, text: &str, at: IVec2, color: Color) -> Option<i32>;
}

/// Recorded draw command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawCommand {
    Image { name: String, at: Rect },
    Outline { at: Rect, color: Color },
    Text { text: String, at: IVec2, color: Color },
}

/// A canvas that records commands instead of drawing them
#[derive(Debug, Clone, Default)]
pub struct CommandList {
    pub commands: Vec<DrawCommand>,
    /// Width of one glyph used to report text widths
    pub glyph_width: i32,
}

impl CommandList {
    pub fn new(glyph_width: i32) -> Self {
        Self {
            commands: Vec::new(),
            glyph_width,
        }
    }
}

impl Canvas for CommandList {
    fn draw_image(&mut self, picture: &Picture, at: Rect) {
        self.commands.push(DrawCommand::Image {
            name: picture.name.clone(),
            at,
        });
    }

    fn draw_outline(&mut self, at: Rect, color: Color) {
        self.commands.push(DrawCommand::Outline { at, color });
    }

    fn draw_text(&mut self, text: &str, at: IVec2, color: Color) -> Option<i32> {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            at,
            color,
        });
        Some(self.glyph_width * text.chars().count() as i32)
    }
}

impl Scene {
    /// Draw the tree, then `held` (the object being dragged) on top
    pub fn draw(&self, canvas: &mut dyn Canvas, held: Option<NodeId>) {
        if let Some(root) = self.root() {
            self.draw_node(root, canvas, None);
        }
        if let Some(held) = held {
            self.draw_node(held, canvas, None);
        }
    }

    /// Draw one node. `clip` is the viewport of the nearest scrolling
    /// ancestor; nodes entirely outside it are skipped.
    pub fn draw_node(&self, id: NodeId, canvas: &mut dyn Canvas, clip: Option<Rect>) {
        let Some(node) = self.get(id) else {
            return;
        };
        if clip.is_some_and(|c| !c.intersects(&node.bounds)) {
            return;
        }

        match &node.kind {
            NodeKind::Container(c) => {
                let clip = match c.layout {
                    Layout::Vertical {
                        viewport: Some(_), ..
                    } => Some(node.bounds),
                    _ => clip,
                };
                for &child in &c.children {
                    self.draw_node(child, canvas, clip);
                }
                if node.dragged_over {
                    canvas.draw_outline(node.bounds, Color::RED);
                }
            }
            NodeKind::Operator(o) => {
                let item = self.metrics().item_size();
                if let Some(image) = &node.image {
                    canvas.draw_image(image, Rect::from_origin_size(node.bounds.origin, item));
                }
                if let Some(module) = o.module {
                    self.draw_node(module, canvas, clip);
                }
                for &operand in &o.operands {
                    self.draw_node(operand, canvas, clip);
                }
                let color = if node.dragged_over {
                    Color::RED
                } else {
                    Color::WHITE
                };
                canvas.draw_outline(node.bounds, color);
            }
            NodeKind::Module(m) => {
                if let Some(image) = &node.image {
                    canvas.draw_image(image, node.bounds);
                }
                canvas.draw_text(&m.label, node.bounds.origin, Color::WHITE);
            }
            NodeKind::Shape(_) | NodeKind::Modifier(_) => {
                if let Some(image) = &node.image {
                    canvas.draw_image(image, node.bounds);
                }
                if let Some(params) = node.kind.params() {
                    for field in params.fields().iter().filter(|f| f.enabled) {
                        canvas.draw_text(&field.text(), field.bounds.origin, Color::WHITE);
                    }
                }
            }
            NodeKind::Sink(_) => {
                if let Some(image) = &node.image {
                    canvas.draw_image(image, node.bounds);
                }
                if node.dragged_over {
                    canvas.draw_outline(node.bounds, Color::RED);
                }
            }
        }
    }

    /// Outline the focused field
    pub fn draw_focus(&self, canvas: &mut dyn Canvas, focus: Focus) {
        if let Some(field) = self.field(focus).filter(|f| f.enabled) {
            canvas.draw_outline(field.bounds, Color::YELLOW);
        }
    }
}
