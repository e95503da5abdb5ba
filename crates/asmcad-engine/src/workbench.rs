//! The editor window: palette bar on top, canvas and module gallery below
//!
//! ```text
//! +--------------------------------------------------------------+
//! | delete | union diff isect | cube cyl sphere | move turn | view|
//! +----------------------------------------------+---------------+
//! | canvas (scrolls)                             | gallery       |
//! |                                              | (scrolls)     |
//! +----------------------------------------------+---------------+
//! ```

use asmcad_scene::{
    BooleanOp, DropPolicy, ImageCache, Layout, ModifierKind, NodeId, NodeKind, Scene, ShapeKind,
    SinkKind,
};

use crate::settings::Settings;

/// Ids of the fixed containers of the window
#[derive(Debug, Clone)]
pub struct Workbench {
    pub root: NodeId,
    pub top_bar: NodeId,
    pub workspace: NodeId,
    pub canvas: NodeId,
    pub gallery: NodeId,
    /// Palette templates and sinks, left to right
    pub palette: Vec<NodeId>,
    gallery_width: i32,
}

impl Workbench {
    /// Populate `scene` with the window tree and lay it out for the window
    /// size in `settings`
    pub fn build(scene: &mut Scene, images: &mut ImageCache, settings: &Settings) -> Self {
        let root = scene.add_template(
            NodeKind::container(Layout::vertical(None, None), DropPolicy::DisplayOnly),
            None,
        );
        let top_bar = scene.add_template(
            NodeKind::container(Layout::flow(None), DropPolicy::DisplayOnly),
            None,
        );

        let mut palette = Vec::new();
        palette.push(scene.add_template(
            NodeKind::sink(SinkKind::Delete),
            images.get(SinkKind::Delete.image_name()),
        ));
        for op in BooleanOp::ALL {
            palette.push(scene.add_template(NodeKind::operator(op), images.get(op.image_name())));
        }
        for shape in ShapeKind::ALL {
            palette.push(
                scene.add_template(NodeKind::shape(shape), images.get(shape.image_name())),
            );
        }
        for modifier in ModifierKind::ALL {
            palette.push(scene.add_template(
                NodeKind::modifier(modifier),
                images.get(modifier.image_name()),
            ));
        }
        palette.push(scene.add_template(
            NodeKind::sink(SinkKind::View),
            images.get(SinkKind::View.image_name()),
        ));
        for &item in &palette {
            scene.push_child(top_bar, item);
        }

        let workspace = scene.add_template(
            NodeKind::container(Layout::flow(None), DropPolicy::DisplayOnly),
            None,
        );
        let canvas = scene.add_template(
            NodeKind::container(Layout::vertical(None, None), DropPolicy::Structural),
            None,
        );
        let gallery = scene.add_template(
            NodeKind::container(Layout::vertical(None, None), DropPolicy::Modules),
            None,
        );
        scene.push_child(workspace, canvas);
        scene.push_child(workspace, gallery);

        scene.push_child(root, top_bar);
        scene.push_child(root, workspace);
        scene.set_root(root);

        let bench = Self {
            root,
            top_bar,
            workspace,
            canvas,
            gallery,
            palette,
            gallery_width: settings.gallery_width,
        };
        bench.resize(scene, settings.window_width, settings.window_height);
        bench
    }

    /// Fit the window tree to a new window size and lay everything out
    pub fn resize(&self, scene: &mut Scene, width: i32, height: i32) {
        let width = width.max(0);
        let height = height.max(0);

        set_extent(scene, self.root, width, Some(height));
        set_extent(scene, self.top_bar, width, None);
        set_extent(scene, self.workspace, width, None);
        scene.layout();

        // The bar wraps on narrow windows, so its height is only known now
        let bar = scene.bounds(self.top_bar).map_or(0, |b| b.size.y);
        let viewport = (height - bar).max(0);
        let gallery = self.gallery_width.min(width);
        set_extent(scene, self.canvas, width - gallery, Some(viewport));
        set_extent(scene, self.gallery, gallery, Some(viewport));
        scene.layout();

        tracing::debug!(
            "Workbench resized to {}x{} (viewport {})",
            width,
            height,
            viewport
        );
    }
}

fn set_extent(scene: &mut Scene, id: NodeId, new_width: i32, new_viewport: Option<i32>) {
    let Some(NodeKind::Container(c)) = scene.get_mut(id).map(|n| &mut n.kind) else {
        return;
    };
    match &mut c.layout {
        Layout::Flow { width } => *width = Some(new_width),
        Layout::Vertical {
            width, viewport, ..
        } => {
            *width = Some(new_width);
            if new_viewport.is_some() {
                *viewport = new_viewport;
            }
        }
    }
}
