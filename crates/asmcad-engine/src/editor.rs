//! Gesture state machine and the glue between input, scene and output

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use asmcad_scad::ScadGenerator;
use asmcad_scene::{
    Button, Canvas, CommandList, DrawCommand, DropOutcome, FileImageSource, Focus, IVec2,
    ImageCache, NodeId, Scene, Taken,
};

use crate::artifact::write_artifact;
use crate::event::InputEvent;
use crate::settings::Settings;
use crate::workbench::Workbench;

/// Width of one glyph when frames are recorded headless
const GLYPH_WIDTH: i32 = 8;

/// Whether the host should keep feeding events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// Where the current pointer gesture is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    Idle,
    /// Button down, no motion yet
    Pressed { at: IVec2, button: Button },
    /// Dragging an object
    Holding(Taken),
    /// Dragging, but nothing was picked up
    Inert,
}

/// A headless editor: the scene, the window tree and the pointer state
pub struct Editor {
    scene: Scene,
    workbench: Workbench,
    gesture: Gesture,
    focus: Option<Focus>,
    output: PathBuf,
    last_program: Option<String>,
}

impl Editor {
    /// Build the workbench with pictures from `images`
    pub fn new(settings: &Settings, mut images: ImageCache) -> Self {
        let mut scene = Scene::new(settings.metrics());
        let workbench = Workbench::build(&mut scene, &mut images, settings);
        Self {
            scene,
            workbench,
            gesture: Gesture::Idle,
            focus: None,
            output: settings.output.clone(),
            last_program: None,
        }
    }

    /// Build the workbench with pictures from the configured asset directory
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings,
            ImageCache::new(FileImageSource::new(&settings.asset_dir)),
        )
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn workbench(&self) -> &Workbench {
        &self.workbench
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    pub fn focus(&self) -> Option<Focus> {
        self.focus
    }

    /// The object currently following the pointer
    pub fn held(&self) -> Option<NodeId> {
        match self.gesture {
            Gesture::Holding(taken) => Some(taken.node),
            _ => None,
        }
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn set_output(&mut self, output: impl Into<PathBuf>) {
        self.output = output.into();
    }

    /// The program most recently written
    pub fn last_program(&self) -> Option<&str> {
        self.last_program.as_deref()
    }

    // ========================================================================
    // Events
    // ========================================================================

    /// Dispatch one input event to completion
    pub fn handle(&mut self, event: InputEvent) -> Result<Control> {
        match event {
            InputEvent::PointerDown { x, y, button } => {
                if self.gesture == Gesture::Idle {
                    self.gesture = Gesture::Pressed {
                        at: IVec2::new(x, y),
                        button,
                    };
                }
            }
            InputEvent::PointerMove { x, y } => self.pointer_moved(IVec2::new(x, y)),
            InputEvent::PointerUp { x, y } => self.pointer_released(IVec2::new(x, y))?,
            InputEvent::Wheel { x, y, delta } => self.wheel(IVec2::new(x, y), delta),
            InputEvent::Resize { width, height } => {
                self.workbench.resize(&mut self.scene, width, height);
            }
            InputEvent::Quit => return Ok(Control::Quit),
        }
        Ok(Control::Continue)
    }

    /// Feed events until one of them asks to quit. Returns how many were
    /// handled.
    pub fn replay(&mut self, events: impl IntoIterator<Item = InputEvent>) -> Result<usize> {
        let mut handled = 0;
        for event in events {
            handled += 1;
            if self.handle(event)? == Control::Quit {
                break;
            }
        }
        Ok(handled)
    }

    fn pointer_moved(&mut self, p: IVec2) {
        match self.gesture {
            Gesture::Pressed {
                button: Button::Left,
                ..
            } => {
                self.gesture = match self.scene.take(p) {
                    Some(taken) => {
                        tracing::debug!("Holding {}", taken.node);
                        self.follow(taken.node, p);
                        Gesture::Holding(taken)
                    }
                    None => Gesture::Inert,
                };
            }
            // Only the left button drags
            Gesture::Pressed { .. } => self.gesture = Gesture::Inert,
            Gesture::Holding(taken) => self.follow(taken.node, p),
            Gesture::Idle | Gesture::Inert => {}
        }
    }

    fn follow(&mut self, node: NodeId, p: IVec2) {
        self.scene.move_detached(node, p);
        self.scene.drag_over(p);
    }

    fn pointer_released(&mut self, p: IVec2) -> Result<()> {
        let gesture = std::mem::replace(&mut self.gesture, Gesture::Idle);
        match gesture {
            Gesture::Pressed { at, button } => {
                self.focus = self.scene.click(at, button);
                Ok(())
            }
            Gesture::Holding(taken) => {
                self.scene.clear_drag_over();
                self.release(taken, p)
            }
            Gesture::Idle | Gesture::Inert => Ok(()),
        }
    }

    fn release(&mut self, taken: Taken, p: IVec2) -> Result<()> {
        match self.scene.drop_at(p, taken.node) {
            DropOutcome::Placed(_) => Ok(()),
            DropOutcome::Rejected => {
                self.scene.return_to(taken.node, taken.origin);
                Ok(())
            }
            DropOutcome::Delete => {
                self.scene.discard(taken);
                if self.focus.is_some_and(|f| !self.scene.contains(f.node)) {
                    self.focus = None;
                }
                Ok(())
            }
            DropOutcome::View => {
                let program = self.generate(taken.node);
                self.scene.return_to(taken.node, taken.origin);
                self.write(program)
            }
        }
    }

    fn wheel(&mut self, p: IVec2, delta: i32) {
        if let Some(focus) = self.focus {
            if self.scene.scroll_field(focus, delta) {
                return;
            }
            self.focus = None;
        }
        self.scene.scroll_at(p, delta);
    }

    // ========================================================================
    // Gestures
    // ========================================================================

    /// Press at `from`, drag to `to` and release
    pub fn drag(&mut self, from: IVec2, to: IVec2) -> Result<()> {
        self.handle(InputEvent::PointerDown {
            x: from.x,
            y: from.y,
            button: Button::Left,
        })?;
        self.handle(InputEvent::PointerMove {
            x: from.x,
            y: from.y,
        })?;
        self.handle(InputEvent::PointerMove { x: to.x, y: to.y })?;
        self.handle(InputEvent::PointerUp { x: to.x, y: to.y })?;
        Ok(())
    }

    /// Press and release at `at` without moving
    pub fn click(&mut self, at: IVec2, button: Button) -> Result<()> {
        self.handle(InputEvent::PointerDown {
            x: at.x,
            y: at.y,
            button,
        })?;
        self.handle(InputEvent::PointerUp { x: at.x, y: at.y })?;
        Ok(())
    }

    // ========================================================================
    // Output
    // ========================================================================

    /// OpenSCAD program for one node and what it owns
    pub fn generate(&self, id: NodeId) -> String {
        ScadGenerator::new().generate(&self.scene, id)
    }

    /// Generate the whole canvas and write it to the output path
    pub fn generate_all(&mut self) -> Result<String> {
        let program = self.generate(self.workbench.canvas);
        self.write(program.clone())?;
        Ok(program)
    }

    fn write(&mut self, program: String) -> Result<()> {
        write_artifact(&self.output, &program)
            .with_context(|| format!("Failed to write program to {}", self.output.display()))?;
        self.last_program = Some(program);
        Ok(())
    }

    // ========================================================================
    // Drawing
    // ========================================================================

    /// Draw the window, the held object and the focus outline
    pub fn draw(&self, canvas: &mut dyn Canvas) {
        self.scene.draw(canvas, self.held());
        if let Some(focus) = self.focus {
            self.scene.draw_focus(canvas, focus);
        }
    }

    /// Record one frame headless
    pub fn frame(&self) -> Vec<DrawCommand> {
        let mut list = CommandList::new(GLYPH_WIDTH);
        self.draw(&mut list);
        list.commands
    }
}
