//! ASM CAD CLI - Headless driver for the block editor

mod shell;

use anyhow::{Context, Result};
use asmcad_engine::{Editor, Settings, load_settings, outline, parse_events};
use asmcad_scene::{IVec2, NodeId, Rect};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "asmcad")]
#[command(about = "Build OpenSCAD programs by dragging blocks", long_about = None)]
#[command(version)]
struct Cli {
    /// Where the generated program is written (overrides settings)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Window width (overrides settings)
    #[arg(long, global = true)]
    width: Option<i32>,

    /// Window height (overrides settings)
    #[arg(long, global = true)]
    height: Option<i32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Feed a recorded event script through a headless editor
    Replay {
        /// Event script, one JSON event per line
        events: PathBuf,

        /// Print the tree after the last event
        #[arg(long)]
        tree: bool,
    },

    /// Interactive shell issuing pointer gestures
    Shell,

    /// Print the laid-out workbench
    Layout,

    /// Build a union of two cubes by dragging and write it
    Demo,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let mut settings = load_settings();
    if let Some(output) = cli.output {
        settings.output = output;
    }
    if let Some(width) = cli.width {
        settings.window_width = width;
    }
    if let Some(height) = cli.height {
        settings.window_height = height;
    }
    debug!(
        "Window {}x{}, writing to {}",
        settings.window_width,
        settings.window_height,
        settings.output.display()
    );

    match cli.command {
        Commands::Replay { events, tree } => {
            run_replay(&settings, &events, tree)?;
        }
        Commands::Shell => {
            shell::run_shell(&settings)?;
        }
        Commands::Layout => {
            let editor = Editor::from_settings(&settings);
            print!("{}", outline(editor.scene(), editor.workbench().root));
        }
        Commands::Demo => {
            run_demo(&settings)?;
        }
    }

    Ok(())
}

fn run_replay(settings: &Settings, events: &Path, tree: bool) -> Result<()> {
    let script = std::fs::read_to_string(events)
        .with_context(|| format!("Failed to read event script {}", events.display()))?;
    let path = events;
    let events = parse_events(&script)?;
    info!("Replaying {} events from {}", events.len(), path.display());

    let mut editor = Editor::from_settings(settings);
    let handled = editor.replay(events)?;
    println!("Handled {} events", handled);

    if tree {
        print!("{}", outline(editor.scene(), editor.workbench().root));
    }
    match editor.last_program() {
        Some(program) => {
            println!("Wrote {}:", editor.output().display());
            print!("{}", program);
        }
        None => println!("Nothing was dropped on the view sink"),
    }

    Ok(())
}

fn run_demo(settings: &Settings) -> Result<()> {
    println!("Building demo assembly...");

    let mut editor = Editor::from_settings(settings);
    let bench = editor.workbench().clone();
    let union_template = bench.palette[1];
    let cube_template = bench.palette[4];
    let view = bench.palette[9];

    let canvas = bounds(&editor, bench.canvas)?;
    let free = IVec2::new(canvas.right() - 1, canvas.bottom() - 1);

    editor.drag(grip(&editor, union_template)?, free)?;
    let union = *editor
        .scene()
        .children_of(bench.canvas)
        .last()
        .context("Union was not placed on the canvas")?;

    for _ in 0..2 {
        editor.drag(grip(&editor, cube_template)?, grip(&editor, union)?)?;
    }
    let cubes = editor.scene().children_of(union).to_vec();

    // A plate with a post standing on it
    for (cube, values) in cubes.iter().zip([[40.0, 40.0, 5.0], [10.0, 10.0, 30.0]]) {
        for (field, value) in values.into_iter().enumerate() {
            set_field(&mut editor, *cube, field, value)?;
        }
    }

    info!("Dropping the union of {} cubes on the view sink", cubes.len());
    editor.drag(grip(&editor, union)?, grip(&editor, view)?)?;

    let program = editor
        .last_program()
        .context("The view sink did not produce a program")?;
    print!("{}", program);
    println!("Exported to: {}", editor.output().display());

    Ok(())
}

fn bounds(editor: &Editor, id: NodeId) -> Result<Rect> {
    editor
        .scene()
        .bounds(id)
        .with_context(|| format!("Node {} is gone", id))
}

/// A point on the block's icon, above its input fields
fn grip(editor: &Editor, id: NodeId) -> Result<IVec2> {
    let b = bounds(editor, id)?;
    Ok(b.origin + IVec2::new(b.size.x.min(editor.scene().metrics().item_width) / 2, b.size.y / 5))
}

/// Click a field with the coarse step and turn the wheel to `value`
fn set_field(editor: &mut Editor, id: NodeId, field: usize, value: f64) -> Result<()> {
    let (at, current) = {
        let f = editor
            .scene()
            .get(id)
            .and_then(|n| n.kind.params())
            .and_then(|p| p.field(field))
            .with_context(|| format!("Node {} has no field {}", id, field))?;
        (f.bounds.origin + f.bounds.size / 2, f.value)
    };

    editor.click(at, asmcad_scene::Button::Left)?;
    editor.handle(asmcad_engine::InputEvent::Wheel {
        x: at.x,
        y: at.y,
        delta: (value - current).round() as i32,
    })?;
    Ok(())
}
