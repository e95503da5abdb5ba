//! Interactive shell for driving the editor with typed gestures

use anyhow::Result;
use asmcad_engine::{Control, Editor, InputEvent, Settings, outline};
use asmcad_scene::{Button, IVec2};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{CompletionType, Config, EditMode};
use std::path::PathBuf;

type LineEditor = rustyline::Editor<(), DefaultHistory>;

/// Shell state
pub struct Shell {
    editor: Editor,
    lines: LineEditor,
    history_path: Option<PathBuf>,
}

impl Shell {
    pub fn new(settings: &Settings) -> Result<Self> {
        let config = Config::builder()
            .history_ignore_space(true)
            .completion_type(CompletionType::List)
            .edit_mode(EditMode::Emacs)
            .build();

        let mut lines = LineEditor::with_config(config)?;

        let history_path = history_path();
        if let Some(ref path) = history_path {
            let _ = lines.load_history(path);
        }

        Ok(Self {
            editor: Editor::from_settings(settings),
            lines,
            history_path,
        })
    }

    /// Run the shell loop
    pub fn run(&mut self) -> Result<()> {
        println!("{}", WELCOME_MESSAGE);

        loop {
            match self.lines.readline("asm> ") {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    let _ = self.lines.add_history_entry(trimmed);

                    match self.handle_command(trimmed) {
                        CommandResult::Continue => {}
                        CommandResult::Exit => break,
                        CommandResult::Error(e) => eprintln!("Error: {}", e),
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("Use :quit or Ctrl+D to exit");
                }
                Err(ReadlineError::Eof) => {
                    println!("\nGoodbye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        if let Some(ref path) = self.history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = self.lines.save_history(path);
        }

        Ok(())
    }

    fn handle_command(&mut self, cmd: &str) -> CommandResult {
        let mut parts = cmd.split_whitespace();
        let command = parts.next().unwrap_or_default();
        let args: Vec<&str> = parts.collect();

        let event = match command {
            ":help" | ":h" | ":?" => {
                println!("{}", HELP_MESSAGE);
                return CommandResult::Continue;
            }
            ":quit" | ":q" | ":exit" => return CommandResult::Exit,
            ":down" => point_and_button(&args).map(|(p, button)| InputEvent::PointerDown {
                x: p.x,
                y: p.y,
                button,
            }),
            ":move" => point(&args).map(|p| InputEvent::PointerMove { x: p.x, y: p.y }),
            ":up" => point(&args).map(|p| InputEvent::PointerUp { x: p.x, y: p.y }),
            ":wheel" => match args.as_slice() {
                [x, y, delta] => parse_ints([x, y, delta]).map(|[x, y, delta]| {
                    InputEvent::Wheel { x, y, delta }
                }),
                _ => Err("Usage: :wheel <x> <y> <delta>".to_string()),
            },
            ":resize" => match args.as_slice() {
                [w, h] => parse_ints([w, h]).map(|[width, height]| InputEvent::Resize {
                    width,
                    height,
                }),
                _ => Err("Usage: :resize <width> <height>".to_string()),
            },
            ":drag" => {
                return match args.as_slice() {
                    [x1, y1, x2, y2] => match parse_ints([x1, y1, x2, y2]) {
                        Ok([x1, y1, x2, y2]) => self.run_gesture(|editor| {
                            editor.drag(IVec2::new(x1, y1), IVec2::new(x2, y2))
                        }),
                        Err(e) => CommandResult::Error(e),
                    },
                    _ => CommandResult::Error("Usage: :drag <x1> <y1> <x2> <y2>".to_string()),
                };
            }
            ":click" => {
                return match point_and_button(&args) {
                    Ok((p, button)) => self.run_gesture(|editor| editor.click(p, button)),
                    Err(e) => CommandResult::Error(e),
                };
            }
            ":tree" => {
                print!(
                    "{}",
                    outline(self.editor.scene(), self.editor.workbench().root)
                );
                return CommandResult::Continue;
            }
            ":scad" => {
                print!("{}", self.editor.generate(self.editor.workbench().canvas));
                return CommandResult::Continue;
            }
            ":write" => {
                return match self.editor.generate_all() {
                    Ok(_) => {
                        println!("Wrote {}", self.editor.output().display());
                        CommandResult::Continue
                    }
                    Err(e) => CommandResult::Error(format!("{:#}", e)),
                };
            }
            ":frame" => {
                for command in self.editor.frame() {
                    println!("{:?}", command);
                }
                return CommandResult::Continue;
            }
            _ => {
                return CommandResult::Error(format!(
                    "Unknown command: {}. Type :help for available commands.",
                    command
                ));
            }
        };

        match event {
            Ok(event) => match self.editor.handle(event) {
                Ok(Control::Continue) => {
                    self.report();
                    CommandResult::Continue
                }
                Ok(Control::Quit) => CommandResult::Exit,
                Err(e) => CommandResult::Error(format!("{:#}", e)),
            },
            Err(e) => CommandResult::Error(e),
        }
    }

    fn run_gesture(&mut self, gesture: impl FnOnce(&mut Editor) -> Result<()>) -> CommandResult {
        match gesture(&mut self.editor) {
            Ok(()) => {
                self.report();
                CommandResult::Continue
            }
            Err(e) => CommandResult::Error(format!("{:#}", e)),
        }
    }

    fn report(&self) {
        println!("gesture: {:?}", self.editor.gesture());
        if let Some(focus) = self.editor.focus()
            && let Some(field) = self.editor.scene().field(focus)
        {
            println!("focus: {} field {} = {}", focus.node, focus.field, field.text());
        }
    }
}

/// Result of handling a command
enum CommandResult {
    Continue,
    Exit,
    Error(String),
}

fn parse_ints<const N: usize>(args: [&&str; N]) -> Result<[i32; N], String> {
    let mut out = [0; N];
    for (slot, arg) in out.iter_mut().zip(args) {
        *slot = arg
            .parse()
            .map_err(|_| format!("Not an integer: {}", arg))?;
    }
    Ok(out)
}

fn point(args: &[&str]) -> Result<IVec2, String> {
    match args {
        [x, y] => parse_ints([x, y]).map(|[x, y]| IVec2::new(x, y)),
        _ => Err("Expected <x> <y>".to_string()),
    }
}

fn point_and_button(args: &[&str]) -> Result<(IVec2, Button), String> {
    let (coords, button) = match args {
        [x, y] => ([*x, *y], Button::Left),
        [x, y, "left"] => ([*x, *y], Button::Left),
        [x, y, "right"] => ([*x, *y], Button::Right),
        _ => return Err("Expected <x> <y> [left|right]".to_string()),
    };
    Ok((point(&coords)?, button))
}

/// Get the history file path
fn history_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("asmcad").join("shell_history"))
}

const WELCOME_MESSAGE: &str = r#"
ASM CAD shell. Drive the editor with pointer gestures.
Type :help for commands, :tree to see where everything is.
"#;

const HELP_MESSAGE: &str = r#"
Commands:
  :help, :h, :?            - Show this help message
  :quit, :q, :exit         - Exit the shell
  :down <x> <y> [button]   - Press a button (left by default)
  :move <x> <y>            - Move the pointer
  :up <x> <y>              - Release the button
  :drag <x1> <y1> <x2> <y2> - Press, drag and release in one go
  :click <x> <y> [button]  - Click an input field (right for fine steps)
  :wheel <x> <y> <delta>   - Turn the wheel
  :resize <w> <h>          - Resize the window
  :tree                    - Show the laid-out tree
  :scad                    - Print the program for the canvas
  :write                   - Write the canvas program to the output file
  :frame                   - Print the draw commands of one frame
"#;

/// Entry point for the shell command
pub fn run_shell(settings: &Settings) -> Result<()> {
    let mut shell = Shell::new(settings)?;
    shell.run()
}
