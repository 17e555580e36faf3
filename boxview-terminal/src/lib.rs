/// Terminal render surface for the box previewer
use boxview_core::{EditorSession, Field, PointerEvent, PreviewConfig, Viewport};
use crossterm::{
    cursor,
    event::{
        self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
        Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use image::DynamicImage;
use std::io::{self, stdout, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

pub mod projection;
pub mod renderer;
pub mod upload;

pub use projection::Camera;
pub use renderer::AsciiRenderer;
pub use upload::{decode_dieline, load_dieline, UploadError};

pub type TerminalSession = EditorSession<Arc<DynamicImage>>;

/// Translate a crossterm mouse event into a pointer sample
pub fn pointer_event(mouse: &MouseEvent) -> Option<PointerEvent> {
    let (x, y) = (f64::from(mouse.column), f64::from(mouse.row));
    match mouse.kind {
        MouseEventKind::Down(button) => Some(PointerEvent::Down {
            x,
            y,
            primary: button == MouseButton::Left,
        }),
        MouseEventKind::Drag(MouseButton::Left) => Some(PointerEvent::Move { x, y }),
        MouseEventKind::Up(MouseButton::Left) => Some(PointerEvent::Up),
        _ => None,
    }
}

/// Pending edit of one dimension field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldEdit {
    pub field: Field,
    pub buffer: String,
}

/// What a key press asks the app to do
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    None,
    Quit,
    ResetView,
    Export,
}

/// Dimension field editor driven by key presses
#[derive(Debug, Default)]
pub struct InputState {
    pub edit: Option<FieldEdit>,
}

impl InputState {
    /// Apply one key to the session. Returns the requested action and an
    /// optional status message.
    pub fn handle_key(
        &mut self,
        code: KeyCode,
        session: &mut TerminalSession,
    ) -> (Action, Option<String>) {
        if let Some(edit) = self.edit.as_mut() {
            match code {
                KeyCode::Char(c) if c.is_ascii_digit() || c == '.' => {
                    edit.buffer.push(c);
                    return (Action::None, None);
                }
                KeyCode::Backspace => {
                    edit.buffer.pop();
                    return (Action::None, None);
                }
                KeyCode::Esc => {
                    self.edit = None;
                    return (Action::None, Some("edit cancelled".to_string()));
                }
                KeyCode::Enter => {
                    let edit = self.edit.take();
                    return (Action::None, edit.map(|edit| commit(edit, session)));
                }
                // Global controls are suspended until the edit ends.
                _ => return (Action::None, None),
            }
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => (Action::Quit, None),
            KeyCode::Char('r') => (Action::ResetView, None),
            KeyCode::Char('x') => (Action::Export, None),
            KeyCode::Char(c @ ('w' | 'h' | 'd')) => {
                let field = match c {
                    'w' => Field::Width,
                    'h' => Field::Height,
                    _ => Field::Depth,
                };
                self.edit = Some(FieldEdit {
                    field,
                    buffer: String::new(),
                });
                (Action::None, None)
            }
            _ => (Action::None, None),
        }
    }

    pub fn prompt(&self) -> Option<String> {
        self.edit
            .as_ref()
            .map(|edit| format!("{} (mm): {}_", edit.field, edit.buffer))
    }
}

fn commit(edit: FieldEdit, session: &mut TerminalSession) -> String {
    let value: f64 = match edit.buffer.parse() {
        Ok(value) => value,
        Err(_) => return format!("{}: '{}' is not a number", edit.field, edit.buffer),
    };
    match session.set_field(edit.field, value) {
        Ok(dims) => format!(
            "box is now {} x {} x {} mm",
            dims.width(),
            dims.height(),
            dims.depth()
        ),
        Err(err) => err.to_string(),
    }
}

/// Main application struct for terminal box preview
pub struct TerminalApp {
    session: TerminalSession,
    camera: Camera,
    renderer: AsciiRenderer,
    input: InputState,
    fills: [Option<Color>; 6],
    fills_revision: Option<u64>,
    export_path: PathBuf,
    status: Option<String>,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(
        config: &PreviewConfig,
        dieline: Option<Arc<DynamicImage>>,
        export_path: PathBuf,
    ) -> io::Result<Self> {
        let (width, height) = terminal::size()?;

        let mut session = TerminalSession::new(
            config,
            Viewport::new(f64::from(width), f64::from(height)),
        );
        if let Some(image) = dieline {
            session.bind_image(image);
        }

        Ok(Self {
            session,
            camera: Camera::new(width, height),
            renderer: AsciiRenderer::new(width as usize, height as usize),
            input: InputState::default(),
            fills: [None; 6],
            fills_revision: None,
            export_path,
            status: None,
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            EnableFocusChange,
            cursor::Hide
        )?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(
            stdout(),
            DisableFocusChange,
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            // Handle input
            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            // Render
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) => {
                let (action, status) = self.input.handle_key(code, &mut self.session);
                if status.is_some() {
                    self.status = status;
                }
                match action {
                    Action::None => {}
                    Action::Quit => self.running = false,
                    Action::ResetView => self.session.reset_orientation(),
                    Action::Export => self.export(),
                }
            }
            Event::Mouse(mouse) => {
                if let Some(pointer) = pointer_event(&mouse) {
                    self.session.handle_pointer(pointer);
                }
            }
            Event::FocusLost => {
                self.session.handle_pointer(PointerEvent::Leave);
            }
            Event::Resize(width, height) => {
                self.session
                    .set_viewport(Viewport::new(f64::from(width), f64::from(height)));
                self.camera.resize(width, height);
                self.renderer.resize(width as usize, height as usize);
            }
            _ => {}
        }
    }

    fn export(&mut self) {
        let result = self
            .session
            .export_json()
            .map_err(io::Error::from)
            .and_then(|json| std::fs::write(&self.export_path, json));
        self.status = Some(match result {
            Ok(()) => {
                info!(path = %self.export_path.display(), "dimensions exported");
                format!("exported to {}", self.export_path.display())
            }
            Err(err) => {
                warn!(%err, "export failed");
                format!("export failed: {err}")
            }
        });
    }

    /// Recompute dieline colours when the layout has changed
    fn refresh_fills(&mut self) {
        let revision = self.session.revision();
        if self.fills_revision == Some(revision) {
            return;
        }
        self.fills = match self.session.texture().image() {
            Some(image) => renderer::face_fills(image, &self.session.crops()),
            None => [None; 6],
        };
        self.fills_revision = Some(revision);
    }

    fn render(&mut self) -> io::Result<()> {
        self.refresh_fills();

        // Clear renderer
        self.renderer.clear();

        // Render the assembled box
        self.renderer
            .render_session(&self.session, &self.camera, &self.fills);

        // Output to terminal
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;

        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        let dims = self.session.dimensions();
        let orientation = self.session.orientation();
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "BoxView | {} x {} x {} mm | pitch {:.1} yaw {:.1} | FPS: {:.1} | Drag=Rotate W/H/D=Edit R=Reset X=Export Q=Quit",
                dims.width(),
                dims.height(),
                dims.depth(),
                orientation.pitch,
                orientation.yaw,
                self.fps
            )),
            ResetColor
        )?;

        let (_, rows) = terminal::size()?;
        if let Some(line) = self.input.prompt().or_else(|| self.status.clone()) {
            queue!(
                stdout,
                cursor::MoveTo(0, rows.saturating_sub(1)),
                terminal::Clear(ClearType::CurrentLine),
                SetForegroundColor(Color::Yellow),
                Print(line),
                ResetColor
            )?;
        }

        stdout.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn type_keys(input: &mut InputState, session: &mut TerminalSession, keys: &str) -> Option<String> {
        let mut status = None;
        for c in keys.chars() {
            let code = if c == '\n' {
                KeyCode::Enter
            } else {
                KeyCode::Char(c)
            };
            status = input.handle_key(code, session).1.or(status);
        }
        status
    }

    #[test]
    fn test_left_drag_maps_to_pointer_samples() {
        assert_eq!(
            pointer_event(&mouse(MouseEventKind::Down(MouseButton::Left), 3, 4)),
            Some(PointerEvent::Down {
                x: 3.0,
                y: 4.0,
                primary: true
            })
        );
        assert_eq!(
            pointer_event(&mouse(MouseEventKind::Drag(MouseButton::Left), 10, 2)),
            Some(PointerEvent::Move { x: 10.0, y: 2.0 })
        );
        assert_eq!(
            pointer_event(&mouse(MouseEventKind::Up(MouseButton::Left), 0, 0)),
            Some(PointerEvent::Up)
        );
        assert_eq!(pointer_event(&mouse(MouseEventKind::Moved, 1, 1)), None);
    }

    #[test]
    fn test_right_button_is_not_primary() {
        assert_eq!(
            pointer_event(&mouse(MouseEventKind::Down(MouseButton::Right), 0, 0)),
            Some(PointerEvent::Down {
                x: 0.0,
                y: 0.0,
                primary: false
            })
        );
    }

    #[test]
    fn test_field_edit_commits_through_session() {
        let mut session = TerminalSession::default();
        let mut input = InputState::default();
        let status = type_keys(&mut input, &mut session, "w42.5\n").unwrap();
        assert_eq!(session.dimensions().width(), 42.5);
        assert!(status.contains("42.5"));
        assert!(input.edit.is_none());
    }

    #[test]
    fn test_zero_is_rejected_and_state_kept() {
        let mut session = TerminalSession::default();
        let before = session.dimensions();
        let mut input = InputState::default();
        let status = type_keys(&mut input, &mut session, "d0\n").unwrap();
        assert_eq!(session.dimensions(), before);
        assert!(status.contains("depth"));
    }

    #[test]
    fn test_empty_edit_is_not_a_number() {
        let mut session = TerminalSession::default();
        let mut input = InputState::default();
        let status = type_keys(&mut input, &mut session, "h\n").unwrap();
        assert!(status.contains("not a number"));
        assert_eq!(session.revision(), 0);
    }

    #[test]
    fn test_prompt_and_cancel() {
        let mut session = TerminalSession::default();
        let mut input = InputState::default();
        type_keys(&mut input, &mut session, "h12");
        assert_eq!(input.prompt().as_deref(), Some("height (mm): 12_"));

        let (action, _) = input.handle_key(KeyCode::Esc, &mut session);
        assert_eq!(action, Action::None);
        assert!(input.edit.is_none());
    }

    #[test]
    fn test_control_keys_ignored_while_editing() {
        let mut session = TerminalSession::default();
        let mut input = InputState::default();
        type_keys(&mut input, &mut session, "w12");

        for key in ['q', 'r', 'x', 'h', 'd', 'w'] {
            let (action, status) = input.handle_key(KeyCode::Char(key), &mut session);
            assert_eq!(action, Action::None);
            assert!(status.is_none());
        }
        assert_eq!(
            input.edit,
            Some(FieldEdit {
                field: Field::Width,
                buffer: "12".to_string(),
            })
        );

        let status = type_keys(&mut input, &mut session, "\n").unwrap();
        assert_eq!(session.dimensions().width(), 12.0);
        assert!(status.contains("12"));
    }

    #[test]
    fn test_control_keys() {
        let mut session = TerminalSession::default();
        let mut input = InputState::default();
        assert_eq!(input.handle_key(KeyCode::Char('r'), &mut session).0, Action::ResetView);
        assert_eq!(input.handle_key(KeyCode::Char('x'), &mut session).0, Action::Export);
        assert_eq!(input.handle_key(KeyCode::Char('q'), &mut session).0, Action::Quit);
        assert_eq!(input.handle_key(KeyCode::Esc, &mut session).0, Action::Quit);
    }
}
