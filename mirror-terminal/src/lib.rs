/// Terminal viewer for the planar mirror scene
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use mirror_core::{Camera, Material, Scene};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use tracing::{info, warn};

pub mod renderer;

pub use renderer::AsciiRenderer;

/// Side length the model is scaled to before display
pub const MODEL_SIZE: f32 = 2.0;

const ROTATE_STEP: f32 = 0.1;

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    scene: Scene,
    material_name: String,
    renderer: AsciiRenderer,
    running: bool,
    target_frame_time: Duration,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
    status: String,
}

impl TerminalApp {
    pub fn new(mut scene: Scene, material_name: &str, target_fps: u32) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        // Terminal cells are roughly twice as tall as they are wide
        scene.camera.aspect = Camera::new(width as u32, height as u32 * 2).aspect;
        scene.fit_model(MODEL_SIZE);

        Ok(Self {
            scene,
            material_name: material_name.to_string(),
            renderer: AsciiRenderer::new(width as usize, height as usize),
            running: true,
            target_frame_time: Duration::from_millis(1000 / target_fps.max(1) as u64),
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
            status: String::new(),
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        while self.running {
            let frame_start = Instant::now();

            // Handle input
            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            self.update();
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < self.target_frame_time {
                std::thread::sleep(self.target_frame_time - elapsed);
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
            }) => self.handle_key(code),
            Event::Resize(width, height) => {
                self.renderer = AsciiRenderer::new(width as usize, height as usize);
                self.scene.camera.aspect = Camera::new(width as u32, height as u32 * 2).aspect;
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, code: KeyCode) {
        let rotation = &mut self.scene.rotation;
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('w') | KeyCode::Up => rotation.rotate(ROTATE_STEP, 0.0, 0.0),
            KeyCode::Char('s') | KeyCode::Down => rotation.rotate(-ROTATE_STEP, 0.0, 0.0),
            KeyCode::Char('a') | KeyCode::Left => rotation.rotate(0.0, -ROTATE_STEP, 0.0),
            KeyCode::Char('d') | KeyCode::Right => rotation.rotate(0.0, ROTATE_STEP, 0.0),
            KeyCode::Char('e') => rotation.rotate(0.0, 0.0, ROTATE_STEP),
            KeyCode::Char('r') => rotation.rotate(0.0, 0.0, -ROTATE_STEP),
            KeyCode::Char('c') => self.cycle_material(),
            KeyCode::Char('p') => {
                self.scene.camera.mode = self.scene.camera.mode.toggled();
            }
            KeyCode::Char('l') => self.reload_model(),
            _ => {}
        }
    }

    fn cycle_material(&mut self) {
        let next = Material::next_preset_name(&self.material_name);
        if let Some(material) = Material::preset(next) {
            self.scene.material = material;
            self.material_name = next.to_string();
        }
    }

    fn reload_model(&mut self) {
        self.status = match self.scene.model.reload() {
            Ok(Some(report)) => {
                let status = format!(
                    "reloaded: {} triangles, {} skipped lines",
                    report.triangle_count,
                    report.skipped.len()
                );
                info!("{}", status);
                status
            }
            Ok(None) => "built-in model, nothing to reload".to_string(),
            Err(e) => {
                warn!("Reload failed: {}", e);
                format!("reload failed: {}", e)
            }
        };
        self.scene.fit_model(MODEL_SIZE);
    }

    fn update(&mut self) {
        // Continuous slow rotation for demo effect
        self.scene.rotation.rotate(0.0, 0.015, 0.0);
    }

    fn render(&mut self) -> io::Result<()> {
        self.renderer.clear();
        self.renderer.render_scene(&self.scene);

        // Output to terminal
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;

        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "Planar Mirror | FPS: {:.1} | {} | Controls: WASD/Arrows=Rotate E/R=Roll C=Material P=Projection L=Reload Q=Quit",
                self.fps, self.material_name
            )),
            ResetColor
        )?;
        if !self.status.is_empty() {
            queue!(
                stdout,
                cursor::MoveTo(0, 1),
                SetForegroundColor(Color::Yellow),
                Print(&self.status),
                ResetColor
            )?;
        }

        stdout.flush()?;
        Ok(())
    }
}
