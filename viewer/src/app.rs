//! Viewer application: window, event loop and per-frame update

use std::sync::Arc;

use anyhow::{Context, Result};
use glam::{UVec2, Vec2};
use globe_core::camera::OrbitCamera;
use globe_core::config::Config;
use globe_core::input::OrbitInput;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Fullscreen, Window, WindowId},
};

use crate::graphics::{Graphics, GraphicsOptions};
use crate::scene::{Scene, SceneMeshes};

/// Pixels of touchpad scroll that count as one wheel line
const PIXELS_PER_LINE: f32 = 40.0;

/// Application state
pub struct App {
    config: Config,
    /// Generated before the event loop starts, consumed by the first upload
    meshes: Option<SceneMeshes>,
    window: Option<Arc<Window>>,
    graphics: Option<Graphics>,
    scene: Option<Scene>,
    camera: OrbitCamera,
    input: OrbitInput,
    should_exit: bool,
    /// Fatal error to report once the event loop returns
    error: Option<anyhow::Error>,
}

impl App {
    pub fn new(config: Config, meshes: SceneMeshes) -> Self {
        let camera = OrbitCamera::from_config(&config.camera);
        Self {
            config,
            meshes: Some(meshes),
            window: None,
            graphics: None,
            scene: None,
            camera,
            input: OrbitInput::new(),
            should_exit: false,
            error: None,
        }
    }

    fn fail(&mut self, error: anyhow::Error) {
        tracing::error!("{:#}", error);
        self.error = Some(error);
        self.should_exit = true;
    }

    fn window_attributes(&self) -> winit::window::WindowAttributes {
        let window = &self.config.window;
        let min = window.min_size;
        let max = window.max_size.max(min);

        Window::default_attributes()
            .with_title(window.title.clone())
            .with_inner_size(LogicalSize::new(
                window.width.clamp(min, max),
                window.height.clamp(min, max),
            ))
            .with_min_inner_size(LogicalSize::new(min, min))
            .with_max_inner_size(LogicalSize::new(max, max))
    }

    fn init_graphics(&mut self, window: Arc<Window>) -> Result<()> {
        let graphics = Graphics::new(
            window,
            GraphicsOptions {
                vsync: self.config.window.vsync,
                wireframe: self.config.debug.wireframe,
            },
        )
        .context("Failed to initialize graphics")?;

        let meshes = self
            .meshes
            .take()
            .context("Sphere meshes were already uploaded")?;
        let scene = Scene::upload(&graphics, meshes, &self.config)?;

        self.graphics = Some(graphics);
        self.scene = Some(scene);
        Ok(())
    }

    fn handle_resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            if let Some(graphics) = &mut self.graphics {
                graphics.resize(new_size.width, new_size.height);
            }
        }
    }

    fn toggle_fullscreen(&mut self) {
        if let Some(window) = &self.window {
            let fullscreen = if window.fullscreen().is_some() {
                None
            } else {
                Some(Fullscreen::Borderless(None))
            };
            window.set_fullscreen(fullscreen);
        }
    }

    fn handle_key_input(&mut self, key_event: KeyEvent) {
        if key_event.state != ElementState::Pressed || key_event.repeat {
            return;
        }
        let PhysicalKey::Code(key_code) = key_event.physical_key else {
            return;
        };

        match key_code {
            KeyCode::Escape => {
                tracing::info!("Escape pressed, exiting");
                self.should_exit = true;
            }
            KeyCode::KeyR => {
                self.camera.reset_rotation();
            }
            KeyCode::F11 => {
                self.toggle_fullscreen();
            }
            _ => {}
        }
    }

    fn handle_mouse_button(&mut self, state: ElementState, button: MouseButton) {
        if button != MouseButton::Left {
            return;
        }
        match state {
            ElementState::Pressed => self.input.press(),
            ElementState::Released => self.input.release(),
        }
    }

    fn handle_scroll(&mut self, delta: MouseScrollDelta) {
        let lines = match delta {
            MouseScrollDelta::LineDelta(_, y) => y,
            MouseScrollDelta::PixelDelta(position) => position.y as f32 / PIXELS_PER_LINE,
        };
        self.input.scroll(lines);
    }

    fn render(&mut self) {
        let (Some(graphics), Some(scene)) = (&mut self.graphics, &self.scene) else {
            return;
        };

        let deltas = self.input.take();
        if !deltas.is_empty() {
            let viewport = UVec2::new(graphics.width(), graphics.height());
            self.camera.rotate(deltas.drag, viewport);
            self.camera.zoom(deltas.scroll);
        }

        graphics.render(scene, &self.camera);
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match event_loop.create_window(self.window_attributes()) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                self.fail(anyhow::Error::new(e).context("Failed to create window"));
                event_loop.exit();
                return;
            }
        };

        if self.config.window.fullscreen {
            window.set_fullscreen(Some(Fullscreen::Borderless(None)));
        }

        if let Err(e) = self.init_graphics(window.clone()) {
            self.fail(e);
            event_loop.exit();
            return;
        }

        tracing::info!("Viewer ready");
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("Close requested");
                self.should_exit = true;
            }
            WindowEvent::Resized(new_size) => {
                tracing::debug!("Window resized to {:?}", new_size);
                self.handle_resize(new_size);
            }
            WindowEvent::KeyboardInput {
                event: key_event, ..
            } => {
                self.handle_key_input(key_event);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.handle_mouse_button(state, button);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.input
                    .cursor_moved(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::CursorLeft { .. } | WindowEvent::Focused(false) => {
                self.input.cancel();
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.handle_scroll(delta);
            }
            WindowEvent::RedrawRequested => {
                self.render();
            }
            _ => {}
        }

        if self.should_exit {
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

/// Generate the scene, open the window and run until it closes
pub fn run(config: Config) -> Result<()> {
    for warning in config.validate() {
        tracing::warn!("Config: {}", warning);
    }

    let meshes = SceneMeshes::generate(&config).context("Failed to generate spheres")?;

    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config, meshes);
    event_loop.run_app(&mut app).context("Event loop error")?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
