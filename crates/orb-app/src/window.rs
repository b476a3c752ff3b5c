//! Window creation and event handling via winit.
//!
//! [`App`] implements winit's [`ApplicationHandler`]: it owns the window,
//! GPU context, pointer plumbing and the active scene, and drives one scene
//! tick plus one render per redraw.

use std::path::PathBuf;
use std::sync::Arc;

use orb_config::{CliArgs, Config};
use orb_input::{PointerDispatcher, PointerEvent, PointerTranslator, Viewport};
use orb_render::{
    EarthTextures, RenderContext, RenderContextError, RendererSettings, SceneRenderer,
    SurfaceError, init_render_context_blocking,
};
use orb_scene::SceneController;
use tracing::{debug, error, info, instrument, warn};
use winit::application::ApplicationHandler;
use winit::error::{EventLoopError, OsError};
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{Fullscreen, Window, WindowAttributes, WindowId};

use crate::controls::{AppAction, action_for_key};
use crate::frame_clock::FrameClock;

/// Failures that end the application.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("event loop error: {0}")]
    EventLoop(#[from] EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] OsError),

    #[error("GPU initialization failed: {0}")]
    Gpu(#[from] RenderContextError),

    #[error("GPU out of memory")]
    OutOfMemory,
}

/// Returns [`WindowAttributes`] based on the given configuration.
#[must_use]
pub fn window_attributes_from_config(config: &Config) -> WindowAttributes {
    let attrs = WindowAttributes::default()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(
            f64::from(config.window.width),
            f64::from(config.window.height),
        ));
    if config.window.fullscreen {
        attrs.with_fullscreen(Some(Fullscreen::Borderless(None)))
    } else {
        attrs
    }
}

/// Renderer parameters from the camera, scene and render sections.
#[must_use]
pub fn renderer_settings_from_config(config: &Config) -> RendererSettings {
    let [day, night, clouds] = config.texture_paths();
    RendererSettings {
        sphere_segments: config.render.sphere_segments,
        fov_deg: config.camera.fov_deg,
        near: config.camera.near,
        far: config.camera.far,
        clear_color: config.render.clear_color,
        clouds_opacity: config.scene.clouds_opacity,
        earth_textures: EarthTextures { day, night, clouds },
    }
}

/// Where the running config came from, for reloading it.
struct ConfigSource {
    dir: PathBuf,
    /// File contents as last read, before CLI overrides.
    on_disk: Config,
    args: CliArgs,
}

pub struct App {
    config: Config,
    source: Option<ConfigSource>,
    window: Option<Arc<Window>>,
    gpu: Option<RenderContext>,
    renderer: Option<SceneRenderer>,
    // Declared before the dispatcher so scene subscriptions drop first.
    scene: SceneController,
    dispatcher: PointerDispatcher,
    translator: PointerTranslator,
    clock: FrameClock,
    fatal: Option<AppError>,
}

impl App {
    #[must_use]
    pub fn new(config: Config) -> Self {
        let dispatcher =
            PointerDispatcher::new(Viewport::new(config.window.width, config.window.height));
        let scene = SceneController::new(
            config.scene_settings(),
            config.scene.initial_scene,
            config.scene.initial_day_night,
            &dispatcher,
        );
        Self {
            config,
            source: None,
            window: None,
            gpu: None,
            renderer: None,
            scene,
            dispatcher,
            translator: PointerTranslator::new(),
            clock: FrameClock::new(),
            fatal: None,
        }
    }

    /// Re-reads `config.ron` from `dir` when the window regains focus.
    /// `on_disk` is the file as loaded; `args` are re-applied on every reload.
    #[must_use]
    pub fn with_config_source(mut self, dir: PathBuf, on_disk: Config, args: CliArgs) -> Self {
        self.source = Some(ConfigSource { dir, on_disk, args });
        self
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn scene(&self) -> &SceneController {
        &self.scene
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.dispatcher.viewport()
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: AppError) {
        error!("{err}");
        self.fatal = Some(err);
        event_loop.exit();
    }

    fn init_window(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let attrs = window_attributes_from_config(&self.config);
        let window = Arc::new(event_loop.create_window(attrs)?);
        let ctx = init_render_context_blocking(Arc::clone(&window), self.config.window.vsync)?;

        let (width, height) = ctx.size();
        self.dispatcher.set_viewport(Viewport::new(width, height));
        self.renderer = Some(SceneRenderer::new(
            &ctx,
            renderer_settings_from_config(&self.config),
        ));
        self.gpu = Some(ctx);
        info!(width, height, scale = window.scale_factor(), "window ready");

        window.request_redraw();
        self.window = Some(window);
        self.clock.reset();
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            // Minimized; keep the last surface.
            return;
        }
        self.dispatcher.set_viewport(Viewport::new(width, height));
        if let Some(gpu) = &mut self.gpu {
            gpu.resize(width, height);
            if let Some(renderer) = &mut self.renderer {
                renderer.resize(&gpu.device, width, height);
            }
        }
        debug!(width, height, "resized");
    }

    fn dispatch(&self, event: PointerEvent) {
        self.dispatcher.dispatch(event);
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, event: &KeyEvent) {
        if event.state != ElementState::Pressed || event.repeat {
            return;
        }
        let PhysicalKey::Code(code) = event.physical_key else {
            return;
        };
        match action_for_key(code) {
            Some(AppAction::Scene(command)) => {
                if self.scene.apply(command, &self.dispatcher) {
                    debug!(?command, listeners = self.dispatcher.listener_count(), "applied");
                }
            }
            Some(AppAction::Quit) => {
                info!("Escape pressed, shutting down");
                event_loop.exit();
            }
            None => {}
        }
    }

    /// Picks up edits to the config file. Window size, title and startup
    /// scene only apply at launch; camera, lighting and render values apply
    /// immediately. Returns `true` when something changed.
    fn reload_config(&mut self) -> bool {
        let Some(source) = &mut self.source else {
            return false;
        };
        let fresh = match source.on_disk.reload(&source.dir) {
            Ok(Some(fresh)) => fresh,
            Ok(None) => return false,
            Err(e) => {
                warn!("Keeping current config: {e}");
                return false;
            }
        };
        source.on_disk = fresh.clone();
        let mut config = fresh;
        config.apply_cli_overrides(&source.args);

        self.scene.set_settings(config.scene_settings());
        if let Some(renderer) = &mut self.renderer {
            renderer.apply_settings(renderer_settings_from_config(&config));
        }
        self.config = config;
        info!(dir = %source.dir.display(), "applied reloaded config");
        true
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let delta = self.clock.tick();
        self.scene.tick(delta);

        let mut out_of_memory = false;
        if let (Some(gpu), Some(renderer)) = (&self.gpu, &mut self.renderer) {
            if let Err(e) = renderer.sync(&gpu.device, &gpu.queue, &mut self.scene) {
                warn!("Failed to prepare scene meshes: {e}");
            }
            match renderer.render(gpu, &self.scene) {
                Ok(()) => {}
                Err(SurfaceError::OutOfMemory) => out_of_memory = true,
                Err(e) => warn!("Skipped frame: {e}"),
            }
        }
        if out_of_memory {
            self.fail(event_loop, AppError::OutOfMemory);
            return;
        }

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init_window(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => self.resize(size.width, size.height),
            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(window) = &self.window {
                    let size = window.inner_size();
                    self.resize(size.width, size.height);
                }
            }
            WindowEvent::Focused(true) => {
                self.reload_config();
            }
            WindowEvent::KeyboardInput { event, .. } => self.handle_key(event_loop, &event),
            WindowEvent::CursorMoved { position, .. } => {
                let event = self.translator.on_cursor_moved(position.x, position.y);
                self.dispatch(event);
            }
            WindowEvent::MouseInput { state, .. } => {
                let event = self.translator.on_mouse_button(state);
                self.dispatch(event);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let event = self.translator.on_wheel(delta);
                self.dispatch(event);
            }
            WindowEvent::Touch(touch) => {
                if let Some(event) = self.translator.on_touch(
                    touch.id,
                    touch.phase,
                    touch.location.x,
                    touch.location.y,
                ) {
                    self.dispatch(event);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}

/// Creates an event loop and runs the viewer until the window closes.
#[instrument(skip_all)]
pub fn run(mut app: App) -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    event_loop.run_app(&mut app)?;
    match app.fatal.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
