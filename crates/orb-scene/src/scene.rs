//! Scene lifecycle: building, switching and ticking the active scene.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use glam::Vec3;
use orb_input::{ColorValue, PointerColorMapper, PointerDispatcher, PointerSubscription};
use tracing::{debug, info};

use crate::lighting::PointLight;
use crate::mode::{DayNightMode, SceneCommand, SceneMode};
use crate::orbit::{OrbitController, OrbitSettings};
use crate::rotation::{MeshTransform, PlanetLayers};
use crate::schedule::FrameScheduler;
use crate::transition::FadeIn;

/// Radius of the ball and of the Earth body.
pub const BODY_RADIUS: f32 = 1.0;
/// Radius of the cloud shell, just above the surface.
pub const CLOUDS_RADIUS: f32 = 1.03;

/// Everything the controller needs, resolved from configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneSettings {
    pub orbit: OrbitSettings,
    pub ball_auto_rotate_speed: f32,
    pub earth_auto_rotate_speed: f32,
    /// Position, range and decay; intensity is picked per scene.
    pub light: PointLight,
    pub ball_light_intensity: f32,
    pub earth_light_intensity: f32,
    pub fade_in_secs: f64,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            orbit: OrbitSettings::default(),
            ball_auto_rotate_speed: 5.0,
            earth_auto_rotate_speed: 0.3,
            light: PointLight::default(),
            ball_light_intensity: 200.0,
            earth_light_intensity: 800.0,
            fade_in_secs: 1.0,
        }
    }
}

/// The pointer-colored sphere.
pub struct BallScene {
    mapper: Rc<RefCell<PointerColorMapper>>,
    _subscription: PointerSubscription,
}

impl BallScene {
    /// Builds the scene and subscribes its color mapper to `dispatcher`.
    #[must_use]
    pub fn new(dispatcher: &PointerDispatcher) -> Self {
        let mapper = Rc::new(RefCell::new(PointerColorMapper::new()));
        let subscription = dispatcher.subscribe(Rc::clone(&mapper));
        Self {
            mapper,
            _subscription: subscription,
        }
    }

    #[must_use]
    pub fn color(&self) -> ColorValue {
        self.mapper.borrow().color()
    }

    #[must_use]
    pub fn mapper(&self) -> Ref<'_, PointerColorMapper> {
        self.mapper.borrow()
    }
}

/// The rotating Earth with its cloud shell.
pub struct EarthScene {
    layers: PlanetLayers,
    scheduler: FrameScheduler<PlanetLayers>,
    day_night: DayNightMode,
}

impl EarthScene {
    /// Builds the scene with both layers unmounted and both rotation
    /// callbacks registered, body first.
    #[must_use]
    pub fn new(day_night: DayNightMode) -> Self {
        let mut scheduler = FrameScheduler::new();
        scheduler.register("earth.body", |layers: &mut PlanetLayers, dt| {
            layers.advance_body(dt);
        });
        scheduler.register("earth.clouds", |layers: &mut PlanetLayers, dt| {
            layers.advance_clouds(dt);
        });
        Self {
            layers: PlanetLayers::default(),
            scheduler,
            day_night,
        }
    }

    /// Runs this frame's rotation callbacks.
    pub fn tick(&mut self, delta: f64) {
        self.scheduler.run(&mut self.layers, delta);
    }

    /// Marks the body mesh as mounted. Idempotent.
    pub fn mount_body(&mut self) {
        if self.layers.body.is_none() {
            self.layers.body = Some(MeshTransform::new(BODY_RADIUS));
            debug!("earth body mounted");
        }
    }

    /// Marks the cloud mesh as mounted. Idempotent.
    pub fn mount_clouds(&mut self) {
        if self.layers.clouds.is_none() {
            self.layers.clouds = Some(MeshTransform::new(CLOUDS_RADIUS));
            debug!("earth clouds mounted");
        }
    }

    #[must_use]
    pub fn layers(&self) -> &PlanetLayers {
        &self.layers
    }

    #[must_use]
    pub fn day_night(&self) -> DayNightMode {
        self.day_night
    }

    #[must_use]
    pub fn scheduler(&self) -> &FrameScheduler<PlanetLayers> {
        &self.scheduler
    }
}

pub enum ActiveScene {
    Ball(BallScene),
    Earth(EarthScene),
}

impl ActiveScene {
    #[must_use]
    pub fn mode(&self) -> SceneMode {
        match self {
            Self::Ball(_) => SceneMode::Ball,
            Self::Earth(_) => SceneMode::Earth,
        }
    }
}

/// Owns the active scene, the orbit camera and the fade-in.
///
/// The day/night flag lives here rather than in [`EarthScene`] so it survives
/// a round trip through the ball scene.
pub struct SceneController {
    settings: SceneSettings,
    active: ActiveScene,
    day_night: DayNightMode,
    orbit: Rc<RefCell<OrbitController>>,
    _orbit_subscription: PointerSubscription,
    fade: FadeIn,
}

impl SceneController {
    #[must_use]
    pub fn new(
        settings: SceneSettings,
        mode: SceneMode,
        day_night: DayNightMode,
        dispatcher: &PointerDispatcher,
    ) -> Self {
        let orbit = Rc::new(RefCell::new(OrbitController::new(settings.orbit.clone())));
        let orbit_subscription = dispatcher.subscribe(Rc::clone(&orbit));
        let fade = FadeIn::new(settings.fade_in_secs);
        let active = match mode {
            SceneMode::Ball => ActiveScene::Ball(BallScene::new(dispatcher)),
            SceneMode::Earth => ActiveScene::Earth(EarthScene::new(day_night)),
        };
        let mut controller = Self {
            settings,
            active,
            day_night,
            orbit,
            _orbit_subscription: orbit_subscription,
            fade,
        };
        controller.sync_orbit_speed();
        info!(scene = mode.label(), ?day_night, "scene controller ready");
        controller
    }

    /// Applies a command. Returns `true` if anything visible changed.
    pub fn apply(&mut self, command: SceneCommand, dispatcher: &PointerDispatcher) -> bool {
        match command {
            SceneCommand::ShowBall => self.show(SceneMode::Ball, dispatcher),
            SceneCommand::ShowEarth => self.show(SceneMode::Earth, dispatcher),
            SceneCommand::SetDayNight(mode) => {
                if self.day_night == mode {
                    return false;
                }
                self.day_night = mode;
                if let ActiveScene::Earth(earth) = &mut self.active {
                    earth.day_night = mode;
                }
                info!(?mode, "day/night changed");
                true
            }
        }
    }

    /// Switches scenes, dropping the old one entirely. No-op if `mode` is
    /// already showing.
    fn show(&mut self, mode: SceneMode, dispatcher: &PointerDispatcher) -> bool {
        if self.active.mode() == mode {
            return false;
        }
        // Assignment drops the old scene with its callbacks and subscription.
        self.active = match mode {
            SceneMode::Ball => ActiveScene::Ball(BallScene::new(dispatcher)),
            SceneMode::Earth => ActiveScene::Earth(EarthScene::new(self.day_night)),
        };
        self.sync_orbit_speed();
        info!(scene = mode.label(), "scene switched");
        true
    }

    /// Applies changed settings to the running scene. The fade-in keeps its
    /// original duration.
    pub fn set_settings(&mut self, settings: SceneSettings) {
        self.orbit.borrow_mut().set_settings(settings.orbit.clone());
        self.settings = settings;
        self.sync_orbit_speed();
        debug!(scene = self.active.mode().label(), "scene settings updated");
    }

    fn sync_orbit_speed(&mut self) {
        let speed = match self.active.mode() {
            SceneMode::Ball => self.settings.ball_auto_rotate_speed,
            SceneMode::Earth => self.settings.earth_auto_rotate_speed,
        };
        self.orbit.borrow_mut().set_auto_rotate_speed(speed);
    }

    /// Advances the fade, the camera and the active scene by `delta` seconds.
    pub fn tick(&mut self, delta: f64) {
        self.fade.advance(delta);
        self.orbit.borrow_mut().update(delta);
        if let ActiveScene::Earth(earth) = &mut self.active {
            earth.tick(delta);
        }
    }

    #[must_use]
    pub fn mode(&self) -> SceneMode {
        self.active.mode()
    }

    #[must_use]
    pub fn day_night(&self) -> DayNightMode {
        self.day_night
    }

    #[must_use]
    pub fn active(&self) -> &ActiveScene {
        &self.active
    }

    pub fn active_mut(&mut self) -> &mut ActiveScene {
        &mut self.active
    }

    /// The point light with this scene's intensity.
    #[must_use]
    pub fn light(&self) -> PointLight {
        let intensity = match self.active.mode() {
            SceneMode::Ball => self.settings.ball_light_intensity,
            SceneMode::Earth => self.settings.earth_light_intensity,
        };
        PointLight {
            intensity,
            ..self.settings.light
        }
    }

    #[must_use]
    pub fn eye(&self) -> Vec3 {
        self.orbit.borrow().eye()
    }

    #[must_use]
    pub fn opacity(&self) -> f32 {
        self.fade.opacity()
    }

    #[must_use]
    pub fn orbit(&self) -> Ref<'_, OrbitController> {
        self.orbit.borrow()
    }
}
