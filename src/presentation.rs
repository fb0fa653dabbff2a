//! Presentation capabilities driven by the controller.
//!
//! Each capability is optional. A controller with nothing attached still
//! simulates; it just has nothing to draw on.

use glam::DVec3;
use std::cell::RefCell;
use std::rc::Rc;

/// On-screen temperature readout
pub trait TemperatureDisplay {
    fn set_temperature_text(&mut self, celsius: i32);
    fn set_completion_text(&mut self);
}

/// A scene object with a transform and a visibility flag (the solid block, the liquid)
pub trait SceneBody {
    fn set_visible(&mut self, visible: bool);
    fn set_scale(&mut self, scale: DVec3);
    fn set_position(&mut self, position: DVec3);
}

/// Light mirroring the heat source state
pub trait IndicatorLight {
    fn set_enabled(&mut self, enabled: bool);
}

#[derive(Default)]
pub struct Presentation {
    pub display: Option<Box<dyn TemperatureDisplay>>,
    pub solid: Option<Box<dyn SceneBody>>,
    pub liquid: Option<Box<dyn SceneBody>>,
    pub light: Option<Box<dyn IndicatorLight>>,
}

impl Presentation {
    pub fn with_display(mut self, display: impl TemperatureDisplay + 'static) -> Self {
        self.display = Some(Box::new(display));
        self
    }

    pub fn with_solid(mut self, solid: impl SceneBody + 'static) -> Self {
        self.solid = Some(Box::new(solid));
        self
    }

    pub fn with_liquid(mut self, liquid: impl SceneBody + 'static) -> Self {
        self.liquid = Some(Box::new(liquid));
        self
    }

    pub fn with_light(mut self, light: impl IndicatorLight + 'static) -> Self {
        self.light = Some(Box::new(light));
        self
    }
}

// ============================================================================
// Headless snapshots
// ============================================================================

/// Last text pushed to a display
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DisplaySnapshot {
    pub celsius: i32,
    pub completed: bool,
    pub updates: usize,
}

impl DisplaySnapshot {
    pub fn text(&self) -> String {
        if self.completed {
            "EXPERIMENT COMPLETE!".to_string()
        } else {
            format!("Temperature: {} °C", self.celsius)
        }
    }
}

impl TemperatureDisplay for DisplaySnapshot {
    fn set_temperature_text(&mut self, celsius: i32) {
        self.celsius = celsius;
        self.completed = false;
        self.updates += 1;
    }

    fn set_completion_text(&mut self) {
        self.completed = true;
        self.updates += 1;
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BodySnapshot {
    pub visible: bool,
    pub scale: DVec3,
    pub position: DVec3,
    /// Number of hidden → visible flips seen
    pub times_shown: usize,
}

impl SceneBody for BodySnapshot {
    fn set_visible(&mut self, visible: bool) {
        if visible && !self.visible {
            self.times_shown += 1;
        }
        self.visible = visible;
    }

    fn set_scale(&mut self, scale: DVec3) {
        self.scale = scale;
    }

    fn set_position(&mut self, position: DVec3) {
        self.position = position;
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LightSnapshot {
    pub enabled: bool,
}

impl IndicatorLight for LightSnapshot {
    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}

impl<T: TemperatureDisplay> TemperatureDisplay for Rc<RefCell<T>> {
    fn set_temperature_text(&mut self, celsius: i32) {
        self.borrow_mut().set_temperature_text(celsius);
    }

    fn set_completion_text(&mut self) {
        self.borrow_mut().set_completion_text();
    }
}

impl<T: SceneBody> SceneBody for Rc<RefCell<T>> {
    fn set_visible(&mut self, visible: bool) {
        self.borrow_mut().set_visible(visible);
    }

    fn set_scale(&mut self, scale: DVec3) {
        self.borrow_mut().set_scale(scale);
    }

    fn set_position(&mut self, position: DVec3) {
        self.borrow_mut().set_position(position);
    }
}

impl<T: IndicatorLight> IndicatorLight for Rc<RefCell<T>> {
    fn set_enabled(&mut self, enabled: bool) {
        self.borrow_mut().set_enabled(enabled);
    }
}

/// Shared handles to a full set of snapshots, for callers that want to
/// inspect what the controller drew.
#[derive(Clone, Default)]
pub struct SceneProbe {
    pub display: Rc<RefCell<DisplaySnapshot>>,
    pub solid: Rc<RefCell<BodySnapshot>>,
    pub liquid: Rc<RefCell<BodySnapshot>>,
    pub light: Rc<RefCell<LightSnapshot>>,
}

impl SceneProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// A presentation wired to this probe's snapshots
    pub fn presentation(&self) -> Presentation {
        Presentation::default()
            .with_display(self.display.clone())
            .with_solid(self.solid.clone())
            .with_liquid(self.liquid.clone())
            .with_light(self.light.clone())
    }
}
