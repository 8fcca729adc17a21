pub mod environment;
pub mod widget;

use crate::intake::ResourceHandle;
use environment::EnvironmentPreset;
use std::ops::RangeInclusive;
use std::time::{Duration, Instant};
use widget::{RenderWidget, WidgetConfig, WidgetFactory};

/// Framing pose applied after every load completion and camera reset.
pub const FRAMING_ORBIT: &str = "0deg 75deg auto";
pub const FRAMING_FIELD_OF_VIEW: &str = "auto";

/// How long the instant camera jump is left undisturbed before auto-rotation
/// resumes. Presentational tuning, not a correctness constraint.
pub const AUTO_ROTATE_RESTORE_DELAY: Duration = Duration::from_millis(100);

pub const EXPOSURE_RANGE: RangeInclusive<f32> = 0.0..=2.0;

/// Session parameters that survive asset reloads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewerParameters {
    pub exposure: f32,
    pub environment: EnvironmentPreset,
}

impl Default for ViewerParameters {
    fn default() -> Self {
        Self {
            exposure: 1.0,
            environment: EnvironmentPreset::Neutral,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerState {
    Empty,
    Loaded,
}

#[derive(Debug, Clone, Copy)]
struct RotationRestore {
    generation: u64,
    due: Instant,
}

/// Owns the lifecycle of the displayed asset and the single live render
/// widget bound to it.
///
/// The widget slot has destroy-then-create semantics: on every asset change
/// the old widget is dropped before the factory builds its replacement, and
/// the superseded resource handle is released only after its widget is gone.
/// Load-completion notifications and the rotation-restore timer are tagged
/// with the widget generation so anything belonging to a detached widget is
/// a deliberate no-op.
pub struct ViewerController<F: WidgetFactory> {
    factory: F,
    params: ViewerParameters,
    // Field order matters: the widget must drop before the handle it is
    // bound to when the controller itself is torn down.
    widget: Option<F::Widget>,
    handle: Option<ResourceHandle>,
    generation: u64,
    rotation_restore: Option<RotationRestore>,
}

impl<F: WidgetFactory> ViewerController<F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            params: ViewerParameters::default(),
            widget: None,
            handle: None,
            generation: 0,
            rotation_restore: None,
        }
    }

    pub fn state(&self) -> ViewerState {
        if self.widget.is_some() {
            ViewerState::Loaded
        } else {
            ViewerState::Empty
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.state() == ViewerState::Loaded
    }

    pub fn params(&self) -> ViewerParameters {
        self.params
    }

    pub fn asset_name(&self) -> Option<&str> {
        self.handle.as_ref().map(|handle| handle.name())
    }

    pub fn widget(&self) -> Option<&F::Widget> {
        self.widget.as_ref()
    }

    pub fn widget_mut(&mut self) -> Option<&mut F::Widget> {
        self.widget.as_mut()
    }

    /// Binds a freshly validated asset to a new widget, replacing any
    /// previous one. Returns the load token the host must hand back through
    /// [`Self::notify_load_complete`] once the widget reports readiness.
    pub fn install(&mut self, handle: ResourceHandle) -> u64 {
        self.detach();
        self.generation += 1;
        let config = WidgetConfig {
            camera_controls: true,
            auto_rotate: true,
            ar: true,
            auto_scale: true,
            tight_bounds: true,
            auto_orbit_bounds: true,
            exposure: self.params.exposure,
            environment_image: self.params.environment.image_path().to_string(),
        };
        log::info!(
            "Attaching render widget #{} for '{}' ({} bytes)",
            self.generation,
            handle.name(),
            handle.len()
        );
        self.widget = Some(self.factory.create_widget(&handle, &config));
        self.handle = Some(handle);
        self.generation
    }

    /// Drops the live widget and releases the active handle ("change model").
    pub fn clear(&mut self) {
        if let Some(name) = self.asset_name() {
            log::info!("Clearing active asset '{}'", name);
        }
        self.detach();
    }

    fn detach(&mut self) {
        self.rotation_restore = None;
        // The widget drops before the handle it was bound to.
        self.widget = None;
        self.handle = None;
    }

    /// Called by the host when the widget identified by `token` reports that
    /// its asset is ready to render. Notifications for widgets that have
    /// since been detached are ignored.
    pub fn notify_load_complete(&mut self, token: u64, now: Instant) {
        if token != self.generation || self.widget.is_none() {
            log::debug!("Ignoring load completion for detached widget (token {token})");
            return;
        }
        log::info!("Asset finished loading; applying framing pose");
        self.frame_camera(now);
    }

    /// Re-applies the fixed framing pose to the live widget. No-op when empty.
    pub fn reset_camera(&mut self, now: Instant) {
        if self.widget.is_none() {
            return;
        }
        self.frame_camera(now);
    }

    fn frame_camera(&mut self, now: Instant) {
        let generation = self.generation;
        let Some(widget) = self.widget.as_mut() else {
            return;
        };
        // Pause rotation so the instant jump is not fighting it visually.
        let was_rotating = widget.auto_rotate();
        if was_rotating {
            widget.set_auto_rotate(false);
        }
        widget.set_camera_orbit(FRAMING_ORBIT);
        widget.set_field_of_view(FRAMING_FIELD_OF_VIEW);
        widget.jump_camera_to_goal();
        if was_rotating {
            self.rotation_restore = Some(RotationRestore {
                generation,
                due: now + AUTO_ROTATE_RESTORE_DELAY,
            });
        }
    }

    /// Fires the pending rotation restore once it is due. A restore scheduled
    /// for a widget that has since been detached is discarded.
    pub fn tick(&mut self, now: Instant) {
        let Some(restore) = self.rotation_restore else {
            return;
        };
        if now < restore.due {
            return;
        }
        self.rotation_restore = None;
        if restore.generation != self.generation {
            log::debug!("Discarding rotation restore for detached widget");
            return;
        }
        if let Some(widget) = self.widget.as_mut() {
            widget.set_auto_rotate(true);
        }
    }

    /// Deadline of the pending rotation restore, for host repaint scheduling.
    pub fn next_restore_due(&self) -> Option<Instant> {
        self.rotation_restore.map(|restore| restore.due)
    }

    /// Clamps into [0, 2], records, and applies to the live widget if any.
    /// Never recreates the widget and never moves the camera.
    pub fn set_exposure(&mut self, value: f32) {
        let value = value.clamp(*EXPOSURE_RANGE.start(), *EXPOSURE_RANGE.end());
        self.params.exposure = value;
        log::debug!("Exposure set to {value:.2}");
        if let Some(widget) = self.widget.as_mut() {
            widget.set_exposure(value);
        }
    }

    /// Records the preset and applies its lighting resource to the live
    /// widget if any. Never recreates the widget and never moves the camera.
    pub fn set_environment(&mut self, preset: EnvironmentPreset) {
        self.params.environment = preset;
        log::debug!("Environment set to '{}'", preset.key());
        if let Some(widget) = self.widget.as_mut() {
            widget.set_environment_image(preset.image_path());
        }
    }
}
