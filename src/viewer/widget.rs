use crate::intake::ResourceHandle;

/// Creation-time attribute surface for a render widget.
///
/// The static toggles mirror what an embeddable viewer element exposes as
/// boolean attributes; exposure and the environment image are seeded from the
/// controller's current parameters so a rebuilt widget never starts from
/// defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetConfig {
    pub camera_controls: bool,
    pub auto_rotate: bool,
    pub ar: bool,
    pub auto_scale: bool,
    pub tight_bounds: bool,
    pub auto_orbit_bounds: bool,
    pub exposure: f32,
    pub environment_image: String,
}

/// The narrow imperative surface the controller drives on the embedded
/// render widget. The actual rasterizer lives behind this trait.
pub trait RenderWidget {
    /// Camera orbit goal as an azimuth/polar/radius triple, e.g. `0deg 75deg auto`.
    fn set_camera_orbit(&mut self, orbit: &str);
    fn set_field_of_view(&mut self, fov: &str);
    /// Snap to the current camera goal without an animated transition.
    fn jump_camera_to_goal(&mut self);
    fn set_exposure(&mut self, exposure: f32);
    fn set_environment_image(&mut self, image: &str);
    fn set_auto_rotate(&mut self, enabled: bool);
    fn auto_rotate(&self) -> bool;
}

/// Builds one widget per installed asset. Called again on every asset change;
/// the controller drops the previous widget before asking for a new one.
pub trait WidgetFactory {
    type Widget: RenderWidget;

    fn create_widget(&mut self, handle: &ResourceHandle, config: &WidgetConfig) -> Self::Widget;
}
