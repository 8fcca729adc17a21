use crate::intake::ResourceHandle;
use crate::viewer::widget::{RenderWidget, WidgetConfig, WidgetFactory};
use eframe::egui;

/// Shell-side stand-in for the embedded render engine.
///
/// Records the attribute/property surface the controller pushes and paints a
/// placeholder viewport readout; a real rasterizer binds behind the same
/// [`RenderWidget`] trait without the controller noticing.
pub struct HostWidget {
    asset_name: String,
    asset_kind: &'static str,
    asset_len: usize,
    camera_orbit: String,
    field_of_view: String,
    exposure: f32,
    environment_image: String,
    camera_controls: bool,
    ar: bool,
    auto_scale: bool,
    auto_rotate: bool,
    load_reported: bool,
    spin: f32,
}

impl HostWidget {
    /// One-shot readiness report, delivered on the first frame after attach.
    pub fn take_load_event(&mut self) -> bool {
        if self.load_reported {
            return false;
        }
        self.load_reported = true;
        true
    }

    pub fn ui(&mut self, ui: &mut egui::Ui) {
        let sense = if self.camera_controls {
            egui::Sense::drag()
        } else {
            egui::Sense::hover()
        };
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), sense);
        if response.dragged() {
            self.spin += response.drag_delta().x * 0.01;
        }
        if self.auto_rotate {
            self.spin += ui.input(|i| i.stable_dt) * 0.6;
            ui.ctx().request_repaint();
        }

        let painter = ui.painter();
        let brightness = (16.0 + self.exposure * 28.0) as u8;
        painter.rect_filled(
            rect,
            egui::CornerRadius::same(8),
            egui::Color32::from_gray(brightness),
        );

        let center = rect.center();
        let radius = rect.width().min(rect.height()) * 0.18;
        let points: Vec<egui::Pos2> = (0..4)
            .map(|corner| {
                let angle = self.spin + corner as f32 * std::f32::consts::FRAC_PI_2;
                center + egui::vec2(angle.cos(), angle.sin()) * radius
            })
            .collect();
        painter.add(egui::Shape::closed_line(
            points,
            egui::Stroke::new(1.5, egui::Color32::from_rgb(110, 170, 255)),
        ));

        painter.text(
            center + egui::vec2(0.0, radius + 28.0),
            egui::Align2::CENTER_CENTER,
            format!(
                "{} ({}, {} KB)",
                self.asset_name,
                self.asset_kind,
                self.asset_len.div_ceil(1024)
            ),
            egui::FontId::proportional(14.0),
            egui::Color32::GRAY,
        );

        let environment = self
            .environment_image
            .rsplit('/')
            .next()
            .unwrap_or(&self.environment_image);
        let mut readout = format!(
            "orbit {} | fov {} | exposure {:.1} | {}",
            self.camera_orbit, self.field_of_view, self.exposure, environment
        );
        if self.ar {
            readout.push_str(" | AR");
        }
        if self.auto_scale {
            readout.push_str(" | fit");
        }
        painter.text(
            rect.left_bottom() + egui::vec2(12.0, -10.0),
            egui::Align2::LEFT_BOTTOM,
            readout,
            egui::FontId::monospace(11.0),
            egui::Color32::DARK_GRAY,
        );
    }
}

impl RenderWidget for HostWidget {
    fn set_camera_orbit(&mut self, orbit: &str) {
        self.camera_orbit = orbit.to_string();
    }

    fn set_field_of_view(&mut self, fov: &str) {
        self.field_of_view = fov.to_string();
    }

    fn jump_camera_to_goal(&mut self) {
        // Instant snap to the goal pose, azimuth first.
        self.spin = 0.0;
    }

    fn set_exposure(&mut self, exposure: f32) {
        self.exposure = exposure;
    }

    fn set_environment_image(&mut self, image: &str) {
        self.environment_image = image.to_string();
    }

    fn set_auto_rotate(&mut self, enabled: bool) {
        self.auto_rotate = enabled;
    }

    fn auto_rotate(&self) -> bool {
        self.auto_rotate
    }
}

#[derive(Default)]
pub struct HostWidgetFactory;

impl WidgetFactory for HostWidgetFactory {
    type Widget = HostWidget;

    fn create_widget(&mut self, handle: &ResourceHandle, config: &WidgetConfig) -> HostWidget {
        log::debug!("Host widget configured: {:?}", config);
        // glTF binary containers open with the `glTF` magic; everything else
        // on the allowlist is the JSON form.
        let asset_kind = if handle.bytes().starts_with(b"glTF") {
            "binary"
        } else {
            "text"
        };
        HostWidget {
            asset_name: handle.name().to_string(),
            asset_kind,
            asset_len: handle.len(),
            camera_orbit: "auto auto auto".to_string(),
            field_of_view: "auto".to_string(),
            exposure: config.exposure,
            environment_image: config.environment_image.clone(),
            camera_controls: config.camera_controls,
            ar: config.ar,
            auto_scale: config.auto_scale,
            auto_rotate: config.auto_rotate,
            load_reported: false,
            spin: 0.0,
        }
    }
}
