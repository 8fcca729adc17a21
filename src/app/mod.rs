mod host_widget;

use crate::intake::{self, AssetIntake, IntakeError, ResourceHandle};
use crate::viewer::environment::EnvironmentPreset;
use crate::viewer::{ViewerController, EXPOSURE_RANGE};
use eframe::egui;
use host_widget::HostWidgetFactory;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

pub struct ViewerApp {
    intake: AssetIntake,
    controller: ViewerController<HostWidgetFactory>,
    drag_active: bool,
    notice: Option<String>,
    pending_load: Option<u64>,
}

impl ViewerApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self::with_defaults()
    }

    fn with_defaults() -> Self {
        let mut controller = ViewerController::new(HostWidgetFactory);
        // Optional startup override for the lighting preset.
        if let Ok(key) = std::env::var("GLBVIEW_ENVIRONMENT") {
            match EnvironmentPreset::from_key(&key) {
                Some(preset) => controller.set_environment(preset),
                None => log::warn!("Unknown environment preset '{key}', using default"),
            }
        }
        Self {
            intake: AssetIntake::new(),
            controller,
            drag_active: false,
            notice: None,
            pending_load: None,
        }
    }

    fn load_path(&mut self, path: &Path) {
        let name = path
            .file_name()
            .and_then(|value| value.to_str())
            .unwrap_or("asset")
            .to_string();
        // Validate before releasing anything so a rejected file leaves the
        // current asset untouched.
        if !intake::is_supported(&name) {
            self.reject(IntakeError::UnsupportedFormat { name });
            return;
        }
        self.replace_active(|intake| intake.submit_path(path));
    }

    fn load_bytes(&mut self, name: &str, bytes: Arc<[u8]>) {
        if !intake::is_supported(name) {
            self.reject(IntakeError::UnsupportedFormat {
                name: name.to_string(),
            });
            return;
        }
        self.replace_active(|intake| intake.submit_bytes(name, bytes));
    }

    /// Swaps the displayed asset: the live widget detaches and the old handle
    /// is released before the intake materializes its replacement.
    fn replace_active(
        &mut self,
        submit: impl FnOnce(&mut AssetIntake) -> Result<ResourceHandle, IntakeError>,
    ) {
        self.controller.clear();
        self.pending_load = None;
        match submit(&mut self.intake) {
            Ok(handle) => {
                let token = self.controller.install(handle);
                self.pending_load = Some(token);
            }
            Err(err) => self.reject(err),
        }
    }

    fn reject(&mut self, err: IntakeError) {
        log::warn!("Asset intake failed: {err}");
        self.notice = Some(err.to_string());
    }

    fn open_file_dialog(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("glTF", &["glb", "gltf"])
            .pick_file()
        else {
            return;
        };
        self.load_path(&path);
    }

    fn load_dropped(&mut self, file: egui::DroppedFile) {
        if let Some(path) = file.path {
            self.load_path(&path);
        } else if let Some(bytes) = file.bytes {
            self.load_bytes(&file.name, bytes);
        } else {
            self.reject(IntakeError::EmptySource { name: file.name });
        }
    }

    fn handle_file_events(&mut self, ctx: &egui::Context) {
        // A pending notice blocks further intake until dismissed.
        if self.notice.is_some() {
            return;
        }
        let (hovering, dropped) = ctx.input(|input| {
            (
                !input.raw.hovered_files.is_empty(),
                input.raw.dropped_files.clone(),
            )
        });
        self.drag_active = hovering;
        if let Some(file) = dropped.into_iter().next() {
            self.drag_active = false;
            self.load_dropped(file);
        }
    }

    /// Routes the widget's one-shot readiness report into the controller.
    fn deliver_load_events(&mut self, now: Instant) {
        let Some(token) = self.pending_load else {
            return;
        };
        if !self.controller.is_loaded() {
            self.pending_load = None;
            return;
        }
        let ready = self
            .controller
            .widget_mut()
            .is_some_and(|widget| widget.take_load_event());
        if ready {
            self.pending_load = None;
            self.controller.notify_load_complete(token, now);
        }
    }

    fn empty_ui(&mut self, ui: &mut egui::Ui) {
        let rect = ui.max_rect();
        let stroke = if self.drag_active {
            egui::Stroke::new(2.0, egui::Color32::from_rgb(90, 150, 255))
        } else {
            egui::Stroke::new(1.0, egui::Color32::from_gray(90))
        };
        ui.painter().rect_stroke(
            rect.shrink(8.0),
            egui::CornerRadius::same(8),
            stroke,
            egui::StrokeKind::Inside,
        );

        ui.vertical_centered(|ui| {
            ui.add_space(rect.height() * 0.35);
            ui.label(egui::RichText::new("Drop a model here").size(22.0).strong());
            ui.add_space(8.0);
            ui.label("or");
            ui.add_space(8.0);
            if ui.button("Choose file…").clicked() {
                self.open_file_dialog();
            }
            ui.add_space(12.0);
            ui.label(egui::RichText::new("Supported formats: GLB, GLTF").weak());
        });
    }

    fn loaded_overlays(&mut self, ctx: &egui::Context) {
        egui::Area::new(egui::Id::new("viewer-actions"))
            .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-16.0, 16.0))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    if ui.button("Reset camera").clicked() {
                        self.controller.reset_camera(Instant::now());
                    }
                    if ui.button("Change model").clicked() {
                        self.pending_load = None;
                        self.controller.clear();
                    }
                });
            });

        egui::Window::new("Display")
            .title_bar(false)
            .resizable(false)
            .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-16.0, -16.0))
            .show(ctx, |ui| {
                let current = self.controller.params().environment;
                egui::ComboBox::from_label("Environment")
                    .selected_text(current.label())
                    .show_ui(ui, |ui| {
                        for preset in EnvironmentPreset::ALL {
                            if ui
                                .selectable_label(current == preset, preset.label())
                                .clicked()
                            {
                                self.controller.set_environment(preset);
                            }
                        }
                    });

                let mut exposure = self.controller.params().exposure;
                let response = ui.add(
                    egui::Slider::new(&mut exposure, EXPOSURE_RANGE)
                        .step_by(0.1)
                        .text("Exposure"),
                );
                if response.changed() {
                    self.controller.set_exposure(exposure);
                }
            });
    }

    fn notice_ui(&mut self, ctx: &egui::Context) {
        let Some(message) = self.notice.clone() else {
            return;
        };
        egui::Window::new("Cannot load file")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label(message);
                ui.add_space(8.0);
                ui.vertical_centered(|ui| {
                    if ui.button("OK").clicked() {
                        self.notice = None;
                    }
                });
            });
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.controller.tick(now);
        self.handle_file_events(ctx);
        self.deliver_load_events(now);

        egui::CentralPanel::default().show(ctx, |ui| {
            if self.controller.is_loaded() {
                if let Some(widget) = self.controller.widget_mut() {
                    widget.ui(ui);
                }
            } else {
                self.empty_ui(ui);
            }
        });
        if self.controller.is_loaded() {
            self.loaded_overlays(ctx);
        }
        self.notice_ui(ctx);

        // Keep repainting until the pending rotation restore has fired.
        if let Some(due) = self.controller.next_restore_due() {
            ctx.request_repaint_after(due.saturating_duration_since(now));
        }
    }
}

pub fn run() -> eframe::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    log::info!("glbview starting");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("glbview")
            .with_inner_size([1280.0, 720.0])
            // Drops anywhere on the window reach the viewer; the platform's
            // default file-open handling never sees them.
            .with_drag_and_drop(true),
        ..Default::default()
    };
    eframe::run_native(
        "glbview",
        options,
        Box::new(|cc| Ok(Box::new(ViewerApp::new(cc)))),
    )
}

#[cfg(test)]
mod tests {
    use super::ViewerApp;
    use crate::viewer::ViewerState;
    use eframe::egui;

    fn dropped(name: &str, bytes: &[u8]) -> egui::DroppedFile {
        egui::DroppedFile {
            name: name.to_string(),
            bytes: Some(bytes.to_vec().into()),
            ..Default::default()
        }
    }

    #[test]
    fn dropped_asset_reaches_the_loaded_state() {
        let mut app = ViewerApp::with_defaults();
        app.load_dropped(dropped("cube.glb", b"glTF"));
        assert_eq!(app.controller.state(), ViewerState::Loaded);
        assert!(app.pending_load.is_some());
        assert!(app.notice.is_none());
        assert_eq!(app.intake.live_handles(), 1);
    }

    #[test]
    fn rejected_drop_leaves_the_current_asset_untouched() {
        let mut app = ViewerApp::with_defaults();
        app.load_dropped(dropped("cube.glb", b"glTF"));
        app.load_dropped(dropped("teapot.obj", b"solid"));
        assert_eq!(app.controller.state(), ViewerState::Loaded);
        assert_eq!(app.controller.asset_name(), Some("cube.glb"));
        assert!(app.notice.is_some());
        assert_eq!(app.intake.live_handles(), 1);
    }

    #[test]
    fn replacing_while_loaded_swaps_the_handle() {
        let mut app = ViewerApp::with_defaults();
        app.load_dropped(dropped("first.glb", b"glTF"));
        app.load_dropped(dropped("second.gltf", b"{}"));
        assert_eq!(app.controller.asset_name(), Some("second.gltf"));
        assert_eq!(app.intake.live_handles(), 1);
    }

    #[test]
    fn drop_without_a_source_is_rejected() {
        let mut app = ViewerApp::with_defaults();
        app.load_dropped(egui::DroppedFile {
            name: "ghost.glb".to_string(),
            ..Default::default()
        });
        assert_eq!(app.controller.state(), ViewerState::Empty);
        assert!(app.notice.is_some());
    }

    #[test]
    fn load_event_delivery_applies_framing_once() {
        use crate::viewer::widget::RenderWidget;
        use std::time::Instant;

        let mut app = ViewerApp::with_defaults();
        app.load_dropped(dropped("cube.glb", b"glTF"));
        app.deliver_load_events(Instant::now());
        assert!(app.pending_load.is_none());
        // Framing paused rotation; the restore timer is pending.
        assert!(!app.controller.widget_mut().unwrap().auto_rotate());
        assert!(app.controller.next_restore_due().is_some());

        // The widget reports readiness only once.
        app.pending_load = Some(99);
        app.deliver_load_events(Instant::now());
        assert_eq!(app.pending_load, Some(99));
    }
}
