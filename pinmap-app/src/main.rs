use pinmap::{
    core::geo::LatLng,
    location::SimulatedLocationProvider,
    permission::{Permission, PermissionProvider, PromptPolicy, SimulatedPermissions},
    LifecycleEvent, MapScreen, MapView, ScreenConfig,
};
use std::sync::Arc;

/// Standalone host for the marker screen
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pinmap::init_logging();

    let config = match std::env::args().nth(1) {
        Some(path) => ScreenConfig::from_json_str(&std::fs::read_to_string(path)?)?,
        None => ScreenConfig::default(),
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_title("Pinmap"),
        ..Default::default()
    };

    eframe::run_native(
        "pinmap-app",
        options,
        Box::new(move |_cc| Box::new(PinmapApp::new(config))),
    )
    .map_err(|e| anyhow::anyhow!("eframe: {e}"))?;

    Ok(())
}

struct PinmapApp {
    screen: MapScreen,
    permissions: SimulatedPermissions,
    location: SimulatedLocationProvider,
    emitter: tokio::task::JoinHandle<()>,
    focused: bool,
    show_debug_panel: bool,
}

impl PinmapApp {
    fn new(config: ScreenConfig) -> Self {
        let origin = LatLng::new(42.3505, -71.1054);
        let permissions = SimulatedPermissions::not_granted(PromptPolicy::Manual);
        let location =
            SimulatedLocationProvider::new(permissions.clone()).with_last_known(Some(origin));
        let emitter = location.spawn_emitter(origin);

        let mut screen = MapScreen::new(
            config,
            Arc::new(permissions.clone()),
            Arc::new(location.clone()),
        );
        screen.on_lifecycle(LifecycleEvent::Mount);
        screen.on_lifecycle(LifecycleEvent::Active);

        Self {
            screen,
            permissions,
            location,
            emitter,
            focused: true,
            show_debug_panel: true,
        }
    }

    fn permission_prompt(&mut self, ctx: &egui::Context) {
        if self.permissions.pending_prompt().is_none() {
            return;
        }
        egui::Window::new("Location permission")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label("Allow Pinmap to access this device's precise location?");
                ui.horizontal(|ui| {
                    if ui.button("Allow").clicked() {
                        self.permissions.respond(true);
                    }
                    if ui.button("Deny").clicked() {
                        self.permissions.respond(false);
                    }
                });
            });
    }

    fn debug_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("debug_panel")
            .resizable(true)
            .show(ctx, |ui| {
                ui.heading("Debug Info");
                ui.separator();

                let camera = self.screen.camera();
                ui.label(format!("Permission: {:?}", self.screen.permission_status()));
                ui.label(format!("Active: {}", self.screen.is_active()));
                ui.label(format!("Subscribed: {}", self.screen.is_subscribed()));
                ui.label(format!(
                    "Provider subscriptions: {}",
                    self.location.active_subscriptions()
                ));
                ui.label(format!(
                    "Center: {:.4}, {:.4} | Zoom: {:.2}",
                    camera.center.lat, camera.center.lng, camera.zoom
                ));
                if let Some(fix) = self.location.last_known() {
                    ui.label(format!("Device: {fix}"));
                }

                ui.separator();
                ui.heading(format!("Markers ({})", self.screen.markers().len()));
                match self.screen.markers().to_json() {
                    Ok(json) => {
                        egui::ScrollArea::vertical().show(ui, |ui| {
                            ui.monospace(json);
                        });
                    }
                    Err(e) => {
                        ui.colored_label(egui::Color32::RED, e.to_string());
                    }
                }

                ui.separator();
                if ui.button("Revoke permission").clicked() {
                    self.permissions.revoke(Permission::FineLocation);
                }
                if ui.button("Remount screen").clicked() {
                    self.screen.on_lifecycle(LifecycleEvent::Unmount);
                    self.screen.on_lifecycle(LifecycleEvent::Mount);
                    if self.focused {
                        self.screen.on_lifecycle(LifecycleEvent::Active);
                    }
                }
            });
    }
}

impl eframe::App for PinmapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let focused = ctx.input(|i| i.focused);
        if focused != self.focused {
            self.focused = focused;
            self.screen.on_lifecycle(if focused {
                LifecycleEvent::Active
            } else {
                LifecycleEvent::Inactive
            });
        }

        if self.screen.poll() {
            ctx.request_repaint();
        }

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("View", |ui| {
                    ui.checkbox(&mut self.show_debug_panel, "Debug Panel");
                });
                ui.separator();
                ui.label(format!(
                    "{} on fine location",
                    if self.permissions.check(Permission::FineLocation).is_granted() {
                        "Granted"
                    } else {
                        "No grant"
                    }
                ));
            });
        });

        if self.show_debug_panel {
            self.debug_panel(ctx);
        }

        self.permission_prompt(ctx);

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                if self.screen.is_map_visible() {
                    ui.add(MapView::new(&mut self.screen));
                }
            });

        // Pick up emitter fixes even when idle
        ctx.request_repaint_after(std::time::Duration::from_millis(500));
    }
}

impl Drop for PinmapApp {
    fn drop(&mut self) {
        self.screen.on_lifecycle(LifecycleEvent::Inactive);
        self.screen.on_lifecycle(LifecycleEvent::Unmount);
        self.emitter.abort();
        log::info!("pinmap closed with {} marker(s)", self.screen.markers().len());
    }
}
