use crate::{
    core::geo::{LatLng, Point},
    input::events::InputEvent,
    layers::marker::PinDescriptor,
    ui::screen::MapScreen,
    ui::style::{ControlStyle, MapStyle},
};
use egui::{Align2, Color32, Painter, Pos2, Rect, Response, Sense, Shape, Stroke, Ui, Vec2, Widget};

/// Zoom levels per scroll pixel
const SCROLL_ZOOM_RATE: f64 = 0.002;

/// Target spacing of graticule lines in pixels
const GRID_SPACING_PX: f64 = 120.0;

/// egui surface for a [`MapScreen`]
///
/// Draws the map, the device position, and one pin per marker, and feeds
/// taps and gestures back into the screen. Draws nothing while the screen's
/// map is hidden.
///
/// ```rust,ignore
/// screen.poll();
/// ui.add(pinmap::MapView::new(&mut screen));
/// ```
pub struct MapView<'a> {
    screen: &'a mut MapScreen,
    style: MapStyle,
    size: Option<Vec2>,
}

impl<'a> MapView<'a> {
    pub fn new(screen: &'a mut MapScreen) -> Self {
        Self {
            screen,
            style: MapStyle::default(),
            size: None,
        }
    }

    pub fn style(mut self, style: MapStyle) -> Self {
        self.style = style;
        self
    }

    pub fn size(mut self, size: Vec2) -> Self {
        self.size = Some(size);
        self
    }

    fn to_screen(&self, rect: Rect, lat_lng: &LatLng) -> Pos2 {
        let p = self.screen.camera().lat_lng_to_screen(lat_lng);
        rect.min + Vec2::new(p.x as f32, p.y as f32)
    }

    fn paint_grid(&self, painter: &Painter, rect: Rect) {
        let camera = self.screen.camera();
        let step = grid_step_degrees(camera.zoom, GRID_SPACING_PX);
        let nw = camera.screen_to_lat_lng(Point::new(0.0, 0.0));
        let se = camera.screen_to_lat_lng(Point::new(rect.width() as f64, rect.height() as f64));

        // Longitudes run unwrapped from the west edge so lines continue across ±180
        let half_span = camera.visible_lng_span() / 2.0;
        let east = camera.center.lng + half_span;
        let mut lng = ((camera.center.lng - half_span) / step).floor() * step;
        for _ in 0..256 {
            if lng > east {
                break;
            }
            let x = self.to_screen(rect, &LatLng::new(camera.center.lat, lng)).x;
            painter.line_segment(
                [Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())],
                self.style.grid_stroke,
            );
            lng += step;
        }

        let mut lat = (se.lat / step).floor() * step;
        for _ in 0..256 {
            if lat > nw.lat {
                break;
            }
            let y = self.to_screen(rect, &LatLng::new(lat, camera.center.lng)).y;
            painter.line_segment(
                [Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)],
                self.style.grid_stroke,
            );
            lat += step;
        }
    }

    fn paint_my_location(&self, painter: &Painter, rect: Rect) {
        let Some(position) = self.screen.my_location() else {
            return;
        };
        let center = self.to_screen(rect, &position);
        let style = &self.style.my_location;
        painter.circle_filled(center, style.radius * 2.5, style.halo);
        painter.circle_filled(center, style.radius, style.fill);
        painter.circle_stroke(center, style.radius, Stroke::new(2.0, Color32::WHITE));
    }

    /// Paints one pin and returns the hit circle of its head
    fn paint_pin(&self, painter: &Painter, rect: Rect, pin: &PinDescriptor) -> (Pos2, f32) {
        let style = &self.style.markers;
        let tip = self.to_screen(rect, &pin.position);
        let head = tip - Vec2::new(0.0, style.height);
        let r = style.head_radius;
        let fill = style.fill(&pin.icon);
        let border = Stroke::new(style.border_width, style.border_color);

        painter.add(Shape::convex_polygon(
            vec![
                head + Vec2::new(-r * 0.85, r * 0.5),
                head + Vec2::new(r * 0.85, r * 0.5),
                tip,
            ],
            fill,
            border,
        ));
        painter.circle_filled(head, r, fill);
        painter.circle_stroke(head, r, border);
        painter.circle_filled(head, r * 0.35, style.border_color);
        (head, r)
    }

    fn paint_callout(&self, painter: &Painter, anchor: Pos2, pin: &PinDescriptor) {
        let background = painter.add(Shape::Noop);
        let text_rect = painter.text(
            anchor,
            Align2::CENTER_BOTTOM,
            format!("{}\n{}", pin.title, pin.snippet),
            self.style.callout_font.clone(),
            Color32::BLACK,
        );
        painter.set(
            background,
            Shape::rect_filled(text_rect.expand(4.0), 3.0, Color32::WHITE),
        );
    }

    fn paint_button(&self, painter: &Painter, rect: Rect, label: &str) {
        let style = &self.style.controls;
        painter.rect_filled(rect, style.rounding, style.background_color);
        painter.rect_stroke(rect, style.rounding, style.border_stroke);
        painter.text(
            rect.center(),
            Align2::CENTER_CENTER,
            label,
            egui::FontId::proportional(16.0),
            style.text_color,
        );
    }
}

/// Screen rectangles of the on-map buttons
#[derive(Debug, Clone, Copy)]
struct ControlLayout {
    zoom_in: Option<Rect>,
    zoom_out: Option<Rect>,
    my_location: Option<Rect>,
}

impl ControlLayout {
    fn new(rect: Rect, style: &ControlStyle, zoom_controls: bool, my_location_button: bool) -> Self {
        let size = Vec2::splat(style.button_size);
        let right = rect.right() - style.margin - style.button_size;
        let my_location = my_location_button
            .then(|| Rect::from_min_size(Pos2::new(right, rect.top() + style.margin), size));
        let zoom_in = zoom_controls.then(|| {
            Rect::from_min_size(
                Pos2::new(right, rect.bottom() - style.margin - 2.0 * style.button_size - 5.0),
                size,
            )
        });
        let zoom_out = zoom_controls.then(|| {
            Rect::from_min_size(
                Pos2::new(right, rect.bottom() - style.margin - style.button_size),
                size,
            )
        });
        Self {
            zoom_in,
            zoom_out,
            my_location,
        }
    }

    fn hit(&self, pos: Pos2) -> bool {
        [self.zoom_in, self.zoom_out, self.my_location]
            .into_iter()
            .flatten()
            .any(|r| r.contains(pos))
    }
}

/// Round graticule step (1, 2, or 5 times a power of ten degrees) giving
/// at least `target_px` between lines at `zoom`
fn grid_step_degrees(zoom: f64, target_px: f64) -> f64 {
    let world_px = crate::core::constants::TILE_SIZE as f64 * 2_f64.powf(zoom);
    let raw = target_px * 360.0 / world_px;
    let magnitude = 10_f64.powf(raw.log10().floor());
    [1.0, 2.0, 5.0, 10.0]
        .into_iter()
        .map(|m| m * magnitude)
        .find(|step| *step >= raw)
        .unwrap_or(10.0 * magnitude)
        .min(90.0)
}

impl<'a> Widget for MapView<'a> {
    fn ui(mut self, ui: &mut Ui) -> Response {
        let desired_size = self.size.unwrap_or_else(|| ui.available_size());
        let (rect, response) = ui.allocate_exact_size(desired_size, Sense::click_and_drag());

        if !self.screen.is_map_visible() {
            return response;
        }

        let size = Point::new(rect.width() as f64, rect.height() as f64);
        if self.screen.camera().size != size {
            self.screen.handle_input(&InputEvent::Resize { size });
        }
        let local = |pos: Pos2| Point::new((pos.x - rect.min.x) as f64, (pos.y - rect.min.y) as f64);

        let settings = self.screen.config().ui_settings.clone();
        let controls = ControlLayout::new(
            rect,
            &self.style.controls,
            settings.zoom_controls_enabled,
            settings.my_location_button_enabled && self.screen.my_location_layer_enabled(),
        );

        for (button, event) in [
            (controls.zoom_in, InputEvent::ZoomIn),
            (controls.zoom_out, InputEvent::ZoomOut),
            (controls.my_location, InputEvent::MyLocationButton),
        ] {
            if let Some(button_rect) = button {
                if ui.allocate_rect(button_rect, Sense::click()).clicked() {
                    self.screen.handle_input(&event);
                }
            }
        }

        if response.dragged() {
            let delta = response.drag_delta();
            self.screen.handle_input(&InputEvent::Drag {
                delta: Point::new(delta.x as f64, delta.y as f64),
            });
        }

        if response.hovered() {
            let scroll = ui.input(|i| i.raw_scroll_delta.y);
            if scroll.abs() > 0.1 {
                if let Some(pos) = response.hover_pos() {
                    self.screen.handle_input(&InputEvent::Scroll {
                        delta: scroll as f64 * SCROLL_ZOOM_RATE,
                        position: local(pos),
                    });
                }
            }
        }

        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                if !controls.hit(pos) {
                    self.screen.handle_input(&InputEvent::Click {
                        position: local(pos),
                    });
                }
            }
        }

        let painter = ui.painter_at(rect);
        painter.rect_filled(
            rect,
            0.0,
            self.style.background(self.screen.config().properties.map_type),
        );
        self.paint_grid(&painter, rect);
        self.paint_my_location(&painter, rect);

        let hover = response.hover_pos();
        let mut callout = None;
        for pin in self.screen.pins() {
            let (head, r) = self.paint_pin(&painter, rect, &pin);
            if hover.is_some_and(|p| p.distance(head) <= r) {
                callout = Some((head - Vec2::new(0.0, r + 4.0), pin));
            }
        }
        if let Some((anchor, pin)) = callout {
            self.paint_callout(&painter, anchor, &pin);
        }

        if let Some(r) = controls.zoom_in {
            self.paint_button(&painter, r, "+");
        }
        if let Some(r) = controls.zoom_out {
            self.paint_button(&painter, r, "-");
        }
        if let Some(r) = controls.my_location {
            self.paint_button(&painter, r, "◎");
        }

        if self.screen.camera().is_animating() {
            ui.ctx().request_repaint();
        }

        response
    }
}

pub trait MapViewExt {
    fn map_view(&mut self, screen: &mut MapScreen) -> Response;
}

impl MapViewExt for Ui {
    fn map_view(&mut self, screen: &mut MapScreen) -> Response {
        self.add(MapView::new(screen))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ScreenConfig;
    use crate::location::SimulatedLocationProvider;
    use crate::permission::{PromptPolicy, SimulatedPermissions};
    use std::sync::Arc;

    fn mounted_screen(permissions: SimulatedPermissions) -> MapScreen {
        let location = SimulatedLocationProvider::new(permissions.clone());
        let mut screen = MapScreen::new(
            ScreenConfig::default(),
            Arc::new(permissions),
            Arc::new(location),
        );
        screen.on_mount();
        screen
    }

    fn run_frame(ctx: &egui::Context, screen: &mut MapScreen) -> Rect {
        let mut rect = Rect::NOTHING;
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                rect = ui.add(MapView::new(screen)).rect;
            });
        });
        rect
    }

    #[test]
    fn test_grid_step_is_round() {
        for zoom in [0.0, 3.5, 10.0, 15.0, 20.0] {
            let step = grid_step_degrees(zoom, GRID_SPACING_PX);
            let world_px = 256.0 * 2_f64.powf(zoom);
            assert!(step * world_px / 360.0 >= GRID_SPACING_PX * 0.999 || step == 90.0);
            let mantissa = step / 10_f64.powf(step.log10().floor());
            assert!(
                [1.0, 2.0, 5.0].iter().any(|m| (mantissa - m).abs() < 1e-6) || step == 90.0,
                "step {step} at zoom {zoom}"
            );
        }
    }

    #[test]
    fn test_control_hit_testing() {
        let rect = Rect::from_min_size(Pos2::ZERO, Vec2::new(800.0, 600.0));
        let layout = ControlLayout::new(rect, &ControlStyle::default(), true, true);
        let zoom_in = layout.zoom_in.unwrap();
        let zoom_out = layout.zoom_out.unwrap();
        let my_location = layout.my_location.unwrap();

        assert!(rect.contains_rect(zoom_in));
        assert!(rect.contains_rect(zoom_out));
        assert!(rect.contains_rect(my_location));
        assert!(!zoom_in.intersects(zoom_out));
        assert!(layout.hit(zoom_out.center()));
        assert!(!layout.hit(rect.center()));
    }

    #[test]
    fn test_disabled_controls_have_no_rects() {
        let rect = Rect::from_min_size(Pos2::ZERO, Vec2::new(800.0, 600.0));
        let layout = ControlLayout::new(rect, &ControlStyle::default(), false, false);
        assert!(layout.zoom_in.is_none());
        assert!(layout.my_location.is_none());
        assert!(!layout.hit(Pos2::new(780.0, 20.0)));
    }

    #[test]
    fn test_frame_sizes_camera_to_widget() {
        let ctx = egui::Context::default();
        let mut screen = mounted_screen(SimulatedPermissions::granted());
        let rect = run_frame(&ctx, &mut screen);
        assert!(rect.width() > 0.0);
        assert_eq!(screen.camera().size.x, rect.width() as f64);
        assert_eq!(screen.camera().size.y, rect.height() as f64);
    }

    #[test]
    fn test_hidden_map_leaves_camera_untouched() {
        let ctx = egui::Context::default();
        let mut screen = mounted_screen(SimulatedPermissions::not_granted(PromptPolicy::Deny));
        screen.poll();
        run_frame(&ctx, &mut screen);
        assert_eq!(screen.camera().size, Point::new(800.0, 600.0));
    }
}
