use crate::core::config::MapType;
use crate::layers::marker::MarkerIcon;
use egui::{Color32, FontId, Stroke};

/// Style configuration for map elements
#[derive(Debug, Clone)]
pub struct MapStyle {
    /// Graticule lines
    pub grid_stroke: Stroke,
    /// Colors for zoom and my-location controls
    pub controls: ControlStyle,
    /// Style for pins
    pub markers: MarkerStyle,
    /// Style for the device position dot
    pub my_location: MyLocationStyle,
    /// Pin title/snippet callout
    pub callout_font: FontId,
}

/// Style for on-map buttons
#[derive(Debug, Clone)]
pub struct ControlStyle {
    /// Background color for buttons
    pub background_color: Color32,
    /// Text color
    pub text_color: Color32,
    /// Border stroke
    pub border_stroke: Stroke,
    /// Button size
    pub button_size: f32,
    /// Margin from edge
    pub margin: f32,
    /// Corner rounding
    pub rounding: f32,
}

/// Style for map markers
#[derive(Debug, Clone)]
pub struct MarkerStyle {
    /// Radius of the pin head
    pub head_radius: f32,
    /// Distance from the tip to the head center
    pub height: f32,
    /// Border color
    pub border_color: Color32,
    /// Border width
    pub border_width: f32,
}

#[derive(Debug, Clone)]
pub struct MyLocationStyle {
    pub fill: Color32,
    pub halo: Color32,
    pub radius: f32,
}

impl Default for MapStyle {
    fn default() -> Self {
        Self {
            grid_stroke: Stroke::new(1.0, Color32::from_black_alpha(30)),
            controls: ControlStyle::default(),
            markers: MarkerStyle::default(),
            my_location: MyLocationStyle::default(),
            callout_font: FontId::proportional(12.0),
        }
    }
}

impl Default for ControlStyle {
    fn default() -> Self {
        Self {
            background_color: Color32::from_rgba_unmultiplied(255, 255, 255, 220),
            text_color: Color32::BLACK,
            border_stroke: Stroke::new(1.0, Color32::from_gray(100)),
            button_size: 30.0,
            margin: 10.0,
            rounding: 3.0,
        }
    }
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            head_radius: 9.0,
            height: 24.0,
            border_color: Color32::from_rgb(120, 0, 0),
            border_width: 1.0,
        }
    }
}

impl Default for MyLocationStyle {
    fn default() -> Self {
        Self {
            fill: Color32::from_rgb(66, 133, 244),
            halo: Color32::from_rgba_unmultiplied(66, 133, 244, 60),
            radius: 7.0,
        }
    }
}

impl MapStyle {
    /// Surface color per map type, standing in for tile imagery
    pub fn background(&self, map_type: MapType) -> Color32 {
        match map_type {
            MapType::Normal => Color32::from_rgb(232, 229, 216),
            MapType::Satellite => Color32::from_rgb(38, 52, 40),
            MapType::Terrain => Color32::from_rgb(214, 222, 190),
            MapType::Hybrid => Color32::from_rgb(52, 62, 48),
            MapType::None => Color32::from_gray(245),
        }
    }
}

impl MarkerStyle {
    /// Fill color for an icon's hue
    pub fn fill(&self, icon: &MarkerIcon) -> Color32 {
        egui::epaint::Hsva::new(icon.hue() / 360.0, 0.95, 0.9, 1.0).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pin_is_red() {
        let fill = MarkerStyle::default().fill(&MarkerIcon::default());
        assert!(fill.r() > 200);
        assert!(fill.g() < 80);
        assert!(fill.b() < 80);
    }

    #[test]
    fn test_backgrounds_differ() {
        let style = MapStyle::default();
        assert_ne!(style.background(MapType::Normal), style.background(MapType::Satellite));
    }
}
