use eframe::egui;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub base: egui::Color32,
    pub surface: egui::Color32,
    pub text: egui::Color32,
    pub accent: egui::Color32,
    pub accent_hover: egui::Color32,
    pub danger: egui::Color32,
}

impl Palette {
    pub fn macchiato() -> Self {
        Self {
            base: egui::Color32::from_rgb(36, 39, 58),
            surface: egui::Color32::from_rgb(54, 58, 79),
            text: egui::Color32::from_rgb(202, 211, 245),
            accent: egui::Color32::from_rgb(138, 173, 244),
            accent_hover: egui::Color32::from_rgb(125, 196, 228),
            danger: egui::Color32::from_rgb(237, 135, 150),
        }
    }
}

pub fn visuals_for_palette(palette: Palette) -> egui::Visuals {
    let mut visuals = egui::Visuals::dark();
    visuals.override_text_color = Some(palette.text);
    visuals.window_fill = palette.base;
    visuals.panel_fill = palette.base;
    visuals.extreme_bg_color = palette.surface;
    visuals.faint_bg_color = palette.surface;
    visuals.hyperlink_color = palette.accent;
    visuals.selection.bg_fill = palette.accent;
    visuals.widgets.inactive.weak_bg_fill = palette.surface;
    visuals.widgets.hovered.weak_bg_fill = palette.accent_hover;
    visuals.widgets.active.bg_fill = palette.accent;

    let radius = egui::CornerRadius::same(4);
    visuals.widgets.noninteractive.corner_radius = radius;
    visuals.widgets.inactive.corner_radius = radius;
    visuals.widgets.hovered.corner_radius = radius;
    visuals.widgets.active.corner_radius = radius;
    visuals.widgets.open.corner_radius = radius;

    visuals
}
