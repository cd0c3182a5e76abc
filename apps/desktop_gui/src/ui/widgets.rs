use eframe::egui;

use super::theme::Palette;

/// Labeled single-line input. `read_only` greys the field out.
pub fn form_text_field(
    ui: &mut egui::Ui,
    id: &'static str,
    hint: &str,
    value: &mut String,
    read_only: bool,
) -> egui::Response {
    let edit = egui::TextEdit::singleline(value)
        .id_salt(id)
        .hint_text(
            egui::RichText::new(hint).color(ui.visuals().weak_text_color().gamma_multiply(0.85)),
        )
        .interactive(!read_only)
        .desired_width(f32::INFINITY);

    ui.add_sized([ui.available_width(), 32.0], edit)
}

/// Single-line edits give up focus when Enter is pressed, so Enter inside a
/// field shows up as the field losing focus in the same frame.
pub fn submitted_with_enter(ui: &egui::Ui, response: &egui::Response) -> bool {
    response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter))
}

pub fn primary_button(ui: &mut egui::Ui, palette: Palette, text: &str) -> egui::Response {
    let button = egui::Button::new(egui::RichText::new(text).strong().color(palette.base))
        .fill(palette.accent)
        .min_size(egui::vec2(ui.available_width(), 36.0));
    ui.add(button)
}

pub fn row_button(ui: &mut egui::Ui, palette: Palette, text: &str) -> egui::Response {
    let button = egui::Button::new(egui::RichText::new(text).color(palette.base))
        .fill(palette.accent)
        .min_size(egui::vec2(40.0, 20.0));
    ui.add(button)
}

pub fn page_heading(ui: &mut egui::Ui, palette: Palette, text: &str, size: f32) {
    ui.vertical_centered(|ui| {
        ui.label(egui::RichText::new(text).size(size).color(palette.accent));
    });
}

#[cfg(test)]
#[path = "../tests/widgets_tests.rs"]
mod tests;
