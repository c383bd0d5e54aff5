use eframe::egui::{self, Color32};

pub const WINDOW_BG: Color32 = Color32::from_rgb(0x1e, 0x1e, 0x1e);
pub const PANEL_BG: Color32 = Color32::from_rgb(0x2d, 0x2d, 0x2d);
pub const BUTTON_BG: Color32 = Color32::from_rgb(0x3c, 0x3f, 0x41);
pub const BUTTON_HOVER: Color32 = Color32::from_rgb(0x5c, 0x5f, 0x61);
pub const BUTTON_TEXT: Color32 = Color32::WHITE;
pub const MENU_BG: Color32 = BUTTON_BG;
pub const ERROR_TEXT: Color32 = Color32::from_rgb(240, 110, 100);

pub const PANEL_PADDING: f32 = 4.0;
pub const BUTTON_SPACING: f32 = 4.0;
pub const MENU_WIDTH: f32 = 190.0;
pub const MENU_ROW_HEIGHT: f32 = 24.0;
pub const MENU_SEPARATOR_HEIGHT: f32 = 9.0;
pub const DIALOG_SIZE: egui::Vec2 = egui::vec2(380.0, 220.0);

/// Flat dark buttons that lighten on hover.
pub fn style_link_buttons(ui: &mut egui::Ui) {
    let visuals = ui.visuals_mut();
    for (state, fill) in [
        (&mut visuals.widgets.inactive, BUTTON_BG),
        (&mut visuals.widgets.hovered, BUTTON_HOVER),
        (&mut visuals.widgets.active, BUTTON_HOVER),
    ] {
        state.weak_bg_fill = fill;
        state.bg_fill = fill;
        state.bg_stroke = egui::Stroke::NONE;
        state.fg_stroke.color = BUTTON_TEXT;
        state.expansion = 0.0;
    }

    let style = ui.style_mut();
    style.spacing.item_spacing = egui::vec2(BUTTON_SPACING, BUTTON_SPACING);
    style.spacing.button_padding = egui::vec2(10.0, 5.0);
}

pub fn style_menu(ui: &mut egui::Ui) {
    let visuals = ui.visuals_mut();
    visuals.widgets.noninteractive.bg_stroke.color = BUTTON_HOVER;
    visuals.widgets.inactive.weak_bg_fill = Color32::TRANSPARENT;
    visuals.widgets.inactive.bg_stroke = egui::Stroke::NONE;
    visuals.widgets.inactive.fg_stroke.color = BUTTON_TEXT;
    visuals.widgets.hovered.weak_bg_fill = BUTTON_HOVER;
    visuals.widgets.hovered.bg_stroke = egui::Stroke::NONE;
    visuals.widgets.hovered.fg_stroke.color = BUTTON_TEXT;
    visuals.widgets.active.weak_bg_fill = BUTTON_HOVER;
    visuals.widgets.active.fg_stroke.color = BUTTON_TEXT;

    let style = ui.style_mut();
    style.spacing.item_spacing = egui::vec2(0.0, 0.0);
    style.spacing.button_padding = egui::vec2(10.0, 4.0);
}
