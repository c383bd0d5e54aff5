use super::menu::{draw_entries, menu_size};
use super::state::{DialogBody, DragState, IconBoard, MenuState};
use super::style::{
    style_link_buttons, style_menu, DIALOG_SIZE, ERROR_TEXT, MENU_BG, PANEL_BG, PANEL_PADDING,
    WINDOW_BG,
};
use super::{pixels_per_point, TaskbarApp};
use crate::branding::APP_DISPLAY_NAME;
use crate::config::{Link, SnapPosition};
use crate::geometry;
use crate::prompts::{NoticeLevel, Prompt, Reply};
use crate::system;
use eframe::egui;
use log::{debug, info};

impl eframe::App for TaskbarApp {
    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        WINDOW_BG.to_normalized_gamma_f32()
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_runtime_events(ctx);

        if self.needs_initial_snap {
            self.needs_initial_snap = false;
            self.snap_to_edge(ctx);
        }

        self.draw_panel(ctx);
        self.draw_context_menu(ctx);
        self.draw_dialog(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.tray.stop();
    }
}

impl TaskbarApp {
    fn draw_panel(&mut self, ctx: &egui::Context) {
        let frame = egui::Frame::none()
            .fill(PANEL_BG)
            .inner_margin(egui::Margin::same(PANEL_PADDING));

        egui::CentralPanel::default().frame(frame).show(ctx, |ui| {
            let window_rect = ctx
                .input(|i| i.viewport().outer_rect)
                .unwrap_or(egui::Rect::ZERO);
            let background = ui.interact(
                ui.max_rect(),
                ui.id().with("panel_background"),
                egui::Sense::click_and_drag(),
            );

            let mut wants_menu = background.secondary_clicked();
            wants_menu |= self.draw_links(ui, ctx);

            self.handle_window_drag(ctx, &background, window_rect);
            if wants_menu {
                self.open_context_menu(ctx, window_rect);
            }
        });
    }

    /// Returns whether a button asked for the context menu.
    fn draw_links(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) -> bool {
        style_link_buttons(ui);
        let side = self.settings.icon_size as f32;
        let links = &self.settings.links;
        let icons = &mut self.icons;
        let mut clicks = ButtonClicks::default();

        match self.settings.snap_position {
            SnapPosition::Top => {
                egui::ScrollArea::horizontal()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        ui.horizontal_centered(|ui| {
                            for link in links {
                                let response = link_button(ui, ctx, icons, link, side, false);
                                clicks.record(&response, link);
                            }
                        });
                    });
            }
            SnapPosition::Left | SnapPosition::Right => {
                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        ui.vertical(|ui| {
                            for link in links {
                                let response = link_button(ui, ctx, icons, link, side, true);
                                clicks.record(&response, link);
                            }
                        });
                    });
            }
        }

        if let Some(url) = clicks.open {
            info!("Opening {url}");
            system::open_url(&url);
        }
        clicks.wants_menu
    }

    fn handle_window_drag(
        &mut self,
        ctx: &egui::Context,
        background: &egui::Response,
        window_rect: egui::Rect,
    ) {
        if background.drag_started_by(egui::PointerButton::Primary) {
            if let Some(hover_pos) = ctx.input(|i| i.pointer.hover_pos()) {
                self.drag = Some(DragState {
                    start_window_pos: window_rect.min,
                    start_global_mouse: window_rect.min + hover_pos.to_vec2(),
                });
            }
        }

        let Some(drag) = self.drag else {
            return;
        };

        if ctx.input(|i| i.pointer.button_released(egui::PointerButton::Primary)) {
            self.drag = None;
            self.finish_drag(ctx, window_rect);
            return;
        }

        if let Some(hover_pos) = ctx.input(|i| i.pointer.hover_pos()) {
            let current_global_mouse = window_rect.min + hover_pos.to_vec2();
            let new_pos = drag.start_window_pos + (current_global_mouse - drag.start_global_mouse);
            ctx.send_viewport_cmd(egui::ViewportCommand::OuterPosition(new_pos));
        }
    }

    fn finish_drag(&mut self, ctx: &egui::Context, window_rect: egui::Rect) {
        let ppp = pixels_per_point(ctx);
        let origin = (
            (window_rect.min.x * ppp).round() as i32,
            (window_rect.min.y * ppp).round() as i32,
        );
        let monitor = self.target_monitor(ctx);
        match geometry::snap_for_release(origin, &monitor) {
            Some(edge) => {
                info!("Released near the {} edge, snapping", edge.label());
                self.set_snap(ctx, edge);
            }
            None => debug!("Panel left floating at {origin:?}"),
        }
    }

    fn open_context_menu(&mut self, ctx: &egui::Context, window_rect: egui::Rect) {
        if self.dialog.is_some() {
            return;
        }
        let Some(pointer) = ctx.input(|i| i.pointer.interact_pos()) else {
            return;
        };

        let ppp = pixels_per_point(ctx);
        let anchor = window_rect.min + pointer.to_vec2();
        let size = menu_size() * ppp;
        let (x, y) = geometry::fit_popup(
            ((anchor.x * ppp) as i32, (anchor.y * ppp) as i32),
            (size.x as i32, size.y as i32),
            &self.target_monitor(ctx),
        );
        self.menu = Some(MenuState {
            origin: egui::pos2(x as f32 / ppp, y as f32 / ppp),
            seen_focus: false,
        });
    }

    fn draw_context_menu(&mut self, ctx: &egui::Context) {
        let Some(menu) = self.menu else {
            return;
        };

        let mut chosen = None;
        let mut dismissed = false;
        let mut focused = None;
        ctx.show_viewport_immediate(
            egui::ViewportId::from_hash_of("context_menu"),
            egui::ViewportBuilder::default()
                .with_title(APP_DISPLAY_NAME)
                .with_position(menu.origin)
                .with_inner_size(menu_size())
                .with_decorations(false)
                .with_resizable(false)
                .with_always_on_top()
                .with_taskbar(false),
            |ctx, _class| {
                if !menu.seen_focus {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Focus);
                }
                let frame = egui::Frame::none()
                    .fill(MENU_BG)
                    .inner_margin(egui::Margin::same(4.0));
                egui::CentralPanel::default().frame(frame).show(ctx, |ui| {
                    style_menu(ui);
                    chosen = draw_entries(ui);
                });
                ctx.input(|i| {
                    dismissed = i.key_pressed(egui::Key::Escape) || i.viewport().close_requested();
                    focused = i.viewport().focused;
                });
            },
        );

        if let Some(command) = chosen {
            self.menu = None;
            self.run_menu_command(ctx, command);
            return;
        }
        match (dismissed, focused) {
            (true, _) => self.menu = None,
            (false, Some(false)) if menu.seen_focus => self.menu = None,
            (false, Some(true)) => {
                if let Some(open) = self.menu.as_mut() {
                    open.seen_focus = true;
                }
            }
            _ => {}
        }
    }

    fn draw_dialog(&mut self, ctx: &egui::Context) {
        let Some(dialog) = self.dialog.as_mut() else {
            return;
        };

        let title = dialog.body.title().to_string();
        let mut reply = None;
        ctx.show_viewport_immediate(
            egui::ViewportId::from_hash_of("prompt"),
            egui::ViewportBuilder::default()
                .with_title(title)
                .with_position(dialog.origin)
                .with_inner_size(DIALOG_SIZE)
                .with_resizable(false)
                .with_minimize_button(false)
                .with_maximize_button(false)
                .with_always_on_top()
                .with_taskbar(false),
            |ctx, _class| {
                let fresh = std::mem::take(&mut dialog.fresh);
                if fresh {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Focus);
                }
                egui::CentralPanel::default().show(ctx, |ui| {
                    reply = match &dialog.body {
                        DialogBody::Notice(notice) => {
                            draw_notice(ui, notice.level, &notice.message)
                        }
                        DialogBody::Prompt { prompt, .. } => {
                            draw_prompt(ui, prompt, &mut dialog.input, fresh)
                        }
                    };
                });
                if ctx.input(|i| i.key_pressed(egui::Key::Escape) || i.viewport().close_requested()) {
                    reply = Some(Reply::Cancel);
                }
            },
        );

        let Some(reply) = reply else {
            return;
        };
        if let Some(closed) = self.dialog.take() {
            if let DialogBody::Prompt { flow, .. } = closed.body {
                let transition = flow.advance(reply);
                self.handle_transition(ctx, transition);
            }
        }
    }
}

#[derive(Default)]
struct ButtonClicks {
    open: Option<String>,
    wants_menu: bool,
}

impl ButtonClicks {
    fn record(&mut self, response: &egui::Response, link: &Link) {
        if response.clicked() {
            self.open = Some(link.url.clone());
        }
        if response.secondary_clicked() {
            self.wants_menu = true;
        }
    }
}

fn link_button(
    ui: &mut egui::Ui,
    ctx: &egui::Context,
    icons: &mut IconBoard,
    link: &Link,
    side: f32,
    full_width: bool,
) -> egui::Response {
    let texture = icons.texture_id(ctx, &link.url);
    let image = egui::Image::new(egui::load::SizedTexture::new(
        texture,
        egui::vec2(side, side),
    ));
    let mut button = egui::Button::image_and_text(image, link.name.as_str());
    if full_width {
        button = button.min_size(egui::vec2(ui.available_width(), 0.0));
    }
    ui.add(button).on_hover_text(link.url.as_str())
}

fn draw_notice(ui: &mut egui::Ui, level: NoticeLevel, message: &str) -> Option<Reply> {
    let text = egui::RichText::new(message);
    let text = match level {
        NoticeLevel::Info => text,
        NoticeLevel::Error => text.color(ERROR_TEXT),
    };
    egui::ScrollArea::vertical()
        .max_height(DIALOG_SIZE.y - 70.0)
        .show(ui, |ui| ui.label(text));
    ui.add_space(8.0);

    let ok = ui.button("OK").clicked();
    let enter = ui.input(|i| i.key_pressed(egui::Key::Enter));
    (ok || enter).then_some(Reply::Cancel)
}

fn draw_prompt(
    ui: &mut egui::Ui,
    prompt: &Prompt,
    input: &mut String,
    fresh: bool,
) -> Option<Reply> {
    let label = match prompt {
        Prompt::Confirm { message, .. } => {
            ui.label(message.as_str());
            ui.add_space(8.0);
            let mut reply = None;
            ui.horizontal(|ui| {
                if ui.button("Yes").clicked() {
                    reply = Some(Reply::Yes);
                }
                if ui.button("No").clicked() {
                    reply = Some(Reply::Cancel);
                }
            });
            return reply;
        }
        Prompt::Text { label, .. } | Prompt::Integer { label, .. } => label,
    };

    egui::ScrollArea::vertical()
        .max_height(DIALOG_SIZE.y - 100.0)
        .show(ui, |ui| ui.label(label.as_str()));
    ui.add_space(4.0);

    let response = ui.add(egui::TextEdit::singleline(input).desired_width(f32::INFINITY));
    if fresh {
        response.request_focus();
    }
    let valid = prompt.accepts(input);
    if let (false, Prompt::Integer { min, max, .. }) = (valid, prompt) {
        ui.colored_label(ERROR_TEXT, bounds_hint(*min, *max));
    }

    let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
    let mut reply = None;
    ui.horizontal(|ui| {
        if ui.add_enabled(valid, egui::Button::new("OK")).clicked() || (valid && submitted) {
            reply = Some(Reply::Submit(input.clone()));
        }
        if ui.button("Cancel").clicked() {
            reply = Some(Reply::Cancel);
        }
    });
    reply
}

fn bounds_hint(min: Option<i64>, max: Option<i64>) -> String {
    match (min, max) {
        (Some(min), Some(max)) => format!("Enter a whole number from {min} to {max}."),
        (Some(min), None) => format!("Enter a whole number of at least {min}."),
        (None, Some(max)) => format!("Enter a whole number of at most {max}."),
        (None, None) => "Enter a whole number.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hints_name_the_bounds() {
        assert_eq!(
            bounds_hint(Some(12), Some(64)),
            "Enter a whole number from 12 to 64."
        );
        assert_eq!(
            bounds_hint(Some(100), None),
            "Enter a whole number of at least 100."
        );
        assert_eq!(bounds_hint(None, None), "Enter a whole number.");
    }

    #[test]
    fn button_clicks_start_empty() {
        let clicks = ButtonClicks::default();
        assert!(clicks.open.is_none());
        assert!(!clicks.wants_menu);
    }
}
