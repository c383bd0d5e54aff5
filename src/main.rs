#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]

mod app;
mod branding;
mod config;
mod context;
mod error;
mod events;
mod geometry;
mod icons;
mod logging;
mod prompts;
mod system;
mod tray;

use crate::app::{TaskbarApp, STARTUP_SIZE};
use crate::branding::APP_DISPLAY_NAME;
use crate::context::AppContext;
use crate::system::{ensure_startup_shortcut, StartupTarget};
use eframe::egui;
use log::{error, info};

fn main() -> error::Result<()> {
    let context = AppContext::resolve()?;
    let _log_guard = logging::init(&context.paths);
    info!(
        "Starting {APP_DISPLAY_NAME}, config at {}",
        context.paths.config_file.display()
    );

    let settings = context.store.load();
    register_startup(&context);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(APP_DISPLAY_NAME)
            .with_inner_size(STARTUP_SIZE)
            .with_decorations(false)
            .with_resizable(false)
            .with_always_on_top()
            .with_taskbar(false)
            .with_visible(true),
        ..Default::default()
    };

    eframe::run_native(
        APP_DISPLAY_NAME,
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::dark());
            install_font_fallback(&cc.egui_ctx);
            Ok(Box::new(TaskbarApp::new(cc, context, settings)))
        }),
    )?;
    info!("{APP_DISPLAY_NAME} closed");
    Ok(())
}

fn register_startup(context: &AppContext) {
    let result = StartupTarget::current()
        .and_then(|target| ensure_startup_shortcut(&context.paths.startup_shortcut, &target));
    match result {
        Ok(true) => {}
        Ok(false) => info!(
            "Startup shortcut already present at {}",
            context.paths.startup_shortcut.display()
        ),
        Err(err) => error!("Failed to create startup shortcut: {err}"),
    }
}

/// Appends the first installed CJK system font as a fallback so link names in
/// any script still render.
fn install_font_fallback(ctx: &egui::Context) {
    const CANDIDATES: [(&str, &str); 4] = [
        ("yahei", r"C:\Windows\Fonts\msyh.ttc"),
        ("malgun", r"C:\Windows\Fonts\malgun.ttf"),
        ("noto_cjk", "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc"),
        ("droid_fallback", "/usr/share/fonts/truetype/droid/DroidSansFallbackFull.ttf"),
    ];

    let Some((name, data)) = CANDIDATES
        .iter()
        .find_map(|(name, path)| std::fs::read(path).ok().map(|data| (*name, data)))
    else {
        return;
    };

    let mut fonts = egui::FontDefinitions::default();
    fonts
        .font_data
        .insert(name.to_owned(), egui::FontData::from_owned(data));
    for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
        if let Some(fonts_in_family) = fonts.families.get_mut(&family) {
            fonts_in_family.push(name.to_owned());
        }
    }
    ctx.set_fonts(fonts);
}
