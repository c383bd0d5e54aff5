mod menu;
mod state;
mod style;
mod ui;

use crate::config::{Settings, SnapPosition};
use crate::context::AppContext;
use crate::error::AppError;
use crate::events::UserEvent;
use crate::geometry::{self, MonitorRect};
use crate::icons::{spawn_icon_worker, GoogleFavicons};
use crate::prompts::{Action, Flow, FlowKind, Notice, Transition};
use crate::system;
use crate::tray::TrayController;
use eframe::egui;
use log::{debug, error, info, warn};
use menu::MenuCommand;
use state::{DialogBody, DialogState, DragState, IconBoard, MenuState};
use std::sync::mpsc::{self, Receiver};

/// Initial window size in points, used until the first snap has run.
pub const STARTUP_SIZE: [f32; 2] = [800.0, 60.0];
const FALLBACK_MONITOR_SIZE: egui::Vec2 = egui::vec2(1920.0, 1080.0);

pub struct TaskbarApp {
    context: AppContext,
    settings: Settings,
    tray: TrayController,
    rx: Receiver<UserEvent>,
    icons: IconBoard,
    needs_initial_snap: bool,
    drag: Option<DragState>,
    menu: Option<MenuState>,
    dialog: Option<DialogState>,
}

impl TaskbarApp {
    pub fn new(cc: &eframe::CreationContext<'_>, context: AppContext, settings: Settings) -> Self {
        let (ui_tx, ui_rx) = mpsc::channel::<UserEvent>();
        let (icon_tx, icon_rx) = mpsc::channel();

        spawn_icon_worker(
            icon_rx,
            ui_tx.clone(),
            cc.egui_ctx.clone(),
            GoogleFavicons::new(),
            settings.icon_size,
        );

        let tray = TrayController::start(&cc.egui_ctx, ui_tx).unwrap_or_else(|err| {
            error!("{err}");
            TrayController::disabled()
        });

        Self {
            icons: IconBoard::new(icon_tx, settings.icon_size),
            context,
            settings,
            tray,
            rx: ui_rx,
            needs_initial_snap: true,
            drag: None,
            menu: None,
            dialog: None,
        }
    }

    fn handle_runtime_events(&mut self, ctx: &egui::Context) {
        while let Ok(event) = self.rx.try_recv() {
            match event {
                UserEvent::Show => {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Visible(true));
                    ctx.send_viewport_cmd(egui::ViewportCommand::Minimized(false));
                    ctx.send_viewport_cmd(egui::ViewportCommand::Focus);
                }
                UserEvent::Exit => self.exit(ctx),
                UserEvent::IconReady(result) => self.icons.accept(ctx, result),
            }
        }
    }

    fn exit(&mut self, ctx: &egui::Context) {
        info!("Exiting application...");
        self.tray.stop();
        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
    }

    fn run_menu_command(&mut self, ctx: &egui::Context, command: MenuCommand) {
        match command {
            MenuCommand::AddLink => self.begin_flow(ctx, FlowKind::AddLink),
            MenuCommand::EditLink => self.begin_flow(ctx, FlowKind::EditLink),
            MenuCommand::DeleteLink => self.begin_flow(ctx, FlowKind::DeleteLink),
            MenuCommand::Snap(edge) => self.set_snap(ctx, edge),
            MenuCommand::Configure => self.begin_flow(ctx, FlowKind::Configure),
            MenuCommand::Backup => self.backup(ctx),
            MenuCommand::Restore => {
                if self.context.store.backup_exists() {
                    self.begin_flow(ctx, FlowKind::Restore);
                } else {
                    warn!(
                        "No backup at {}",
                        self.context.store.backup_file().display()
                    );
                    self.show_notice(ctx, Notice::error("Restore Error", "No backup file found."));
                }
            }
            MenuCommand::Hide if self.tray.is_running() => {
                ctx.send_viewport_cmd(egui::ViewportCommand::Minimized(true));
            }
            MenuCommand::Hide => self.show_notice(
                ctx,
                Notice::error("Hide to Tray", "The system tray is not available."),
            ),
            MenuCommand::Exit => self.exit(ctx),
        }
    }

    fn begin_flow(&mut self, ctx: &egui::Context, kind: FlowKind) {
        let transition = Flow::begin(kind, &self.settings);
        self.handle_transition(ctx, transition);
    }

    fn handle_transition(&mut self, ctx: &egui::Context, transition: Transition) {
        match transition {
            Transition::Ask(flow) => self.open_dialog(ctx, DialogBody::prompt(flow)),
            Transition::Finish(action) => self.apply_action(ctx, action),
            Transition::Notify(notice) => self.show_notice(ctx, notice),
            Transition::Abort => debug!("Prompt cancelled"),
        }
    }

    fn show_notice(&mut self, ctx: &egui::Context, notice: Notice) {
        self.open_dialog(ctx, DialogBody::Notice(notice));
    }

    fn open_dialog(&mut self, ctx: &egui::Context, body: DialogBody) {
        let origin = match &self.dialog {
            Some(open) => open.origin,
            None => self.dialog_origin(ctx),
        };
        self.menu = None;
        self.dialog = Some(DialogState::new(body, origin));
    }

    fn dialog_origin(&self, ctx: &egui::Context) -> egui::Pos2 {
        let ppp = pixels_per_point(ctx);
        let monitor = self.target_monitor(ctx);
        let size = style::DIALOG_SIZE * ppp;
        let x = monitor.x + (monitor.width - size.x as i32) / 2;
        let y = monitor.y + (monitor.height - size.y as i32) / 3;
        egui::pos2(x as f32 / ppp, y as f32 / ppp)
    }

    fn apply_action(&mut self, ctx: &egui::Context, action: Action) {
        match action {
            Action::Restore => self.restore(ctx),
            action @ Action::Configure { .. } => {
                self.settings.apply(action);
                self.snap_to_edge(ctx);
            }
            action => {
                if self.settings.apply(action) {
                    self.render_links();
                    self.persist();
                }
            }
        }
    }

    fn backup(&mut self, ctx: &egui::Context) {
        let notice = match self.context.store.backup() {
            Ok(path) => Notice::info(
                "Backup",
                format!(
                    "Backup successful.\nBackup file created at:\n{}",
                    path.display()
                ),
            ),
            Err(AppError::NoConfigFile(_)) => {
                Notice::error("Backup Error", "No configuration file found to backup.")
            }
            Err(err) => {
                error!("Backup failed: {err}");
                Notice::error(
                    "Backup Error",
                    format!("Failed to create backup.\nError: {err}"),
                )
            }
        };
        self.show_notice(ctx, notice);
    }

    fn restore(&mut self, ctx: &egui::Context) {
        let notice = match self.context.store.restore() {
            Ok(restored) => {
                self.settings = restored;
                self.snap_to_edge(ctx);
                Notice::info("Restore", "Settings restored from backup.")
            }
            Err(AppError::NoBackupFile(_)) => Notice::error("Restore Error", "No backup file found."),
            Err(err) => {
                error!("Restore failed: {err}");
                Notice::error(
                    "Restore Error",
                    format!("Failed to restore backup.\nError: {err}"),
                )
            }
        };
        self.show_notice(ctx, notice);
    }

    fn set_snap(&mut self, ctx: &egui::Context, edge: SnapPosition) {
        self.settings.snap_position = edge;
        self.snap_to_edge(ctx);
    }

    /// Moves and resizes the panel against the configured edge, then
    /// re-renders and saves.
    fn snap_to_edge(&mut self, ctx: &egui::Context) {
        let monitor = self.target_monitor(ctx);
        let rect = geometry::snap_rect(
            &monitor,
            self.settings.snap_position,
            self.settings.explicit_size(),
        );
        let ppp = pixels_per_point(ctx);
        ctx.send_viewport_cmd(egui::ViewportCommand::InnerSize(egui::vec2(
            rect.width as f32 / ppp,
            rect.height as f32 / ppp,
        )));
        ctx.send_viewport_cmd(egui::ViewportCommand::OuterPosition(egui::pos2(
            rect.x as f32 / ppp,
            rect.y as f32 / ppp,
        )));
        debug!(
            "Snapped to {} edge at {}x{}+{}+{}",
            self.settings.snap_position.label(),
            rect.width,
            rect.height,
            rect.x,
            rect.y
        );

        self.render_links();
        self.persist();
    }

    /// Drops every cached icon so the next frame rebuilds the buttons at the
    /// current icon size.
    fn render_links(&mut self) {
        self.icons.invalidate(self.settings.icon_size);
    }

    fn persist(&self) {
        if let Err(err) = self.context.store.save(&self.settings) {
            error!(
                "Failed to save settings to {}: {err}",
                self.context.store.config_file().display()
            );
        }
    }

    fn target_monitor(&self, ctx: &egui::Context) -> MonitorRect {
        let monitors = system::monitors();
        let index = self.settings.monitor_index;
        match geometry::pick_monitor(&monitors, index) {
            Some(monitor) => {
                if index >= monitors.len() {
                    warn!(
                        "Monitor {index} not found ({} attached), using the first one",
                        monitors.len()
                    );
                }
                monitor
            }
            None => viewport_monitor(ctx),
        }
    }
}

fn pixels_per_point(ctx: &egui::Context) -> f32 {
    ctx.input(|i| i.viewport().native_pixels_per_point)
        .filter(|ppp| ppp.is_finite() && *ppp > 0.0)
        .unwrap_or_else(|| ctx.pixels_per_point())
}

/// Geometry of the monitor the panel is on, as reported by the windowing
/// backend. Only the size is known, so the origin is assumed to be 0,0.
fn viewport_monitor(ctx: &egui::Context) -> MonitorRect {
    let ppp = pixels_per_point(ctx);
    let size = ctx
        .input(|i| i.viewport().monitor_size)
        .unwrap_or(FALLBACK_MONITOR_SIZE);
    MonitorRect {
        x: 0,
        y: 0,
        width: (size.x * ppp) as i32,
        height: (size.y * ppp) as i32,
    }
}
