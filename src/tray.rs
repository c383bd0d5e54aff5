//! System-tray icon with "Show" and "Exit".
//!
//! The icon itself lives on the UI thread. A `tray-events` thread waits for
//! menu and click events and only ever forwards a `UserEvent` plus a repaint
//! request, so all window changes happen on the UI thread.

use log::info;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub struct TrayController {
    #[cfg(windows)]
    tray_icon: Option<tray_icon::TrayIcon>,
    stop: Arc<AtomicBool>,
}

impl TrayController {
    /// A controller with no icon, used when the tray is unavailable.
    pub fn disabled() -> Self {
        Self {
            #[cfg(windows)]
            tray_icon: None,
            stop: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_running(&self) -> bool {
        !self.stop.load(Ordering::SeqCst)
    }

    /// Ends the event thread and removes the icon. Safe to call repeatedly.
    pub fn stop(&mut self) {
        if !self.stop.swap(true, Ordering::SeqCst) {
            info!("Stopping tray icon");
        }
        #[cfg(windows)]
        {
            self.tray_icon = None;
        }
    }
}

impl Drop for TrayController {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(windows)]
mod platform {
    use super::TrayController;
    use crate::branding::APP_DISPLAY_NAME;
    use crate::error::{AppError, Result};
    use crate::events::UserEvent;
    use crate::icons::tray_icon_rgba;
    use crossbeam_channel::select;
    use eframe::egui;
    use log::{error, info};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::mpsc::Sender;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;
    use tray_icon::menu::{Menu, MenuEvent, MenuId, MenuItem};
    use tray_icon::{Icon, MouseButton, MouseButtonState, TrayIconBuilder, TrayIconEvent};

    const POLL_INTERVAL: Duration = Duration::from_millis(200);

    enum Polled {
        Event(UserEvent),
        Idle,
        Closed(&'static str),
    }

    impl TrayController {
        pub fn start(ctx: &egui::Context, ui_tx: Sender<UserEvent>) -> Result<Self> {
            let (rgba, width, height) = tray_icon_rgba();
            let icon = Icon::from_rgba(rgba, width, height)
                .map_err(|err| AppError::Tray(err.to_string()))?;

            let tray_menu = Menu::new();
            let show_item = MenuItem::new("Show", true, None);
            let exit_item = MenuItem::new("Exit", true, None);
            tray_menu
                .append_items(&[&show_item, &exit_item])
                .map_err(|err| AppError::Tray(err.to_string()))?;

            let tray_icon = TrayIconBuilder::new()
                .with_menu(Box::new(tray_menu))
                .with_tooltip(APP_DISPLAY_NAME)
                .with_icon(icon)
                .build()
                .map_err(|err| AppError::Tray(err.to_string()))?;

            let stop = Arc::new(AtomicBool::new(false));
            spawn_tray_event_loop(
                ui_tx,
                ctx.clone(),
                show_item.id().clone(),
                exit_item.id().clone(),
                stop.clone(),
            )?;
            info!("Tray icon started");

            Ok(Self {
                tray_icon: Some(tray_icon),
                stop,
            })
        }
    }

    fn spawn_tray_event_loop(
        ui_tx: Sender<UserEvent>,
        ctx: egui::Context,
        show_id: MenuId,
        exit_id: MenuId,
        stop: Arc<AtomicBool>,
    ) -> Result<()> {
        thread::Builder::new()
            .name("tray-events".into())
            .spawn(move || {
                let menu_rx = MenuEvent::receiver();
                let tray_rx = TrayIconEvent::receiver();
                while !stop.load(Ordering::SeqCst) {
                    let polled = select! {
                        recv(menu_rx) -> event => match event {
                            Ok(event) if event.id == show_id => Polled::Event(UserEvent::Show),
                            Ok(event) if event.id == exit_id => Polled::Event(UserEvent::Exit),
                            Ok(_) => Polled::Idle,
                            Err(_) => Polled::Closed("menu"),
                        },
                        recv(tray_rx) -> event => match event {
                            Ok(TrayIconEvent::Click {
                                button: MouseButton::Left,
                                button_state: MouseButtonState::Up,
                                ..
                            }) => Polled::Event(UserEvent::Show),
                            Ok(_) => Polled::Idle,
                            Err(_) => Polled::Closed("tray"),
                        },
                        default(POLL_INTERVAL) => Polled::Idle,
                    };

                    match polled {
                        Polled::Event(event) => {
                            if ui_tx.send(event).is_err() {
                                break;
                            }
                            ctx.request_repaint();
                        }
                        Polled::Idle => {}
                        Polled::Closed(source) => {
                            error!("{source} event channel closed");
                            break;
                        }
                    }
                }
                info!("Tray event loop finished");
            })?;
        Ok(())
    }
}

#[cfg(not(windows))]
mod platform {
    use super::TrayController;
    use crate::error::Result;
    use crate::events::UserEvent;
    use eframe::egui;
    use log::info;
    use std::sync::mpsc::Sender;

    impl TrayController {
        pub fn start(_ctx: &egui::Context, _ui_tx: Sender<UserEvent>) -> Result<Self> {
            info!("System tray is not supported on this platform; continuing without it");
            Ok(Self::disabled())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_controller_is_not_running() {
        let mut tray = TrayController::disabled();
        assert!(!tray.is_running());
        tray.stop();
        tray.stop();
        assert!(!tray.is_running());
    }

    #[test]
    fn stop_is_idempotent() {
        let mut tray = TrayController {
            #[cfg(windows)]
            tray_icon: None,
            stop: Arc::new(AtomicBool::new(false)),
        };
        assert!(tray.is_running());
        tray.stop();
        assert!(!tray.is_running());
        tray.stop();
        assert!(!tray.is_running());
    }

    #[cfg(not(windows))]
    #[test]
    fn unsupported_platform_degrades_to_disabled() {
        let (tx, _rx) = std::sync::mpsc::channel();
        let tray = TrayController::start(&eframe::egui::Context::default(), tx).unwrap();
        assert!(!tray.is_running());
    }
}
