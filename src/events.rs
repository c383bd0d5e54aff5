use eframe::egui;

/// Messages delivered to the UI thread from the tray and icon worker threads.
#[derive(Debug)]
pub enum UserEvent {
    Show,
    Exit,
    IconReady(IconResult),
}

/// Work for the favicon worker. `generation` ties each request to one
/// render pass so results from before a re-render can be discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconCommand {
    Reset { generation: u64, icon_size: u32 },
    Fetch { generation: u64, url: String },
}

#[derive(Debug)]
pub struct IconResult {
    pub generation: u64,
    pub url: String,
    pub image: egui::ColorImage,
}
