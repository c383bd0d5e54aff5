use crate::events::{IconCommand, IconResult};
use crate::icons::placeholder_icon;
use crate::prompts::{Flow, Notice, Prompt};
use eframe::egui;
use log::{debug, warn};
use std::collections::{HashMap, HashSet};
use std::sync::mpsc::Sender;

/// Textures for the link buttons. Unknown URLs show the placeholder while
/// the favicon worker fetches them.
pub struct IconBoard {
    tx: Sender<IconCommand>,
    generation: u64,
    icon_size: u32,
    textures: HashMap<String, egui::TextureHandle>,
    requested: HashSet<String>,
    placeholder: Option<egui::TextureHandle>,
    worker_gone: bool,
}

impl IconBoard {
    pub fn new(tx: Sender<IconCommand>, icon_size: u32) -> Self {
        Self {
            tx,
            generation: 0,
            icon_size,
            textures: HashMap::new(),
            requested: HashSet::new(),
            placeholder: None,
            worker_gone: false,
        }
    }

    fn send(&mut self, command: IconCommand) {
        if self.tx.send(command).is_err() && !self.worker_gone {
            self.worker_gone = true;
            warn!("Favicon worker is not running; link icons stay as placeholders");
        }
    }

    /// Starts a new render pass: every texture is dropped and results still
    /// in flight for the previous pass will be ignored.
    pub fn invalidate(&mut self, icon_size: u32) {
        self.generation += 1;
        self.icon_size = icon_size;
        self.textures.clear();
        self.requested.clear();
        self.placeholder = None;
        self.send(IconCommand::Reset {
            generation: self.generation,
            icon_size,
        });
    }

    pub fn texture_id(&mut self, ctx: &egui::Context, url: &str) -> egui::TextureId {
        if let Some(texture) = self.textures.get(url) {
            return texture.id();
        }
        if self.requested.insert(url.to_string()) {
            let generation = self.generation;
            self.send(IconCommand::Fetch {
                generation,
                url: url.to_string(),
            });
        }
        let side = self.icon_size;
        self.placeholder
            .get_or_insert_with(|| {
                ctx.load_texture(
                    "link-icon-placeholder",
                    placeholder_icon(side),
                    egui::TextureOptions::LINEAR,
                )
            })
            .id()
    }

    pub fn accept(&mut self, ctx: &egui::Context, result: IconResult) {
        if result.generation != self.generation {
            debug!("Dropping stale icon for {}", result.url);
            return;
        }
        let texture = ctx.load_texture(
            format!("link-icon-{}", result.url),
            result.image,
            egui::TextureOptions::LINEAR,
        );
        self.textures.insert(result.url, texture);
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DragState {
    pub start_window_pos: egui::Pos2,
    pub start_global_mouse: egui::Pos2,
}

#[derive(Debug, Clone, Copy)]
pub struct MenuState {
    /// Top-left corner of the menu window in screen points.
    pub origin: egui::Pos2,
    pub seen_focus: bool,
}

pub enum DialogBody {
    Prompt { flow: Flow, prompt: Prompt },
    Notice(Notice),
}

impl DialogBody {
    pub fn prompt(flow: Flow) -> Self {
        let prompt = flow.prompt();
        Self::Prompt { flow, prompt }
    }

    pub fn title(&self) -> &str {
        match self {
            DialogBody::Prompt { prompt, .. } => prompt.title(),
            DialogBody::Notice(notice) => &notice.title,
        }
    }
}

pub struct DialogState {
    pub body: DialogBody,
    pub input: String,
    pub origin: egui::Pos2,
    /// Set until the first frame has focused the window and its input.
    pub fresh: bool,
}

impl DialogState {
    pub fn new(body: DialogBody, origin: egui::Pos2) -> Self {
        let input = match &body {
            DialogBody::Prompt { prompt, .. } => prompt.initial_input(),
            DialogBody::Notice(_) => String::new(),
        };
        Self {
            body,
            input,
            origin,
            fresh: true,
        }
    }
}
