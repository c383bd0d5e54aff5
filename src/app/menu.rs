use super::style::{MENU_ROW_HEIGHT, MENU_SEPARATOR_HEIGHT, MENU_WIDTH};
use crate::config::SnapPosition;
use eframe::egui;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    AddLink,
    EditLink,
    DeleteLink,
    Snap(SnapPosition),
    Configure,
    Backup,
    Restore,
    Hide,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEntry {
    Item(&'static str, MenuCommand),
    Separator,
}

pub const MENU_ENTRIES: [MenuEntry; 14] = [
    MenuEntry::Item("Add Link", MenuCommand::AddLink),
    MenuEntry::Item("Edit Link", MenuCommand::EditLink),
    MenuEntry::Item("Delete Link", MenuCommand::DeleteLink),
    MenuEntry::Separator,
    MenuEntry::Item("Snap to Top", MenuCommand::Snap(SnapPosition::Top)),
    MenuEntry::Item("Snap to Left", MenuCommand::Snap(SnapPosition::Left)),
    MenuEntry::Item("Snap to Right", MenuCommand::Snap(SnapPosition::Right)),
    MenuEntry::Separator,
    MenuEntry::Item("Configure Size & Icon", MenuCommand::Configure),
    MenuEntry::Item("Backup Settings", MenuCommand::Backup),
    MenuEntry::Item("Restore Settings", MenuCommand::Restore),
    MenuEntry::Separator,
    MenuEntry::Item("Hide to Tray", MenuCommand::Hide),
    MenuEntry::Item("Exit", MenuCommand::Exit),
];

/// Window size in points needed to show every entry.
pub fn menu_size() -> egui::Vec2 {
    let height: f32 = MENU_ENTRIES
        .iter()
        .map(|entry| match entry {
            MenuEntry::Item(..) => MENU_ROW_HEIGHT,
            MenuEntry::Separator => MENU_SEPARATOR_HEIGHT,
        })
        .sum();
    egui::vec2(MENU_WIDTH, height + 8.0)
}

/// Draws the entries and returns the one that was clicked.
pub fn draw_entries(ui: &mut egui::Ui) -> Option<MenuCommand> {
    let mut chosen = None;
    for entry in &MENU_ENTRIES {
        match entry {
            MenuEntry::Item(label, command) => {
                let button = egui::Button::new(*label)
                    .min_size(egui::vec2(ui.available_width(), MENU_ROW_HEIGHT));
                if ui.add(button).clicked() {
                    chosen = Some(*command);
                }
            }
            MenuEntry::Separator => {
                ui.add(egui::Separator::default().spacing(MENU_SEPARATOR_HEIGHT));
            }
        }
    }
    chosen
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_command_appears_once() {
        let commands: Vec<MenuCommand> = MENU_ENTRIES
            .iter()
            .filter_map(|entry| match entry {
                MenuEntry::Item(_, command) => Some(*command),
                MenuEntry::Separator => None,
            })
            .collect();
        assert_eq!(commands.len(), 11);
        for (i, command) in commands.iter().enumerate() {
            assert!(!commands[i + 1..].contains(command), "{command:?} repeated");
        }
        assert_eq!(commands.first(), Some(&MenuCommand::AddLink));
        assert_eq!(commands.last(), Some(&MenuCommand::Exit));
    }

    #[test]
    fn groups_are_separated() {
        let entries = &MENU_ENTRIES;
        assert_ne!(entries.first(), Some(&MenuEntry::Separator));
        assert_ne!(entries.last(), Some(&MenuEntry::Separator));
        let separators = entries
            .iter()
            .filter(|entry| **entry == MenuEntry::Separator)
            .count();
        assert_eq!(separators, 3);
    }

    #[test]
    fn size_fits_all_rows() {
        let size = menu_size();
        assert_eq!(size.x, MENU_WIDTH);
        assert!(size.y >= 11.0 * MENU_ROW_HEIGHT + 3.0 * MENU_SEPARATOR_HEIGHT);
    }
}
