//! Modal question sequences behind the context-menu actions.
//!
//! A [`Flow`] is one step of an operation that needs user input. Each answer
//! either asks the next question, finishes with a fully validated [`Action`],
//! shows a [`Notice`], or aborts. Nothing is mutated until an `Action` is
//! applied, so a cancelled step never leaves a partial change behind.

use crate::config::{
    Link, Settings, MAX_ICON_SIZE, MIN_ICON_SIZE, MIN_WINDOW_HEIGHT, MIN_WINDOW_WIDTH,
};
use log::info;

const DEFAULT_PROMPT_WIDTH: u32 = 800;
const DEFAULT_PROMPT_HEIGHT: u32 = 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    Text {
        title: &'static str,
        label: String,
        initial: String,
    },
    Integer {
        title: &'static str,
        label: String,
        initial: Option<i64>,
        min: Option<i64>,
        max: Option<i64>,
    },
    Confirm {
        title: &'static str,
        message: String,
    },
}

impl Prompt {
    pub fn title(&self) -> &'static str {
        match self {
            Prompt::Text { title, .. }
            | Prompt::Integer { title, .. }
            | Prompt::Confirm { title, .. } => title,
        }
    }

    /// Text the input box starts with.
    pub fn initial_input(&self) -> String {
        match self {
            Prompt::Text { initial, .. } => initial.clone(),
            Prompt::Integer { initial, .. } => initial.map(|v| v.to_string()).unwrap_or_default(),
            Prompt::Confirm { .. } => String::new(),
        }
    }

    /// Whether `input` may be submitted. Bounded integer prompts stay open
    /// until the entry parses and lies within the bounds.
    pub fn accepts(&self, input: &str) -> bool {
        match self {
            Prompt::Integer {
                min: None,
                max: None,
                ..
            } => true,
            Prompt::Integer { min, max, .. } => parse_bounded(input, *min, *max).is_some(),
            Prompt::Text { .. } | Prompt::Confirm { .. } => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: title.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Submit(String),
    Yes,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowKind {
    AddLink,
    EditLink,
    DeleteLink,
    Configure,
    Restore,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    AddLink(Link),
    /// `index` is zero-based and already range-checked.
    EditLink {
        index: usize,
        url: Option<String>,
        name: Option<String>,
    },
    DeleteLink {
        index: usize,
    },
    Configure {
        width: u32,
        height: u32,
        icon_size: u32,
    },
    Restore,
}

impl Settings {
    /// Applies a finished action and reports whether the settings changed.
    /// `Restore` replaces the whole document and is handled by the store.
    pub fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::AddLink(link) => {
                info!("Adding link {} ({})", link.name, link.url);
                self.add_link(link);
                true
            }
            Action::EditLink { index, url, name } => {
                let edited = self.edit_link(index, url, name);
                if edited {
                    info!("Edited link #{}", index + 1);
                }
                edited
            }
            Action::DeleteLink { index } => match self.delete_link(index) {
                Some(removed) => {
                    info!("Deleted link {} ({})", removed.name, removed.url);
                    true
                }
                None => false,
            },
            Action::Configure {
                width,
                height,
                icon_size,
            } => {
                self.window_width = Some(width);
                self.window_height = Some(height);
                self.icon_size = icon_size;
                true
            }
            Action::Restore => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Ask(Flow),
    Finish(Action),
    Notify(Notice),
    Abort,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flow(Step);

#[derive(Debug, Clone, PartialEq, Eq)]
enum Step {
    AddUrl,
    AddName {
        url: String,
    },
    PickIndex {
        purpose: Pick,
        links: Vec<Link>,
    },
    EditUrl {
        index: usize,
        current: Link,
    },
    EditName {
        index: usize,
        current: Link,
        url: Option<String>,
    },
    Width {
        width: u32,
        height: u32,
        icon_size: u32,
    },
    Height {
        width: u32,
        height: u32,
        icon_size: u32,
    },
    IconSize {
        width: u32,
        height: u32,
        icon_size: u32,
    },
    ConfirmRestore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pick {
    Edit,
    Delete,
}

impl Pick {
    fn title(self) -> &'static str {
        match self {
            Pick::Edit => "Edit Link",
            Pick::Delete => "Delete Link",
        }
    }
}

impl Flow {
    pub fn begin(kind: FlowKind, settings: &Settings) -> Transition {
        let step = match kind {
            FlowKind::AddLink => Step::AddUrl,
            FlowKind::EditLink | FlowKind::DeleteLink => {
                let (purpose, verb) = if kind == FlowKind::EditLink {
                    (Pick::Edit, "edit")
                } else {
                    (Pick::Delete, "delete")
                };
                if settings.links.is_empty() {
                    return Transition::Notify(Notice::info(
                        "No Links",
                        format!("No links to {verb}."),
                    ));
                }
                Step::PickIndex {
                    purpose,
                    links: settings.links.clone(),
                }
            }
            FlowKind::Configure => Step::Width {
                width: settings.window_width.unwrap_or(DEFAULT_PROMPT_WIDTH),
                height: settings.window_height.unwrap_or(DEFAULT_PROMPT_HEIGHT),
                icon_size: settings.icon_size,
            },
            FlowKind::Restore => Step::ConfirmRestore,
        };
        Transition::Ask(Flow(step))
    }

    pub fn prompt(&self) -> Prompt {
        match &self.0 {
            Step::AddUrl => Prompt::Text {
                title: "Add URL",
                label: "Enter URL:".into(),
                initial: String::new(),
            },
            Step::AddName { .. } => Prompt::Text {
                title: "Button Name",
                label: "Enter name for button:".into(),
                initial: String::new(),
            },
            Step::PickIndex { purpose, links } => Prompt::Integer {
                title: purpose.title(),
                label: index_listing(links),
                initial: None,
                min: None,
                max: None,
            },
            Step::EditUrl { current, .. } => Prompt::Text {
                title: "New URL",
                label: "Enter new URL:".into(),
                initial: current.url.clone(),
            },
            Step::EditName { current, .. } => Prompt::Text {
                title: "New Name",
                label: "Enter new name:".into(),
                initial: current.name.clone(),
            },
            Step::Width { width, .. } => Prompt::Integer {
                title: "Window Width",
                label: "Enter window width (px):".into(),
                initial: Some(i64::from(*width)),
                min: Some(i64::from(MIN_WINDOW_WIDTH)),
                max: None,
            },
            Step::Height { height, .. } => Prompt::Integer {
                title: "Window Height",
                label: "Enter window height (px):".into(),
                initial: Some(i64::from(*height)),
                min: Some(i64::from(MIN_WINDOW_HEIGHT)),
                max: None,
            },
            Step::IconSize { icon_size, .. } => Prompt::Integer {
                title: "Icon Size",
                label: "Enter icon size (px):".into(),
                initial: Some(i64::from(*icon_size)),
                min: Some(i64::from(MIN_ICON_SIZE)),
                max: Some(i64::from(MAX_ICON_SIZE)),
            },
            Step::ConfirmRestore => Prompt::Confirm {
                title: "Confirm Restore",
                message: "Are you sure you want to restore from backup? \
                          This will overwrite current settings."
                    .into(),
            },
        }
    }

    pub fn advance(self, reply: Reply) -> Transition {
        match self.0 {
            Step::AddUrl => match required_text(reply) {
                Some(url) => Transition::Ask(Flow(Step::AddName { url })),
                None => Transition::Abort,
            },
            Step::AddName { url } => match required_text(reply) {
                Some(name) => Transition::Finish(Action::AddLink(Link::new(url, name))),
                None => Transition::Abort,
            },
            Step::PickIndex { purpose, links } => {
                let Some(index) = pick_index(&reply, links.len()) else {
                    return Transition::Abort;
                };
                match purpose {
                    Pick::Delete => Transition::Finish(Action::DeleteLink { index }),
                    Pick::Edit => {
                        let Some(current) = links.into_iter().nth(index) else {
                            return Transition::Abort;
                        };
                        Transition::Ask(Flow(Step::EditUrl { index, current }))
                    }
                }
            }
            Step::EditUrl { index, current } => Transition::Ask(Flow(Step::EditName {
                index,
                current,
                url: required_text(reply),
            })),
            Step::EditName { index, url, .. } => Transition::Finish(Action::EditLink {
                index,
                url,
                name: required_text(reply),
            }),
            Step::Width {
                height, icon_size, ..
            } => match bounded_reply(reply, MIN_WINDOW_WIDTH, None) {
                Some(width) => Transition::Ask(Flow(Step::Height {
                    width,
                    height,
                    icon_size,
                })),
                None => Transition::Abort,
            },
            Step::Height {
                width, icon_size, ..
            } => match bounded_reply(reply, MIN_WINDOW_HEIGHT, None) {
                Some(height) => Transition::Ask(Flow(Step::IconSize {
                    width,
                    height,
                    icon_size,
                })),
                None => Transition::Abort,
            },
            Step::IconSize { width, height, .. } => {
                match bounded_reply(reply, MIN_ICON_SIZE, Some(MAX_ICON_SIZE)) {
                    Some(icon_size) => Transition::Finish(Action::Configure {
                        width,
                        height,
                        icon_size,
                    }),
                    None => Transition::Abort,
                }
            }
            Step::ConfirmRestore => match reply {
                Reply::Yes => Transition::Finish(Action::Restore),
                Reply::Submit(_) | Reply::Cancel => Transition::Abort,
            },
        }
    }
}

fn index_listing(links: &[Link]) -> String {
    let mut label = String::from("Select index:");
    for (i, link) in links.iter().enumerate() {
        label.push_str(&format!("\n{}. {}", i + 1, link.name));
    }
    label
}

/// Trimmed, non-empty text from a submitted reply.
fn required_text(reply: Reply) -> Option<String> {
    match reply {
        Reply::Submit(text) => {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Reply::Yes | Reply::Cancel => None,
    }
}

/// Converts a one-based index reply into a zero-based index within `len`.
fn pick_index(reply: &Reply, len: usize) -> Option<usize> {
    let Reply::Submit(text) = reply else {
        return None;
    };
    let index = text.trim().parse::<usize>().ok()?;
    (1..=len).contains(&index).then(|| index - 1)
}

fn bounded_reply(reply: Reply, min: u32, max: Option<u32>) -> Option<u32> {
    let Reply::Submit(text) = reply else {
        return None;
    };
    let value = parse_bounded(&text, Some(i64::from(min)), max.map(i64::from))?;
    u32::try_from(value).ok()
}

/// Integer entries are stored as `u32`, so that is the implicit upper bound.
fn parse_bounded(input: &str, min: Option<i64>, max: Option<i64>) -> Option<i64> {
    let value = input.trim().parse::<i64>().ok()?;
    let above_min = min.map_or(true, |min| value >= min);
    let below_max = value <= i64::from(u32::MAX) && max.map_or(true, |max| value <= max);
    (above_min && below_max).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submit(text: &str) -> Reply {
        Reply::Submit(text.to_string())
    }

    fn expect_ask(transition: Transition) -> Flow {
        match transition {
            Transition::Ask(flow) => flow,
            other => panic!("expected another prompt, got {other:?}"),
        }
    }

    fn expect_finish(transition: Transition) -> Action {
        match transition {
            Transition::Finish(action) => action,
            other => panic!("expected an action, got {other:?}"),
        }
    }

    fn two_links() -> Settings {
        Settings {
            links: vec![
                Link::new("https://a.test", "A"),
                Link::new("https://b.test", "B"),
            ],
            ..Settings::default()
        }
    }

    #[test]
    fn add_then_delete_scenario() {
        let mut settings = Settings::default();

        let flow = expect_ask(Flow::begin(FlowKind::AddLink, &settings));
        let flow = expect_ask(flow.advance(submit("https://example.com")));
        let action = expect_finish(flow.advance(submit("Ex")));
        assert!(settings.apply(action));
        assert_eq!(settings.links, vec![Link::new("https://example.com", "Ex")]);

        let flow = expect_ask(Flow::begin(FlowKind::DeleteLink, &settings));
        let action = expect_finish(flow.advance(submit("1")));
        assert_eq!(action, Action::DeleteLink { index: 0 });
        assert!(settings.apply(action));
        assert!(settings.links.is_empty());
    }

    #[test]
    fn add_aborts_on_empty_or_cancelled_input() {
        let settings = Settings::default();
        let flow = expect_ask(Flow::begin(FlowKind::AddLink, &settings));
        assert_eq!(flow.clone().advance(submit("   ")), Transition::Abort);
        assert_eq!(flow.clone().advance(Reply::Cancel), Transition::Abort);

        let named = expect_ask(flow.advance(submit("https://example.com")));
        assert_eq!(named.advance(Reply::Cancel), Transition::Abort);
    }

    #[test]
    fn edit_and_delete_on_empty_list_inform() {
        let settings = Settings::default();
        for (kind, message) in [
            (FlowKind::EditLink, "No links to edit."),
            (FlowKind::DeleteLink, "No links to delete."),
        ] {
            match Flow::begin(kind, &settings) {
                Transition::Notify(notice) => {
                    assert_eq!(notice.level, NoticeLevel::Info);
                    assert_eq!(notice.message, message);
                }
                other => panic!("expected notice, got {other:?}"),
            }
        }
    }

    #[test]
    fn index_prompt_lists_links() {
        let flow = expect_ask(Flow::begin(FlowKind::EditLink, &two_links()));
        match flow.prompt() {
            Prompt::Integer { title, label, .. } => {
                assert_eq!(title, "Edit Link");
                assert_eq!(label, "Select index:\n1. A\n2. B");
            }
            other => panic!("unexpected prompt {other:?}"),
        }
    }

    #[test]
    fn edit_index_out_of_range_aborts() {
        let settings = two_links();
        for reply in [submit("0"), submit("3"), submit("-1"), submit("two"), Reply::Cancel] {
            let flow = expect_ask(Flow::begin(FlowKind::EditLink, &settings));
            assert_eq!(flow.advance(reply), Transition::Abort);
        }
        assert_eq!(settings, two_links());
    }

    #[test]
    fn edit_prefills_and_keeps_blank_fields() {
        let mut settings = two_links();
        let flow = expect_ask(Flow::begin(FlowKind::EditLink, &settings));
        let url_step = expect_ask(flow.advance(submit("2")));
        assert_eq!(url_step.prompt().initial_input(), "https://b.test");

        let name_step = expect_ask(url_step.advance(submit("")));
        assert_eq!(name_step.prompt().initial_input(), "B");

        let action = expect_finish(name_step.advance(submit("Bee")));
        assert_eq!(
            action,
            Action::EditLink {
                index: 1,
                url: None,
                name: Some("Bee".into()),
            }
        );
        assert!(settings.apply(action));
        assert_eq!(settings.links[1], Link::new("https://b.test", "Bee"));
    }

    #[test]
    fn configure_collects_all_three_values() {
        let settings = Settings::default();
        let flow = expect_ask(Flow::begin(FlowKind::Configure, &settings));
        assert_eq!(flow.prompt().initial_input(), "800");

        let flow = expect_ask(flow.advance(submit("1200")));
        assert_eq!(flow.prompt().initial_input(), "60");
        let flow = expect_ask(flow.advance(submit("50")));
        assert_eq!(flow.prompt().initial_input(), "24");
        let action = expect_finish(flow.advance(submit("32")));
        assert_eq!(
            action,
            Action::Configure {
                width: 1200,
                height: 50,
                icon_size: 32,
            }
        );

        let mut settings = settings;
        assert!(settings.apply(action));
        assert_eq!(settings.explicit_size(), Some((1200, 50)));
        assert_eq!(settings.icon_size, 32);
    }

    #[test]
    fn configure_cancel_at_any_step_aborts() {
        let settings = Settings::default();
        let width = expect_ask(Flow::begin(FlowKind::Configure, &settings));
        assert_eq!(width.clone().advance(Reply::Cancel), Transition::Abort);

        let height = expect_ask(width.advance(submit("400")));
        assert_eq!(height.clone().advance(Reply::Cancel), Transition::Abort);

        let icon = expect_ask(height.advance(submit("40")));
        assert_eq!(icon.advance(Reply::Cancel), Transition::Abort);
    }

    #[test]
    fn bounded_prompts_reject_out_of_range_entries() {
        let settings = Settings::default();
        let width = expect_ask(Flow::begin(FlowKind::Configure, &settings));
        assert!(!width.prompt().accepts("99"));
        assert!(width.prompt().accepts("100"));

        let height = expect_ask(width.advance(submit("100")));
        let icon = expect_ask(height.advance(submit("20")));
        let prompt = icon.prompt();
        assert!(!prompt.accepts("11"));
        assert!(!prompt.accepts("65"));
        assert!(!prompt.accepts("abc"));
        assert!(prompt.accepts(" 64 "));
        assert_eq!(icon.advance(submit("65")), Transition::Abort);
    }

    #[test]
    fn width_beyond_u32_is_rejected_by_prompt_and_flow() {
        let settings = Settings::default();
        let width = expect_ask(Flow::begin(FlowKind::Configure, &settings));
        assert!(!width.prompt().accepts("5000000000"));
        assert!(width.prompt().accepts(&u32::MAX.to_string()));
        assert_eq!(width.advance(submit("5000000000")), Transition::Abort);
    }

    #[test]
    fn out_of_range_actions_change_nothing() {
        let mut settings = two_links();
        let before = settings.clone();
        assert!(!settings.apply(Action::DeleteLink { index: 2 }));
        assert!(!settings.apply(Action::EditLink {
            index: 5,
            url: Some("https://c.test".into()),
            name: None,
        }));
        assert!(!settings.apply(Action::Restore));
        assert_eq!(settings, before);
    }

    #[test]
    fn restore_needs_explicit_yes() {
        let settings = Settings::default();
        let flow = expect_ask(Flow::begin(FlowKind::Restore, &settings));
        assert!(matches!(flow.prompt(), Prompt::Confirm { .. }));
        assert_eq!(flow.clone().advance(Reply::Cancel), Transition::Abort);
        assert_eq!(expect_finish(flow.advance(Reply::Yes)), Action::Restore);
    }
}
