//! Console message formatting. Everything here returns strings; callers
//! decide where they go.

use owo_colors::OwoColorize;

use crate::parsers::FileType;

/// Indentation used for messages that belong to the previous line.
pub const SPACER: &str = "                      ";

/// Column the file type is aligned to in `version list`.
const LIST_TYPE_COLUMN: usize = 50;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MessageKind {
    Completed,
    Important,
    Warning,
    StrongWarning,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Layout {
    #[default]
    Plain,
    /// Indented by [`SPACER`].
    Spaced,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Style {
    pub color: bool,
}

impl Style {
    pub const PLAIN: Style = Style { color: false };
    pub const COLORED: Style = Style { color: true };
}

pub fn format_message(text: &str, kind: MessageKind, layout: Layout, style: Style) -> String {
    let text = match layout {
        Layout::Plain => text.to_string(),
        Layout::Spaced => format!("{SPACER}{text}"),
    };
    if !style.color {
        return text;
    }
    match kind {
        MessageKind::Completed => text.green().bold().to_string(),
        MessageKind::Important => text.cyan().bold().to_string(),
        MessageKind::Warning => text.yellow().bold().to_string(),
        MessageKind::StrongWarning => text.red().bold().to_string(),
    }
}

pub fn plural<'a>(count: usize, singular: &'a str, plural: &'a str) -> &'a str {
    if count == 1 { singular } else { plural }
}

/// One row of `version list`: `<n> - <name>` padded so the type lines up.
pub fn format_file_entry(index: usize, name: &str, file_type: FileType) -> String {
    let label = format!("{index} - {name}");
    let text_length = index.to_string().len() + name.chars().count();
    let padding = LIST_TYPE_COLUMN.saturating_sub(text_length).max(1);
    format!("{label}{}[{file_type}]", " ".repeat(padding))
}
