//! Help and error colours.

use anstyle::{AnsiColor, Color, Style};
use clap::builder::Styles;

const fn ansi(color: AnsiColor) -> Style {
    Style::new().fg_color(Some(Color::Ansi(color)))
}

/// Section headings and the usage line.
pub const HEADING: Style = ansi(AnsiColor::Green).bold();

/// Flags, values and placeholders.
pub const LITERAL: Style = ansi(AnsiColor::Cyan);

/// Command names in the `Commands:` table.
pub const COMMAND: Style = ansi(AnsiColor::Cyan).bold();

/// Rejected values and error labels.
pub const REJECTED: Style = ansi(AnsiColor::Red).bold();

pub fn help_styles() -> Styles {
    Styles::styled()
        .header(HEADING)
        .usage(HEADING)
        .literal(LITERAL)
        .placeholder(LITERAL)
        .invalid(REJECTED)
        .error(REJECTED)
}

/// Renders a command name in [`COMMAND`] style, followed by a reset.
pub fn command(name: &str) -> String {
    format!("{COMMAND}{name}{COMMAND:#}")
}
