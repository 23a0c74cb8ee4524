pub mod table;
pub mod theme;

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Attribute, Print, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};

use crate::format::format_kb_as_mb;
use crate::system::snapshot::SystemSnapshot;
use crate::ui::table::{format_row, header_line, separator_line};
use crate::ui::theme::{CellStyle, Theme};

const TITLE: &str = "==================== procmon ====================";
const COMMANDS: &str = "Commands: k <pid> -> kill PID | r -> refresh now | q -> quit";

fn overview_line(snapshot: &SystemSnapshot) -> String {
    format!(
        "CPU Overall: {:.2}% | Memory Used: {} / {}",
        snapshot.cpu_usage_percent,
        format_kb_as_mb(snapshot.memory_used_kb),
        format_kb_as_mb(snapshot.memory_total_kb)
    )
}

fn styled_line<W: Write>(out: &mut W, text: &str, style: CellStyle) -> io::Result<()> {
    if style.bold {
        queue!(out, SetAttribute(Attribute::Bold))?;
    }
    if let Some(fg) = style.fg {
        queue!(out, SetForegroundColor(fg))?;
    }
    queue!(out, Print(text))?;
    if style.bold || style.fg.is_some() {
        queue!(out, SetAttribute(Attribute::Reset), ResetColor)?;
    }
    queue!(out, Print("\n"))
}

/// Placeholder shown while the first measurement interval elapses.
pub fn draw_warmup<W: Write>(out: &mut W, theme: &Theme) -> io::Result<()> {
    queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;
    styled_line(out, TITLE, theme.styled(theme.title))?;
    queue!(out, Print("Collecting first sample...\n"))?;
    out.flush()
}

/// Clear the screen and draw one full frame.
pub fn draw<W: Write>(
    out: &mut W,
    snapshot: &SystemSnapshot,
    theme: &Theme,
    status: Option<&str>,
) -> io::Result<()> {
    let _span = tracing::debug_span!("ui.draw", rows = snapshot.rows.len()).entered();

    queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;
    styled_line(out, TITLE, theme.styled(theme.title))?;
    queue!(
        out,
        Print(overview_line(snapshot)),
        Print("\n"),
        Print(COMMANDS),
        Print("\n\n"),
        Print(header_line()),
        Print("\n"),
        Print(separator_line()),
        Print("\n")
    )?;

    for row in &snapshot.rows {
        styled_line(out, &format_row(row), theme.row_style(row.cpu_percent))?;
    }

    if let Some(msg) = status {
        let style = if msg.starts_with("Sent") {
            theme.status_ok
        } else {
            theme.status_err
        };
        queue!(out, Print("\n"))?;
        styled_line(out, msg, theme.styled(style))?;
    }
    queue!(out, Print("\n"))?;
    out.flush()
}

/// The frame as plain text, no escape sequences and no trailing newline.
pub fn render_plain(snapshot: &SystemSnapshot) -> String {
    let mut lines = vec![
        overview_line(snapshot),
        header_line(),
        separator_line(),
    ];
    lines.extend(snapshot.rows.iter().map(format_row));
    lines.join("\n")
}
