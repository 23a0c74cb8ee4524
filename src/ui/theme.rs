use crossterm::style::Color;

use crate::config::DisplayConfig;

/// Cosmetic CPU bands. No behavior hangs off these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Normal,
    Caution,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSupport {
    Color,
    Mono,
}

impl ColorSupport {
    /// `NO_COLOR` (any non-empty value) always wins over config.
    pub fn resolve(enabled: bool) -> Self {
        let no_color = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
        if enabled && !no_color {
            ColorSupport::Color
        } else {
            ColorSupport::Mono
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellStyle {
    pub fg: Option<Color>,
    pub bold: bool,
}

impl CellStyle {
    const PLAIN: CellStyle = CellStyle {
        fg: None,
        bold: false,
    };
}

#[derive(Debug, Clone)]
pub struct Theme {
    pub support: ColorSupport,
    pub high_cpu_threshold: f64,
    pub caution_cpu_threshold: f64,
    pub title: CellStyle,
    pub high: CellStyle,
    pub caution: CellStyle,
    pub status_ok: CellStyle,
    pub status_err: CellStyle,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            support: ColorSupport::Color,
            high_cpu_threshold: 50.0,
            caution_cpu_threshold: 10.0,
            title: CellStyle {
                fg: Some(Color::Yellow),
                bold: true,
            },
            high: CellStyle {
                fg: Some(Color::Red),
                bold: true,
            },
            caution: CellStyle {
                fg: Some(Color::Yellow),
                bold: true,
            },
            status_ok: CellStyle {
                fg: Some(Color::Green),
                bold: false,
            },
            status_err: CellStyle {
                fg: Some(Color::Red),
                bold: false,
            },
        }
    }
}

impl Theme {
    pub fn from_config(display: &DisplayConfig, support: ColorSupport) -> Self {
        Theme {
            support,
            high_cpu_threshold: display.high_cpu_threshold,
            caution_cpu_threshold: display.caution_cpu_threshold,
            ..Theme::default()
        }
    }

    pub fn mono() -> Self {
        Theme {
            support: ColorSupport::Mono,
            ..Theme::default()
        }
    }

    pub fn severity(&self, cpu_percent: f64) -> Severity {
        if cpu_percent > self.high_cpu_threshold {
            Severity::High
        } else if cpu_percent > self.caution_cpu_threshold {
            Severity::Caution
        } else {
            Severity::Normal
        }
    }

    pub fn row_style(&self, cpu_percent: f64) -> CellStyle {
        match self.severity(cpu_percent) {
            Severity::High => self.styled(self.high),
            Severity::Caution => self.styled(self.caution),
            Severity::Normal => CellStyle::PLAIN,
        }
    }

    /// Drop color when the terminal (or user) asked for monochrome.
    pub fn styled(&self, style: CellStyle) -> CellStyle {
        match self.support {
            ColorSupport::Color => style,
            ColorSupport::Mono => CellStyle::PLAIN,
        }
    }
}
