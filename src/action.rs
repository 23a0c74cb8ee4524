/// A command typed at the prompt, parsed from one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    Kill(u32),
    Refresh,
    /// `k` with a missing, non-numeric or non-positive pid.
    InvalidPid(String),
    Unknown(String),
    None,
}

pub fn parse_command(line: &str) -> Action {
    let line = line.trim();
    let mut tokens = line.split_whitespace();
    let Some(command) = tokens.next() else {
        return Action::None;
    };

    let lower = command.to_lowercase();
    match lower.as_str() {
        "q" | "quit" => return Action::Quit,
        "r" | "refresh" => return Action::Refresh,
        _ => {}
    }

    if lower.starts_with('k') {
        let arg = tokens.next().unwrap_or_default();
        return match arg.parse::<i32>() {
            Ok(pid) if pid > 0 => Action::Kill(pid as u32),
            _ => Action::InvalidPid(arg.to_string()),
        };
    }

    Action::Unknown(line.to_string())
}
