//! Line parsing for the interactive `chat` loop.

/// One line typed at the chat prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Quit,
    New,
    List,
    /// 1-based position in the session list.
    Switch(usize),
    Delete,
    Retry,
    Discard,
    Help,
    Unknown(String),
    Text(String),
}

pub const HELP: &str = "\
/new            start a new session
/list           list sessions
/switch <n>     select session number n
/delete         delete the active session
/retry          resend the last failed message
/discard        drop the last failed message
/quit           exit
anything else is sent to the assistant";

#[must_use]
pub fn parse_input(line: &str) -> Input {
    let trimmed = line.trim();
    let Some(command) = trimmed.strip_prefix('/') else {
        return Input::Text(line.trim_end_matches(['\r', '\n']).to_owned());
    };

    let mut parts = command.split_whitespace();
    let name = parts.next().unwrap_or_default();
    match name {
        "quit" | "exit" | "q" => Input::Quit,
        "new" => Input::New,
        "list" | "ls" => Input::List,
        "delete" | "rm" => Input::Delete,
        "retry" => Input::Retry,
        "discard" => Input::Discard,
        "help" | "?" => Input::Help,
        "switch" | "s" => match parts.next().and_then(|n| n.parse::<usize>().ok()) {
            Some(n) if n > 0 => Input::Switch(n),
            _ => Input::Unknown(trimmed.to_owned()),
        },
        _ => Input::Unknown(trimmed.to_owned()),
    }
}

#[cfg(test)]
#[path = "input_test.rs"]
mod tests;
