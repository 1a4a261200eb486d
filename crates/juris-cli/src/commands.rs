//! Slash commands, intercepted before a line is sent as a question.

/// Models offered by `/model`. Any other ID is passed through unchanged;
/// the service rejects unknown ones.
pub const KNOWN_MODELS: &[(&str, &str)] = &[
    ("grok-3-latest", "most capable, detailed answers"),
    ("grok-3-fast", "balance of quality and speed"),
    ("grok-3-mini", "compact, concise answers"),
    ("grok-3-mini-fast", "fastest, for simple questions"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    ShowModel,
    SetModel(String),
    History,
    Clear,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Empty,
    Command(Command),
    UnknownCommand(String),
    Question(String),
}

/// Classify one line typed at the prompt.
pub fn parse_input(line: &str) -> Input {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Input::Empty;
    }
    if !trimmed.starts_with('/') {
        return Input::Question(trimmed.to_string());
    }

    let (name, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (trimmed, ""),
    };

    let command = match name.to_lowercase().as_str() {
        "/help" => Command::Help,
        "/model" if arg.is_empty() => Command::ShowModel,
        "/model" => Command::SetModel(arg.to_string()),
        "/history" => Command::History,
        "/clear" => Command::Clear,
        "/quit" | "/exit" => Command::Quit,
        _ => return Input::UnknownCommand(name.to_string()),
    };
    Input::Command(command)
}

pub fn help_text() -> String {
    "Commands\n\
     \x20 /help          show this help\n\
     \x20 /model         show current model\n\
     \x20 /model <id>    switch model for the next questions\n\
     \x20 /history       list questions answered in this session\n\
     \x20 /clear         forget the session history\n\
     \x20 /quit          leave (Ctrl-C at the prompt also quits;\n\
     \x20                while answering it cancels the answer)"
        .to_string()
}

pub fn model_listing(current: &str) -> String {
    let mut out = format!("Current model: {}\n\nAvailable:\n", current);
    for (id, desc) in KNOWN_MODELS {
        let marker = if *id == current { "*" } else { " " };
        out.push_str(&format!("{} {:<18} {}\n", marker, id, desc));
    }
    out
}
