/// Slash commands the storefront understands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/start` - reset the conversation and show the main menu
    Start,
    /// `/done` - finish the current proof-upload flow
    Done,
}

impl Command {
    /// Parses the leading command out of a message text
    ///
    /// Returns `None` for free text and unrecognized commands. Bot-style
    /// suffixes (`/start@shop_bot`) are accepted.
    pub fn parse(text: &str) -> Option<Command> {
        let first = text.trim().split_whitespace().next()?;
        let name = first.strip_prefix('/')?;
        let name = name.split('@').next().unwrap_or(name);

        match name {
            "start" => Some(Command::Start),
            "done" => Some(Command::Done),
            _ => None,
        }
    }
}
