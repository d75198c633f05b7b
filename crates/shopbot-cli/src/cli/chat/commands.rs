//! Slash commands and quick-reply shortcuts for the chat loop.

use console::style;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    Help,
    Exit,
    History,
    /// Reprint the current quick replies.
    Replies,
    /// `#N`: select quick reply N (zero-based here).
    QuickReply(usize),
    Unknown(String),
}

/// Parse a chat line. Returns `None` for ordinary messages.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let input = input.trim();

    if let Some(number) = input.strip_prefix('#') {
        return match number.parse::<usize>() {
            Ok(n) if n >= 1 => Some(ChatCommand::QuickReply(n - 1)),
            _ => Some(ChatCommand::Unknown(input.to_string())),
        };
    }

    if !input.starts_with('/') {
        return None;
    }

    let name = input.split_whitespace().next().unwrap_or(input);
    let command = match name {
        "/help" | "/h" | "/?" => ChatCommand::Help,
        "/exit" | "/quit" | "/q" => ChatCommand::Exit,
        "/history" => ChatCommand::History,
        "/replies" | "/r" => ChatCommand::Replies,
        other => ChatCommand::Unknown(other.to_string()),
    };
    Some(command)
}

pub fn print_help() {
    println!();
    println!("  {}", style("Commands").bold());
    println!("  {}      {}", style("/help").cyan(), "Show this help");
    println!("  {}   {}", style("/replies").cyan(), "Show the current quick replies");
    println!("  {}   {}", style("/history").cyan(), "Reprint the conversation");
    println!("  {}      {}", style("/quit").cyan(), "End the session");
    println!("  {}         {}", style("#N").cyan(), "Send quick reply N");
    println!();
    println!("  {}", style("Ctrl+D to exit").dim());
    println!();
}
