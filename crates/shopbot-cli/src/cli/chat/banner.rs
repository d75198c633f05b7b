//! Welcome banner for chat sessions.
//!
//! Shows the storage status badge and, when the conversation lives only in
//! session storage, warns that it will not survive the session.

use console::style;

use shopbot_types::conversation::BackendKind;
use shopbot_types::identity::ResolvedIdentity;

pub const SESSION_STORAGE_WARNING: &str =
    "Messages are kept in session storage and will be lost when the session ends.";

/// Status line for the active backend, e.g. `● online DB`.
pub fn status_badge(kind: BackendKind) -> String {
    match kind {
        BackendKind::RemoteStore => format!("{} {}", style("●").green(), kind.badge()),
        BackendKind::LocalSession => format!("{} {}", style("●").yellow(), kind.badge()),
    }
}

pub fn print_welcome_banner(identity: Option<&ResolvedIdentity>, kind: Option<BackendKind>) {
    println!();
    println!("  {} {}", "🎁", style("Gift Shop Assistant").cyan().bold());
    println!();

    if let Some(kind) = kind {
        println!("  {}  {}", style("Storage:").bold(), status_badge(kind));
    }
    if let Some(identity) = identity {
        println!(
            "  {}  {} ({})",
            style("Session:").bold(),
            style(identity.id.chars().take(8).collect::<String>()).dim(),
            identity.mode
        );
    }
    if kind == Some(BackendKind::LocalSession) {
        println!();
        println!("  {} {}", style("!").yellow().bold(), style(SESSION_STORAGE_WARNING).yellow());
    }

    println!();
    println!("  {}", style("Type /help for commands, #N for a quick reply, Ctrl+D to exit").dim());
    println!("  {}", style("---").dim());
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_badge_names_backend() {
        assert!(status_badge(BackendKind::RemoteStore).contains("online DB"));
        assert!(status_badge(BackendKind::LocalSession).ends_with("DB"));
        assert!(!status_badge(BackendKind::LocalSession).contains("online"));
    }
}
