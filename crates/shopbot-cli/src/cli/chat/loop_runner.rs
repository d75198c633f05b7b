//! Main chat loop orchestration.
//!
//! Starts the conversation controller (identity, backend, history, greeting),
//! prints the banner, then alternates between pulling remote updates and
//! reading user input until the user exits.

use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use shopbot_infra::auth::FileAuthProvider;
use shopbot_types::message::Sender;

use crate::state::{AppState, ConcreteController};

use super::banner::print_welcome_banner;
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};
use super::renderer::ChatRenderer;

/// Spinner shown while the controller is SENDING.
fn typing_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let spinner_style = ProgressStyle::default_spinner()
        .template("  {spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(spinner_style);
    spinner.set_message("typing...");
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Prints the messages the user has not seen yet.
struct Transcript {
    renderer: ChatRenderer,
    shown: usize,
}

impl Transcript {
    fn new(renderer: ChatRenderer) -> Self {
        Self { renderer, shown: 0 }
    }

    /// Print messages past the last shown one. The user's own lines are
    /// already on screen when `echo_user` is false.
    fn print_new(&mut self, controller: &ConcreteController, echo_user: bool) {
        let messages = controller.messages();
        if messages.len() < self.shown {
            // Log was replaced by a shorter snapshot.
            self.shown = messages.len();
            return;
        }

        let fresh = &messages[self.shown..];
        for message in fresh {
            if message.sender == Sender::User && !echo_user {
                continue;
            }
            println!("{}", self.renderer.render_message(message));
        }
        self.shown = messages.len();

        let bot_replied = fresh.iter().any(|m| m.sender == Sender::Bot);
        if bot_replied && !controller.quick_replies().is_empty() {
            print!("{}", self.renderer.render_quick_replies(controller.quick_replies()));
            println!();
        }
    }

    fn print_all(&mut self, controller: &ConcreteController) {
        println!();
        for message in controller.messages() {
            println!("{}", self.renderer.render_message(message));
        }
        self.shown = controller.messages().len();
    }

    fn print_replies(&self, controller: &ConcreteController) {
        if controller.quick_replies().is_empty() {
            println!("\n  {}\n", style("No quick replies right now.").dim());
        } else {
            println!();
            print!("{}", self.renderer.render_quick_replies(controller.quick_replies()));
            println!();
        }
    }
}

/// Run the interactive chat loop.
///
/// With `local`, sign-in is skipped and the conversation lives in session
/// storage for this process only.
pub async fn run_chat_loop(state: &AppState, local: bool) -> anyhow::Result<()> {
    let mut controller = state.controller()?;
    let auth: Option<&FileAuthProvider> = if local { None } else { Some(&state.auth) };
    let store = if local { None } else { state.store.clone() };

    let spinner = typing_spinner();
    spinner.set_message("connecting...");
    controller.start(auth, store).await;
    spinner.finish_and_clear();

    print_welcome_banner(controller.identity(), controller.backend_kind());

    let mut transcript = Transcript::new(ChatRenderer::new(
        state.config.conversation.contact_number.clone(),
    ));
    transcript.print_new(&controller, true);

    let prompt = format!("  {} ", style("You >").green().bold());
    let (mut chat_input, _writer) = ChatInput::new(prompt)
        .map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    loop {
        if controller.sync().await {
            transcript.print_new(&controller, true);
        }

        let text = match chat_input.read_line().await {
            InputEvent::Eof => {
                println!("\n  {}", style("Session ended.").dim());
                break;
            }
            InputEvent::Interrupted => {
                println!("\n  {}", style("Press Ctrl+D to exit, or keep chatting.").dim());
                continue;
            }
            InputEvent::Message(text) if text.is_empty() => continue,
            InputEvent::Message(text) => text,
        };

        let accepted = match commands::parse(&text) {
            Some(ChatCommand::Help) => {
                commands::print_help();
                continue;
            }
            Some(ChatCommand::Exit) => {
                println!("\n  {}", style("Session ended.").dim());
                break;
            }
            Some(ChatCommand::History) => {
                transcript.print_all(&controller);
                continue;
            }
            Some(ChatCommand::Replies) => {
                transcript.print_replies(&controller);
                continue;
            }
            Some(ChatCommand::Unknown(name)) => {
                println!(
                    "\n  {} Unknown command: {}. Type /help for available commands.\n",
                    style("?").yellow().bold(),
                    style(name).dim()
                );
                continue;
            }
            Some(ChatCommand::QuickReply(index)) => {
                let Some(reply) = controller.quick_replies().get(index).cloned() else {
                    println!(
                        "\n  {} No quick reply #{}.\n",
                        style("?").yellow().bold(),
                        index + 1
                    );
                    continue;
                };
                println!("  {} {}", style("You").green().bold(), reply);
                let spinner = typing_spinner();
                let accepted = controller.select_quick_reply(index).await;
                spinner.finish_and_clear();
                accepted
            }
            None => {
                let spinner = typing_spinner();
                let accepted = controller.submit(&text).await;
                spinner.finish_and_clear();
                accepted
            }
        };

        if accepted {
            println!();
            transcript.print_new(&controller, false);
        }
    }

    controller.unsubscribe();
    info!(messages = controller.messages().len(), "Chat session closed");
    Ok(())
}
