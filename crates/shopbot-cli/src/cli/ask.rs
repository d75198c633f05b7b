//! `shopbot ask`: one fulfillment call, printed without touching history.

use console::style;

use shopbot_types::message::Message;

use crate::state::AppState;

use super::chat::renderer::ChatRenderer;

pub async fn ask(state: &AppState, text: &str, json: bool) -> anyhow::Result<()> {
    let client = state.client()?;

    let spinner = indicatif::ProgressBar::new_spinner();
    spinner.set_message("typing...");
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    let reply = client.send(text).await;
    spinner.finish_and_clear();

    if json {
        println!("{}", serde_json::to_string_pretty(&reply)?);
        return Ok(());
    }

    let renderer = ChatRenderer::new(state.config.conversation.contact_number.clone());
    let quick_replies = reply.quick_replies.clone();
    println!();
    println!("  {} {}", style("You").green().bold(), text);
    println!("{}", renderer.render_message(&Message::bot(reply, 0)));
    if !quick_replies.is_empty() {
        print!("{}", renderer.render_quick_replies(&quick_replies));
        println!();
    }
    Ok(())
}
