//! `shopbot link`: print outbound contact links.

use shopbot_infra::links::{self, DEFAULT_CONTACT_TEXT};

use crate::state::AppState;

pub fn product_link(state: &AppState, name: &str, json: bool) -> anyhow::Result<()> {
    let number = &state.config.conversation.contact_number;
    let url = links::contact_link(number, &links::purchase_text(name))?;
    print_link(url.as_str(), json);
    Ok(())
}

pub fn contact_link(state: &AppState, text: Option<&str>, json: bool) -> anyhow::Result<()> {
    let number = &state.config.conversation.contact_number;
    let url = links::contact_link(number, text.unwrap_or(DEFAULT_CONTACT_TEXT))?;
    print_link(url.as_str(), json);
    Ok(())
}

fn print_link(url: &str, json: bool) {
    if json {
        println!("{}", serde_json::json!({ "url": url }));
    } else {
        println!("{url}");
    }
}
