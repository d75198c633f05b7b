//! `shopbot history`: print the stored log of the signed-in account.
//!
//! Only the remote store outlives a chat session, so this reads the account
//! saved by `FileAuthProvider` and loads its collection.

use std::sync::Arc;

use console::style;

use shopbot_core::clock::SystemClock;
use shopbot_core::identity::AuthProvider;
use shopbot_core::persistence::RemoteStoreBackend;

use crate::state::AppState;

use super::chat::renderer::ChatRenderer;

pub async fn show_history(state: &AppState, json: bool) -> anyhow::Result<()> {
    let Some(store) = state.store.clone() else {
        anyhow::bail!("the document store is disabled; session-only chats keep no history");
    };

    let Some(uid) = state.auth.current_user().await? else {
        if json {
            println!("[]");
        } else {
            println!(
                "\n  {}\n",
                style("No signed-in account yet. Start one with `shopbot chat`.").dim()
            );
        }
        return Ok(());
    };

    let backend = RemoteStoreBackend::new(
        store,
        &state.config.store.app_id,
        &uid,
        Arc::new(SystemClock),
    );
    let messages = backend.load().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&messages)?);
        return Ok(());
    }

    if messages.is_empty() {
        println!("\n  {}\n", style("No messages yet.").dim());
        return Ok(());
    }

    let renderer = ChatRenderer::new(state.config.conversation.contact_number.clone());
    println!();
    println!(
        "  {} {} ({} messages)",
        style("History for").bold(),
        style(backend.collection()).dim(),
        messages.len()
    );
    println!();
    for message in &messages {
        println!("{}", renderer.render_message(message));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopbot_types::message::Message;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_history_without_account_is_empty() {
        let tmp = TempDir::new().unwrap();
        let state = AppState::init(Some(tmp.path().to_path_buf())).await.unwrap();
        show_history(&state, true).await.unwrap();
    }

    #[tokio::test]
    async fn test_history_reads_signed_in_collection() {
        let tmp = TempDir::new().unwrap();
        let state = AppState::init(Some(tmp.path().to_path_buf())).await.unwrap();
        let uid = state.auth.sign_in_anonymously().await.unwrap();

        let backend = RemoteStoreBackend::new(
            state.store.clone().unwrap(),
            &state.config.store.app_id,
            &uid,
            Arc::new(SystemClock),
        );
        backend.append(&Message::user("مرحبا", 1_700_000_000_000)).await.unwrap();

        show_history(&state, false).await.unwrap();
        assert_eq!(backend.load().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_history_requires_store() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "[store]\nenabled = false\n")
            .await
            .unwrap();
        let state = AppState::init(Some(tmp.path().to_path_buf())).await.unwrap();

        assert!(show_history(&state, false).await.is_err());
    }
}
