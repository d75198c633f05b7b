//! Storefront chat assistant entry point.
//!
//! Binary name: `shopbot`
//!
//! Parses CLI arguments, installs logging, wires the fulfillment client,
//! identity provider and document store, then dispatches to the command
//! handler.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, LinkTarget};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli);

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "shopbot", &mut std::io::stdout());
        return Ok(());
    }

    let state = AppState::init(cli.data_dir.clone()).await?;
    tracing::debug!(
        data_dir = %state.data_dir.display(),
        store = state.store.is_some(),
        "Application state ready"
    );

    match cli.command {
        Commands::Chat { local } => {
            cli::chat::loop_runner::run_chat_loop(&state, local).await?;
        }

        Commands::Ask { text } => {
            cli::ask::ask(&state, &text, cli.json).await?;
        }

        Commands::History => {
            cli::history::show_history(&state, cli.json).await?;
        }

        Commands::Link { target } => match target {
            LinkTarget::Product { name } => {
                cli::link::product_link(&state, &name, cli.json)?;
            }
            LinkTarget::Contact { text } => {
                cli::link::contact_link(&state, text.as_deref(), cli.json)?;
            }
        },

        Commands::SignOut => {
            state.auth.sign_out().await?;
            if cli.json {
                println!("{}", serde_json::json!({ "signed_out": true }));
            } else if !cli.quiet {
                println!();
                println!(
                    "  {} Signed out. The next chat starts under a new identity.",
                    console::style("✓").green().bold()
                );
                println!();
            }
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}

/// Log filter derived from `-v` / `--quiet`.
fn log_filter(verbose: u8, quiet: bool) -> &'static str {
    match verbose {
        0 if quiet => "error",
        0 => "warn",
        1 => "info,shopbot=debug",
        _ => "trace",
    }
}

fn init_tracing(cli: &Cli) {
    let filter = EnvFilter::new(log_filter(cli.verbose, cli.quiet));

    if cli.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_filter_by_verbosity() {
        assert_eq!(log_filter(0, true), "error");
        assert_eq!(log_filter(0, false), "warn");
        assert_eq!(log_filter(1, false), "info,shopbot=debug");
        assert_eq!(log_filter(3, true), "trace");
    }
}
