use crate::application::console::{describe, parse_line, roster_lines, ConsoleInput};
use crate::application::stdin_lines;
use crate::infrastructure::Result;
use rally_session_core::{MemberView, RoundId, ViewChange};
use rally_session_net::{ClientMessage, MemberClient, SessionConfig};
use std::time::Duration;
use tokio::sync::mpsc;

/// Join a session and drive it from the console until `/quit` or Ctrl+C
pub async fn run_member(config: SessionConfig, name: String, load_delay: Duration) -> Result<()> {
    tracing::info!("Connecting to {}", config.socket_addr());

    let mut client = MemberClient::connect(&config).await?;
    client
        .send(ClientMessage::Register { display_name: name })
        .await?;

    println!("Connected as {}. Commands: /start /who /quit", client.member_id());

    let mut view = MemberView::new(client.member_id());
    let mut console = stdin_lines();
    let mut console_open = true;
    let (ready_tx, mut ready_rx) = mpsc::channel::<RoundId>(4);

    loop {
        tokio::select! {
            command = client.next_command() => match command? {
                Some(command) => {
                    let change = view.apply(command);
                    if let Some(text) = describe(&view, &change) {
                        println!("{}", text);
                    }
                    if let ViewChange::SceneRequested { round, .. } = change {
                        schedule_ready(ready_tx.clone(), round, load_delay);
                    }
                }
                None => {
                    tracing::warn!("Authority closed the connection");
                    return Ok(());
                }
            },

            Some(round) = ready_rx.recv() => {
                // A newer LoadScene supersedes this one
                if view.current_round() == Some(round) {
                    client.send(ClientMessage::Ready { round: Some(round) }).await?;
                }
            }

            line = console.recv(), if console_open => match line.as_deref().map(parse_line) {
                None => console_open = false,
                Some(None) => {}
                Some(Some(ConsoleInput::Start)) => client.send(ClientMessage::Start).await?,
                Some(Some(ConsoleInput::Quit)) => break,
                Some(Some(ConsoleInput::Who)) => {
                    for line in roster_lines(&view) {
                        println!("{}", line);
                    }
                }
                Some(Some(ConsoleInput::Chat(text))) => {
                    client.send(ClientMessage::Chat { text }).await?
                }
            },

            signal = tokio::signal::ctrl_c() => {
                signal?;
                break;
            }
        }
    }

    tracing::info!("Leaving session {}", client.session_id());
    client.leave().await?;
    Ok(())
}

/// Acknowledge `round` once the simulated scene load finishes
fn schedule_ready(ready: mpsc::Sender<RoundId>, round: RoundId, load_delay: Duration) {
    tokio::spawn(async move {
        tokio::time::sleep(load_delay).await;
        let _ = ready.send(round).await;
    });
}
