use rally_session_core::{MemberView, SessionCommand, ViewChange};
use rally_session_net::{ClientMessage, MemberClient, SessionConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let config = SessionConfig::default();
    let mut client = MemberClient::connect(&config).await?;
    println!("✅ Connected as {}", client.member_id());

    client
        .send(ClientMessage::Register {
            display_name: "Example".to_string(),
        })
        .await?;

    let mut view = MemberView::new(client.member_id());

    while let Some(command) = client.next_command().await? {
        let started = matches!(command, SessionCommand::GameStart { .. });

        match view.apply(command) {
            ViewChange::LeadershipChanged { is_leader: true } => {
                println!("👑 Leader, starting the game");
                client.send(ClientMessage::Start).await?;
            }
            ViewChange::SceneRequested { scene, round } => {
                println!("🎬 Loading {}", scene);
                client.send(ClientMessage::Ready { round: Some(round) }).await?;
            }
            ViewChange::Rejected(error) => println!("❌ {}", error),
            _ => {}
        }

        if started {
            println!("🏁 Game started with {} members", view.roster().len());
            break;
        }
    }

    client.leave().await?;
    Ok(())
}
