use crate::application::stdin_lines;
use crate::infrastructure::Result;
use rally_session_net::{AuthorityLoop, SessionConfig, TcpTransport};

/// Host a session until Ctrl+C; console lines are relayed as chat
pub async fn run_host(config: SessionConfig) -> Result<()> {
    let transport = TcpTransport::bind(&config.socket_addr()).await?;
    let local_addr = transport.local_addr();

    let mut authority = AuthorityLoop::new(transport, config);

    tracing::info!("✓ Session {} listening on {}", authority.session_id(), local_addr);
    tracing::info!("Members join with:");
    tracing::info!(
        "  rally-cli join --address {} --port {} --name <NAME>",
        local_addr.ip(),
        local_addr.port()
    );
    tracing::info!("Type to chat, Ctrl+C to stop");

    let console = stdin_lines();

    tokio::select! {
        _ = authority.run(console) => {}
        signal = tokio::signal::ctrl_c() => signal?,
    }

    tracing::info!(
        "Shutting down with {} members registered",
        authority.router().directory().count()
    );

    Ok(())
}
