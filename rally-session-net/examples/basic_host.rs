use rally_session_net::{AuthorityLoop, SessionConfig, TcpTransport};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let config = SessionConfig::default();
    let transport = TcpTransport::bind(&config.socket_addr()).await?;
    println!("✅ Listening on {}", transport.local_addr());

    let mut authority = AuthorityLoop::new(transport, config.clone());
    println!("📋 Session {}", authority.session_id());

    let mut interval = tokio::time::interval(config.poll_interval);
    let mut last_count = 0;

    loop {
        interval.tick().await;
        authority.poll();

        let count = authority.router().directory().count();
        if count != last_count {
            println!(
                "🏠 {} members, leader: {:?}",
                count,
                authority.router().leader()
            );
            last_count = count;
        }
    }
}
