use crate::application::{broadcast, Outbound, SessionCommand};
use crate::domain::{MemberId, SessionDirectory};

/// Relay one chat line to every current member, sender included
///
/// Stateless; ordering relative to other broadcasts is whatever the
/// transport gives per peer.
pub fn relay(directory: &SessionDirectory, from: MemberId, text: &str) -> Vec<Outbound> {
    tracing::debug!(
        "💬 Relaying chat from {} to {} members",
        from,
        directory.count()
    );

    broadcast(
        directory,
        SessionCommand::ChatBroadcast {
            from,
            text: text.to_string(),
        },
    )
}
