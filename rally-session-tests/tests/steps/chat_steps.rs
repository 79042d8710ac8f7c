use cucumber::{then, when};
use rally_session_core::{InboundEvent, MemberId, SessionCommand};
use rally_session_tests::SessionWorld;

#[when(expr = "{word} sends chat {string}")]
async fn sends_chat(world: &mut SessionWorld, name: String, text: String) {
    let member = world.member(&name);
    world.send(InboundEvent::ChatMessage { member, text });
}

#[when(expr = "an unregistered peer {word} sends chat {string}")]
async fn unregistered_chat(world: &mut SessionWorld, name: String, text: String) {
    let member = world.connect(&name);
    world.send(InboundEvent::ChatMessage { member, text });
}

#[when(expr = "the authority sends chat {string}")]
async fn authority_chat(world: &mut SessionWorld, text: String) {
    world.send(InboundEvent::ChatMessage {
        member: MemberId::AUTHORITY,
        text,
    });
}

#[then(expr = "{word} receives chat {string} from {word}")]
async fn receives_chat(world: &mut SessionWorld, name: String, text: String, from: String) {
    let from = if from == "the-authority" {
        MemberId::AUTHORITY
    } else {
        world.member(&from)
    };
    let expected = SessionCommand::ChatBroadcast { from, text };
    assert!(
        world.last_commands_for(&name).contains(&expected),
        "{} did not receive {:?}",
        name,
        expected
    );
}

#[then("no chat is relayed")]
async fn no_chat(world: &mut SessionWorld) {
    assert!(!world
        .last_outbound
        .iter()
        .any(|o| matches!(o.command, SessionCommand::ChatBroadcast { .. })));
}
