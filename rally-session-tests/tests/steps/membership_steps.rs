use cucumber::{given, then, when};
use rally_session_core::{InboundEvent, RouterConfig, SessionCommand};
use rally_session_tests::SessionWorld;

// ===== Given Steps =====

#[given("a session hosted by the authority")]
async fn session_hosted(world: &mut SessionWorld) {
    world.reset(RouterConfig::default());
}

#[given(expr = "a session with capacity {int}")]
async fn session_with_capacity(world: &mut SessionWorld, max: usize) {
    world.reset(RouterConfig::default().with_max_members(max));
}

#[given(expr = "{word} has joined")]
async fn member_has_joined(world: &mut SessionWorld, name: String) {
    world.join(&name);
}

#[given(expr = "members {word}, {word} and {word} have joined")]
async fn three_members_joined(world: &mut SessionWorld, a: String, b: String, c: String) {
    for name in [a, b, c] {
        world.join(&name);
    }
}

#[given(expr = "members {word} and {word} have joined")]
async fn two_members_joined(world: &mut SessionWorld, a: String, b: String) {
    world.join(&a);
    world.join(&b);
}

// ===== When Steps =====

#[when(expr = "{word} registers")]
async fn member_registers(world: &mut SessionWorld, name: String) {
    world.join(&name);
}

#[when(expr = "{word} registers as {string}")]
async fn member_registers_as(world: &mut SessionWorld, name: String, display_name: String) {
    let member = world.connect(&name);
    world.send(InboundEvent::RegisterRequest {
        member,
        display_name,
    });
}

#[when(expr = "{word} disconnects")]
async fn member_disconnects(world: &mut SessionWorld, name: String) {
    let member = world.member(&name);
    world.send(InboundEvent::PeerDisconnected { member });
}

// ===== Then Steps =====

#[then(expr = "the directory has {int} members")]
async fn directory_count(world: &mut SessionWorld, count: usize) {
    assert_eq!(world.router.directory().count(), count);
}

#[then(expr = "{word} is listed as {string}")]
async fn listed_as(world: &mut SessionWorld, name: String, display_name: String) {
    let member = world.member(&name);
    let record = world
        .router
        .directory()
        .get(member)
        .unwrap_or_else(|| panic!("{} is not registered", name));
    assert_eq!(record.name(), display_name);
}

#[then(expr = "{word} receives a roster of {int} members")]
async fn receives_roster(world: &mut SessionWorld, name: String, count: usize) {
    let roster = world
        .last_commands_for(&name)
        .into_iter()
        .find_map(|c| match c {
            SessionCommand::RosterSnapshot { members } => Some(members),
            _ => None,
        })
        .unwrap_or_else(|| panic!("{} got no roster", name));
    assert_eq!(roster.len(), count);
}

#[then(expr = "{word} is told that {word} joined")]
async fn told_joined(world: &mut SessionWorld, name: String, joiner: String) {
    let joiner_id = world.member(&joiner);
    let told = world.last_commands_for(&name).iter().any(|c| {
        matches!(c, SessionCommand::MemberJoined { member } if member.id() == joiner_id)
    });
    assert!(told, "{} was not told that {} joined", name, joiner);
}

#[then(expr = "{word} is told that {word} left")]
async fn told_left(world: &mut SessionWorld, name: String, leaver: String) {
    let expected = SessionCommand::MemberLeft {
        member: world.member(&leaver),
    };
    assert!(world.last_commands_for(&name).contains(&expected));
}

#[then(expr = "{word} is rejected with {string}")]
async fn rejected_with(world: &mut SessionWorld, name: String, kind: String) {
    let kinds: Vec<String> = world
        .last_commands_for(&name)
        .iter()
        .filter_map(|c| match c {
            SessionCommand::Rejected { error } => Some(SessionWorld::rejection_kind(error)),
            _ => None,
        })
        .collect();
    assert_eq!(kinds, vec![kind]);
}

#[then("nobody else hears about it")]
async fn nobody_else(world: &mut SessionWorld) {
    let others: Vec<_> = world
        .last_outbound
        .iter()
        .filter(|o| !matches!(o.command, SessionCommand::Rejected { .. }))
        .collect();
    assert!(others.is_empty(), "unexpected commands: {:?}", others);
}
