use cucumber::then;
use rally_session_core::SessionCommand;
use rally_session_tests::SessionWorld;

#[then(expr = "the leader is {word}")]
async fn leader_is(world: &mut SessionWorld, name: String) {
    assert_eq!(world.router.leader(), Some(world.member(&name)));
}

#[then("there is no leader")]
async fn no_leader(world: &mut SessionWorld) {
    assert_eq!(world.router.leader(), None);
}

#[then(expr = "{word} is told it is the leader")]
async fn told_leader(world: &mut SessionWorld, name: String) {
    assert!(world
        .last_commands_for(&name)
        .contains(&SessionCommand::LeaderStatus { is_leader: true }));
}

#[then(expr = "{word} is told it is not the leader")]
async fn told_not_leader(world: &mut SessionWorld, name: String) {
    assert!(world
        .last_commands_for(&name)
        .contains(&SessionCommand::LeaderStatus { is_leader: false }));
}

#[then(expr = "{word} receives no leader status")]
async fn no_leader_status(world: &mut SessionWorld, name: String) {
    assert!(!world
        .last_commands_for(&name)
        .iter()
        .any(|c| matches!(c, SessionCommand::LeaderStatus { .. })));
}
