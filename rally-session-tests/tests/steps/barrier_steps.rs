use cucumber::{given, then, when};
use rally_session_core::domain::BarrierState;
use rally_session_core::{InboundEvent, RoundId, RouterConfig, SessionCommand};
use rally_session_tests::SessionWorld;
use std::time::Duration;

fn game_starts(commands: &[SessionCommand]) -> usize {
    commands
        .iter()
        .filter(|c| matches!(c, SessionCommand::GameStart { .. }))
        .count()
}

// ===== Given Steps =====

#[given(expr = "a session with a readiness timeout of {int} seconds")]
async fn session_with_timeout(world: &mut SessionWorld, secs: u64) {
    world.reset(RouterConfig::default().with_ready_timeout(Duration::from_secs(secs)));
}

#[given(expr = "{word} has started the game")]
async fn has_started(world: &mut SessionWorld, name: String) {
    request_start(world, name).await;
    world.clear_log();
}

// ===== When Steps =====

#[when(expr = "{word} requests the game start")]
async fn request_start(world: &mut SessionWorld, name: String) {
    let member = world.member(&name);
    world.send(InboundEvent::StartRequest { member });
}

#[when(expr = "{word} reports ready")]
async fn reports_ready(world: &mut SessionWorld, name: String) {
    let member = world.member(&name);
    world.send(InboundEvent::ReadyAck {
        member,
        round: None,
    });
}

#[when(expr = "{word} reports ready for round {int}")]
async fn reports_ready_for(world: &mut SessionWorld, name: String, round: u64) {
    let member = world.member(&name);
    world.send(InboundEvent::ReadyAck {
        member,
        round: Some(RoundId::new(round)),
    });
}

#[when(expr = "{int} seconds pass")]
async fn seconds_pass(world: &mut SessionWorld, secs: u64) {
    world.advance(Duration::from_secs(secs));
}

// ===== Then Steps =====

#[then(expr = "{word} is asked to load the scene for round {int}")]
async fn asked_to_load(world: &mut SessionWorld, name: String, round: u64) {
    let asked = world.last_commands_for(&name).iter().any(|c| {
        matches!(c, SessionCommand::LoadScene { round: r, .. } if *r == RoundId::new(round))
    });
    assert!(asked, "{} was not asked to load round {}", name, round);
}

#[then(expr = "{word} receives exactly one GameStart")]
async fn exactly_one_start(world: &mut SessionWorld, name: String) {
    assert_eq!(game_starts(&world.logged_commands_for(&name)), 1);
}

#[then(expr = "{word} receives no GameStart")]
async fn no_start(world: &mut SessionWorld, name: String) {
    assert_eq!(game_starts(&world.logged_commands_for(&name)), 0);
}

#[then(expr = "the round was released {int} time(s)")]
async fn released_times(world: &mut SessionWorld, times: u64) {
    assert_eq!(world.router.barrier().releases(), times);
}

#[then("the barrier is idle")]
async fn barrier_idle(world: &mut SessionWorld) {
    assert_eq!(world.router.barrier().state(), BarrierState::Idle);
}

#[then(expr = "the barrier is armed for round {int}")]
async fn barrier_armed(world: &mut SessionWorld, round: u64) {
    assert_eq!(
        world.router.barrier().state(),
        BarrierState::Armed(RoundId::new(round))
    );
}

#[then(expr = "the round waits on {int} member(s)")]
async fn round_waits_on(world: &mut SessionWorld, count: usize) {
    let round = world
        .router
        .barrier()
        .current_round()
        .expect("no round armed");
    assert_eq!(round.outstanding().len(), count);
}
