use rally_session_core::{MemberView, ViewChange};

/// One line typed at the member console
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleInput {
    Start,
    Quit,
    Who,
    Chat(String),
}

/// Parse a console line; blank lines yield nothing
pub fn parse_line(line: &str) -> Option<ConsoleInput> {
    let trimmed = line.trim();
    match trimmed {
        "" => None,
        "/start" => Some(ConsoleInput::Start),
        "/quit" => Some(ConsoleInput::Quit),
        "/who" => Some(ConsoleInput::Who),
        _ => Some(ConsoleInput::Chat(trimmed.to_string())),
    }
}

/// Human-readable line for a view change, if it is worth showing
pub fn describe(view: &MemberView, change: &ViewChange) -> Option<String> {
    match change {
        ViewChange::LeadershipChanged { is_leader: true } => {
            Some("👑 You are the leader. Type /start to begin.".to_string())
        }
        ViewChange::LeadershipChanged { is_leader: false } => None,
        ViewChange::RosterChanged => Some(format!("👥 {} members", view.roster().len())),
        ViewChange::SceneRequested { scene, round } => {
            Some(format!("🎬 Loading {} ({})", scene, round))
        }
        ViewChange::GameStarted { round } => Some(format!("🏁 Game started ({})", round)),
        ViewChange::Chat(line) => Some(format!("[{}] {}", view.name_of(line.from), line.text)),
        ViewChange::Rejected(error) => Some(format!("❌ {}", error)),
        ViewChange::Unchanged => None,
    }
}

/// Roster listing for `/who`, leader first
pub fn roster_lines(view: &MemberView) -> Vec<String> {
    view.roster()
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let mut line = format!("{} {}", record.id(), record.name());
            if i == 0 {
                line.push_str(" (leader)");
            }
            if record.id() == view.me() {
                line.push_str(" (you)");
            }
            line
        })
        .collect()
}
