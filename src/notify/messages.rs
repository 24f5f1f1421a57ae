//! Human-readable text the engine sends to players and to the operator log.

use super::host::PlayerInfo;

pub const SERVER_WELCOME: &str =
    "[Server] Welcome to Duckov Together! We are thrilled to have each and every one of you here.";

pub fn join_greeting(name: &str) -> String {
    format!("Welcome, {}! We are delighted to have you with us.", name)
}

pub fn online_count(count: usize) -> String {
    format!("Current players online: {}", count)
}

pub fn join_broadcast(name: &str) -> String {
    format!(
        "[Server] Welcome {} to the server! Let's make this raid memorable.",
        name
    )
}

pub fn farewell(name: &str, minutes: f64) -> Vec<String> {
    vec![
        format!("Farewell, {}. You played for {:.1} minutes.", name, minutes),
        "We hope to see you again soon. Take care out there!".to_string(),
    ]
}

pub fn farewell_kills(name: &str, kills: u32) -> String {
    format!(
        "{} leaves with {} confirmed eliminations. Impressive work!",
        name, kills
    )
}

pub fn leave_broadcast(name: &str) -> String {
    format!(
        "[Server] {} has left the server. Safe travels, friend.",
        name
    )
}

pub fn tip(text: &str) -> String {
    format!("[Tip] {}", text)
}

pub fn announcement(text: &str) -> String {
    format!("[Announcement] {}", text)
}

pub fn help() -> Vec<String> {
    [
        "Available commands:",
        "  !help - Show this message",
        "  !stats - View your statistics",
        "  !online - See who is online",
        "  !time - Check your play time",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

pub fn stats(kills: u32) -> Vec<String> {
    vec![
        "Your Statistics:".to_string(),
        format!("  Eliminations: {}", kills),
    ]
}

/// Header plus one line per player; unmeasured latency is left out
pub fn online_list(players: &[PlayerInfo]) -> Vec<String> {
    let mut lines = Vec::with_capacity(players.len() + 1);
    lines.push(format!("Players Online ({}):", players.len()));
    for player in players {
        if player.latency_ms > 0 {
            lines.push(format!("  - {} ({}ms)", player.name, player.latency_ms));
        } else {
            lines.push(format!("  - {}", player.name));
        }
    }
    lines
}

pub fn play_time(minutes: f64) -> Vec<String> {
    vec![
        format!("You have been playing for {:.1} minutes.", minutes),
        "Thank you for spending your time with us!".to_string(),
    ]
}

pub fn server_stats(total_served: u64, online: usize, active_sessions: usize) -> Vec<String> {
    vec![
        "Server Statistics:".to_string(),
        format!("  Total players served: {}", total_served),
        format!("  Currently online: {}", online),
        format!("  Active sessions: {}", active_sessions),
    ]
}
