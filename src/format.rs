use colored::Colorize;

use crate::assistant::{Action, AssistantReply};
use crate::message::{Message, Role};
use crate::services::{Availability, TrainRecord};

/// Format a message for terminal display with role label and colors.
pub fn format_message(msg: &Message) -> String {
    let label = format_role_label(msg.role);
    let text = msg.text();
    let body = match msg.role {
        Role::System => text.dimmed().to_string(),
        _ => text,
    };
    format!("{}\n{}", label, body)
}

fn format_role_label(role: Role) -> String {
    let label = format!("{role}:");
    match role {
        Role::User => label.green().bold().to_string(),
        Role::Assistant => label.cyan().bold().to_string(),
        Role::System => label.dimmed().to_string(),
    }
}

/// Render an assistant reply: the action tag, the answer, and any lookup
/// result laid out for the terminal.
pub fn format_reply(reply: &AssistantReply) -> String {
    let mut out = format!("{}\n", format!("[{}]", reply.action).dimmed());
    out.push_str(&reply.text.bold().to_string());

    let details = match (reply.action, &reply.data) {
        (Action::SearchTrains, Some(data)) => serde_json::from_value::<Vec<TrainRecord>>(data.clone())
            .ok()
            .map(|trains| format_trains(&trains)),
        (Action::CheckAvailability, Some(data)) => {
            serde_json::from_value::<Availability>(data.clone())
                .ok()
                .map(|a| format_availability(&a))
        }
        _ => None,
    };
    if let Some(details) = details {
        out.push('\n');
        out.push_str(&details);
    }
    out
}

pub fn format_trains(trains: &[TrainRecord]) -> String {
    trains
        .iter()
        .map(|t| {
            format!(
                "  {}  {:<18} {} -> {}",
                t.train_number.yellow(),
                t.train_name,
                t.departure,
                t.arrival
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_availability(a: &Availability) -> String {
    [("SL", &a.sleeper), ("3AC", &a.third_ac), ("2AC", &a.second_ac)]
        .iter()
        .map(|(class, status)| {
            let status = if status.starts_with("WL") {
                status.red().to_string()
            } else {
                status.green().to_string()
            };
            format!("  {:<4} {}", class.cyan(), status)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant;

    fn plain<F: FnOnce() -> String>(f: F) -> String {
        colored::control::set_override(false);
        f()
    }

    #[test]
    fn message_has_role_label() {
        let out = plain(|| format_message(&Message::user("hi")));
        assert_eq!(out, "you:\nhi");
    }

    #[test]
    fn search_reply_lists_trains() {
        let reply = assistant::run(Action::SearchTrains, "from Pune to Goa");
        let out = plain(|| format_reply(&reply));
        assert!(out.starts_with("[search_trains]\n2 trains from Pune to Goa"));
        assert!(out.contains("12301  Rajdhani Express"));
        assert!(out.contains("07:00 -> 13:00"));
    }

    #[test]
    fn availability_reply_lists_classes() {
        let reply = assistant::run(Action::CheckAvailability, "12002");
        let out = plain(|| format_reply(&reply));
        assert!(out.contains("3AC  WL 12"));
        assert!(out.contains("SL   Available 45"));
    }

    #[test]
    fn policy_reply_has_no_details() {
        let reply = assistant::run(Action::CancellationPolicy, "");
        let out = plain(|| format_reply(&reply));
        assert!(out.ends_with("No refund"));
    }
}
