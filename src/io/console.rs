//! Operator console - line commands against the desk
//!
//! Parsing turns a line into a `Command`; `execute` runs it and renders a
//! plain-text reply. The console holds no state of its own: every view is
//! read from the engine at the moment the command runs.

use crate::domain::error::EngineError;
use crate::domain::session::{Resource, Session};
use crate::domain::types::{LockerId, Plan, PoolId, RoomId, SessionId};
use crate::services::desk::Desk;
use crate::services::engine::DashboardSummary;
use std::fmt::Write;
use std::io::BufRead;
use tokio::sync::mpsc;
use tracing::debug;

/// Grid cells per row when rendering a pool
const GRID_COLUMNS: usize = 5;

const HELP: &str = "\
commands:
  open <room> <locker> <plan> <name...>   check a customer in
  pay <session>                           take payment and release room/locker
  status                                  dashboard
  rooms | lockers                         occupancy grid
  unpaid | paid                           session lists
  price <plan>                            fee for a plan
  set-price <plan> <fee>                  change a fee for new sessions
  reset                                   clear all sessions and pools
  dump                                    JSON snapshot
  help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Open { room: RoomId, locker: LockerId, plan: Plan, name: String },
    Pay(SessionId),
    Status,
    Rooms,
    Lockers,
    Unpaid,
    Paid,
    /// Raw plan name; unknown names price at zero
    Price(String),
    SetPrice { plan: Plan, fee: u64 },
    Reset,
    Dump,
    Help,
    Quit,
}

/// Result of running one command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Reply(String),
    Quit,
}

fn missing(what: &str) -> EngineError {
    EngineError::Validation(format!("{what} is required"))
}

impl Command {
    /// Parse one console line; blank lines yield `Ok(None)`
    pub fn parse(line: &str) -> Result<Option<Command>, EngineError> {
        let line = line.trim();
        let Some((verb, rest)) = split_word(line) else {
            return Ok(None);
        };

        let command = match verb.to_ascii_lowercase().as_str() {
            "open" => {
                let (room, rest) = split_word(rest).ok_or_else(|| missing("room"))?;
                let (locker, rest) = split_word(rest).ok_or_else(|| missing("locker"))?;
                let (plan, name) = split_word(rest).ok_or_else(|| missing("plan"))?;
                if name.is_empty() {
                    return Err(missing("customer name"));
                }
                Command::Open {
                    room: room.parse()?,
                    locker: locker.parse()?,
                    plan: plan.parse()?,
                    name: name.to_string(),
                }
            }
            "pay" => {
                let (id, _) = split_word(rest).ok_or_else(|| missing("session"))?;
                Command::Pay(id.parse()?)
            }
            "status" => Command::Status,
            "rooms" => Command::Rooms,
            "lockers" => Command::Lockers,
            "unpaid" => Command::Unpaid,
            "paid" => Command::Paid,
            "price" => {
                let (plan, _) = split_word(rest).ok_or_else(|| missing("plan"))?;
                Command::Price(plan.to_string())
            }
            "set-price" => {
                let (plan, rest) = split_word(rest).ok_or_else(|| missing("plan"))?;
                let (fee, _) = split_word(rest).ok_or_else(|| missing("fee"))?;
                let fee = fee
                    .parse::<u64>()
                    .map_err(|_| EngineError::Validation(format!("invalid fee: {fee:?}")))?;
                Command::SetPrice { plan: plan.parse()?, fee }
            }
            "reset" => Command::Reset,
            "dump" => Command::Dump,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => {
                return Err(EngineError::Validation(format!("unknown command: {other:?}")))
            }
        };
        Ok(Some(command))
    }
}

/// First whitespace-separated word and the trimmed remainder
fn split_word(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    if s.is_empty() {
        return None;
    }
    match s.find(char::is_whitespace) {
        Some(at) => Some((&s[..at], s[at..].trim())),
        None => Some((s, "")),
    }
}

/// Run a command against the desk and render the reply
pub fn execute(desk: &Desk, command: Command) -> Outcome {
    let reply = match command {
        Command::Open { room, locker, plan, name } => {
            match desk.open_session(&name, room, locker, plan) {
                Ok(s) => format!(
                    "opened {} for {}: room {} locker {} {} fee {}",
                    s.id, s.customer_name, s.room_id, s.locker_id, s.plan, s.fee
                ),
                Err(e) => format!("error: {e}"),
            }
        }
        Command::Pay(id) => match desk.close_session(id) {
            Ok(s) => format!(
                "paid {} ({}): {} collected, room {} and locker {} released",
                s.id, s.customer_name, s.fee, s.room_id, s.locker_id
            ),
            Err(e) => format!("error: {e}"),
        },
        Command::Status => render_dashboard(&desk.read(|e| e.dashboard())),
        Command::Rooms => desk.read(|e| render_grid("rooms", e.rooms())),
        Command::Lockers => desk.read(|e| render_grid("lockers", e.lockers())),
        Command::Unpaid => desk.read(|e| render_sessions("unpaid", e.unpaid_sessions())),
        Command::Paid => desk.read(|e| render_sessions("paid", e.paid_sessions())),
        Command::Price(name) => {
            let fee = desk.read(|e| e.price_for_name(&name));
            format!("{name}: {fee}")
        }
        Command::SetPrice { plan, fee } => {
            desk.set_price(plan, fee);
            format!("{plan} now {fee} for new sessions")
        }
        Command::Reset => {
            desk.reset();
            "reset: all sessions cleared".to_string()
        }
        Command::Dump => match serde_json::to_string_pretty(&desk.read(|e| e.snapshot())) {
            Ok(json) => json,
            Err(e) => format!("error: {e}"),
        },
        Command::Help => HELP.to_string(),
        Command::Quit => return Outcome::Quit,
    };
    Outcome::Reply(reply)
}

fn render_dashboard(summary: &DashboardSummary) -> String {
    let rooms = &summary.occupancy.rooms;
    let lockers = &summary.occupancy.lockers;
    format!(
        "active {} | paid {} | rooms {}/{} occupied ({} free) | lockers {}/{} occupied ({} free) | revenue {}",
        summary.active_sessions,
        summary.paid_sessions,
        rooms.occupied,
        rooms.total,
        rooms.available,
        lockers.occupied,
        lockers.total,
        lockers.available,
        summary.revenue
    )
}

fn render_grid<I: PoolId>(title: &str, resources: &[Resource<I>]) -> String {
    let mut out = format!("{title} ({}):", resources.len());
    for (i, resource) in resources.iter().enumerate() {
        if i % GRID_COLUMNS == 0 {
            out.push('\n');
        } else {
            out.push(' ');
        }
        let cell = match resource.occupant() {
            Some(session) => session.to_string(),
            None => "----".to_string(),
        };
        let _ = write!(out, "{}[{:>4}]", resource.id(), cell);
    }
    out
}

fn render_sessions<'a>(title: &str, sessions: impl Iterator<Item = &'a Session>) -> String {
    let mut out = String::new();
    let mut count = 0usize;
    for s in sessions {
        count += 1;
        let _ = write!(
            out,
            "\n{} {} room {} locker {} {} fee {} since {}",
            s.id,
            s.customer_name,
            s.room_id,
            s.locker_id,
            s.plan,
            s.fee,
            s.start_time.format("%Y-%m-%d %H:%M")
        );
        if let Some(end) = s.end_time {
            let _ = write!(out, " paid {}", end.format("%H:%M"));
        }
    }
    format!("{title} ({count}):{out}")
}

/// Read lines on a dedicated OS thread and forward them over a channel
///
/// A blocking read cannot be cancelled, so it lives outside the runtime: the
/// receiver can be dropped at any time and process exit is never held up by a
/// pending read. The channel closes on EOF or a read error.
pub fn spawn_line_reader<R>(reader: R, capacity: usize) -> mpsc::Receiver<String>
where
    R: BufRead + Send + 'static,
{
    let (line_tx, line_rx) = mpsc::channel(capacity);
    std::thread::spawn(move || {
        for line in reader.lines() {
            let Ok(line) = line else { break };
            if line_tx.blocking_send(line).is_err() {
                break;
            }
        }
        debug!("line_reader_stopped");
    });
    line_rx
}
