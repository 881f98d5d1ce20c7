//! Colorful console output for solver runs.
//!
//! Provides a custom `tracing` layer that formats the solver's lifecycle
//! events with colors.
//!
//! ## Log Levels
//!
//! - **INFO**: solve start and end
//! - **DEBUG**: model size, backend search, diagnosis
//! - **TRACE**: incumbent improvements

use std::io::{self, Write};
use std::sync::OnceLock;

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();

/// Filter applied when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "groupmeet_solver=info";

/// Initializes console output.
///
/// Safe to call multiple times - only the first call has effect. Does nothing
/// if another global subscriber is already installed.
pub fn init() {
    INIT.get_or_init(|| {
        print_banner();

        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(SolverConsoleLayer)
            .try_init();
    });
}

fn print_banner() {
    let version_line = format!("groupmeet v{}", env!("CARGO_PKG_VERSION"));
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{}", version_line.bright_cyan().bold());
    let _ = stdout.flush();
}

/// A tracing layer that formats solver events with colors.
pub struct SolverConsoleLayer;

impl<S: Subscriber> Layer<S> for SolverConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if !event.metadata().target().starts_with("groupmeet_solver") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_solver_event(&visitor);
        if !output.is_empty() {
            let _ = writeln!(io::stdout(), "{output}");
        }
    }
}

#[derive(Debug, Default)]
struct EventVisitor {
    event: Option<String>,
    verdict: Option<String>,
    cause: Option<String>,
    backend: Option<String>,
    best_known_cost: Option<String>,
    participants: Option<u64>,
    slots: Option<u64>,
    pre_groups: Option<u64>,
    max_groups_per_slot: Option<u64>,
    cost: Option<u64>,
    groups: Option<u64>,
    overflow_groups: Option<u64>,
    nodes: Option<u64>,
    elapsed_ms: Option<u64>,
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{value:?}");
        match field.name() {
            "cause" => self.cause = Some(s),
            "best_known_cost" => self.best_known_cost = Some(s),
            _ => {}
        }
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "participants" => self.participants = Some(value),
            "slots" => self.slots = Some(value),
            "pre_groups" => self.pre_groups = Some(value),
            "max_groups_per_slot" => self.max_groups_per_slot = Some(value),
            "cost" => self.cost = Some(value),
            "groups" => self.groups = Some(value),
            "overflow_groups" => self.overflow_groups = Some(value),
            "nodes" => self.nodes = Some(value),
            "elapsed_ms" => self.elapsed_ms = Some(value),
            _ => {}
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value.max(0) as u64);
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "event" => self.event = Some(value.to_string()),
            "verdict" => self.verdict = Some(value.to_string()),
            "backend" => self.backend = Some(value.to_string()),
            "cause" => self.cause = Some(value.to_string()),
            _ => {}
        }
    }
}

fn format_solver_event(v: &EventVisitor) -> String {
    match v.event.as_deref() {
        Some("solve_start") => format_solve_start(v),
        Some("solve_end") => format_solve_end(v),
        _ => String::new(),
    }
}

fn count(value: Option<u64>) -> String {
    value.unwrap_or(0).to_formatted_string(&Locale::en)
}

fn format_solve_start(v: &EventVisitor) -> String {
    format!(
        "{} {} participants ({}), slots ({}), pre-groups ({}), capacity ({}), backend ({})",
        "INFO".bright_green(),
        "[Solver]".bright_cyan(),
        count(v.participants).bright_yellow(),
        count(v.slots).bright_yellow(),
        count(v.pre_groups).bright_yellow(),
        count(v.max_groups_per_slot).bright_yellow(),
        v.backend.as_deref().unwrap_or("unknown").white().bold(),
    )
}

fn format_solve_end(v: &EventVisitor) -> String {
    let elapsed = format_duration_ms(v.elapsed_ms.unwrap_or(0));
    let nodes = count(v.nodes);
    let head = format!("{} {}", "INFO".bright_green(), "[Solver]".bright_cyan());

    match v.verdict.as_deref() {
        Some("optimal") => format!(
            "{head} {} cost ({}), groups ({}), overflow groups ({}), nodes ({}), time spent ({})",
            "OPTIMAL".bright_green().bold(),
            count(v.cost).bright_magenta().bold(),
            count(v.groups).white(),
            count(v.overflow_groups).white(),
            nodes.white(),
            elapsed.yellow(),
        ),
        Some("infeasible") => format!(
            "{head} {} {}, nodes ({}), time spent ({})",
            "INFEASIBLE".bright_red().bold(),
            v.cause.as_deref().unwrap_or("unknown cause").red(),
            nodes.white(),
            elapsed.yellow(),
        ),
        Some("timeout") => format!(
            "{head} {} best known cost ({}), nodes ({}), time spent ({})",
            "TIMEOUT".yellow().bold(),
            v.best_known_cost.as_deref().unwrap_or("None").white(),
            nodes.white(),
            elapsed.yellow(),
        ),
        _ => String::new(),
    }
}

fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{ms}ms")
    } else if ms < 60_000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        let mins = ms / 60_000;
        let secs = (ms % 60_000) / 1000;
        format!("{mins}m {secs}s")
    }
}
