//! Declarative view functions: values in, printable strings out. The
//! renderer task prints what these return and nothing else.

use termimad::crossterm::style::{Color, Stylize};
use termimad::{FmtText, MadSkin, terminal_size};

use crate::gauge::{self, GaugeTier};
use crate::highlight;
use crate::history::History;
use crate::models::{AnswerResult, RequestTicket};

pub const GAUGE_WIDTH: usize = 30;

pub fn tier_color(tier: GaugeTier) -> Color {
    match tier {
        GaugeTier::High => Color::Cyan,
        GaugeTier::Mid => Color::Yellow,
        GaugeTier::Low => Color::Red,
    }
}

/// Plain fill bar, proportional to the parsed score.
pub fn gauge_bar(score: &str) -> String {
    let reading = gauge::read_score(score);
    let filled = ((reading.fill / 100.0) * GAUGE_WIDTH as f32).round() as usize;
    let filled = filled.min(GAUGE_WIDTH);
    format!("{}{}", "█".repeat(filled), "░".repeat(GAUGE_WIDTH - filled))
}

/// Latency and relevance readouts plus the tinted gauge.
pub fn status_line(latency: &str, score: &str) -> String {
    let reading = gauge::read_score(score);
    let bar = gauge_bar(score).with(tier_color(reading.tier));
    format!("latency {latency}  ·  relevance {score}  {bar}")
}

pub fn loading_card(ticket: &RequestTicket, query: &str) -> String {
    format!(
        "[{}] searching the source material for \"{query}\" …",
        ticket.rid
    )
}

pub fn error_card(description: &str) -> String {
    format!("{} search halted: {description}", "✖".with(Color::Red))
}

pub fn answer_header(result: &AnswerResult) -> String {
    format!(
        "{}  {}",
        result.query.to_uppercase().with(Color::Cyan).bold(),
        format!("[source: page {}]", result.page).with(Color::DarkGrey),
    )
}

pub fn export_hint() -> String {
    format!("{}", "(:copy citation · :save note)".with(Color::DarkGrey))
}

pub fn history_panel(history: &History) -> String {
    if history.is_empty() {
        return "recent queries: none yet\n".to_string();
    }
    let mut panel = String::from("recent queries\n");
    for entry in history.iter() {
        panel.push_str(&format!(
            "  Q: {}  ·  Ref: Page {}\n",
            entry.query, entry.page
        ));
    }
    panel
}

/// The answer with query terms emphasised, as markdown.
pub fn answer_markdown(result: &AnswerResult) -> String {
    highlight::highlight_terms(&result.answer, &result.query)
}

pub fn console_skin() -> MadSkin {
    let mut skin = MadSkin::default();
    skin.bold.set_fg(Color::Cyan);
    skin
}

/// Renders markdown at the given width through the console skin.
pub fn render_markdown(markdown: &str, columns: u16) -> String {
    let skin = console_skin();
    FmtText::from(&skin, markdown, Some(columns.max(60) as usize)).to_string()
}

pub fn console_columns() -> u16 {
    let (width, _) = terminal_size();
    width.max(60)
}
