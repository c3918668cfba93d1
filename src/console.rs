use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use serde_json::json;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::api::AskClient;
use crate::config::ConsoleOptions;
use crate::export;
use crate::history::History;
use crate::models::{AnswerResult, HistoryEntry, RequestTicket};
use crate::render;
use crate::reveal;

/// Everything the terminal shows flows through these events, consumed by a
/// single renderer task that owns stdout and all view state.
#[derive(Debug)]
pub enum ViewEvent {
    Loading {
        ticket: RequestTicket,
        query: String,
    },
    Answer {
        ticket: RequestTicket,
        result: AnswerResult,
    },
    Failed {
        ticket: RequestTicket,
        description: String,
    },
    CopyCitation,
    SaveNote,
    ShowHistory,
}

/// Outcome of handing a line to the dispatcher.
#[derive(Debug, PartialEq, Eq)]
pub enum Dispatch {
    /// A request went out under this seq.
    Submitted(u64),
    /// Empty or whitespace-only input; no request, no view change.
    Ignored,
}

/// Input side of the console: turns typed lines into requests. View state
/// lives on the renderer, not here.
pub struct Console {
    client: Arc<AskClient>,
    events: mpsc::UnboundedSender<ViewEvent>,
    next_seq: u64,
    inflight: CancellationToken,
}

impl Console {
    pub fn new(client: AskClient, events: mpsc::UnboundedSender<ViewEvent>) -> Console {
        Console {
            client: Arc::new(client),
            events,
            next_seq: 0,
            inflight: CancellationToken::new(),
        }
    }

    /// Issues a request for a non-empty query. A new dispatch supersedes any
    /// request still in flight: the old ticket is cancelled and its response
    /// gets dropped as stale, so only the latest answer renders.
    pub fn dispatch(&mut self, raw: &str) -> Dispatch {
        let query = raw.trim();
        if query.is_empty() {
            return Dispatch::Ignored;
        }

        self.inflight.cancel();
        self.next_seq += 1;
        let ticket = RequestTicket::new(self.next_seq);
        self.inflight = ticket.cancel.clone();

        let _ = self.events.send(ViewEvent::Loading {
            ticket: ticket.clone(),
            query: query.to_string(),
        });

        let client = self.client.clone();
        let events = self.events.clone();
        let query = query.to_string();
        let seq = ticket.seq;
        tokio::spawn(async move {
            tracing::debug!(rid = %ticket.rid, seq, "question dispatched");
            match client.ask(&query).await {
                Ok(result) => {
                    let _ = events.send(ViewEvent::Answer { ticket, result });
                }
                Err(err) => {
                    let _ = events.send(ViewEvent::Failed {
                        ticket,
                        description: err.to_string(),
                    });
                }
            }
        });

        Dispatch::Submitted(seq)
    }
}

/// View state for one session, owned by the renderer task. Mutated from
/// exactly one place, like a page's single UI thread.
pub struct ConsoleView {
    options: ConsoleOptions,
    columns: u16,
    tty: bool,
    history: History,
    last_answer: Option<AnswerResult>,
    latest_seq: u64,
}

impl ConsoleView {
    pub fn new(options: ConsoleOptions, columns: u16, tty: bool) -> ConsoleView {
        ConsoleView {
            options,
            columns,
            tty,
            history: History::new(),
            last_answer: None,
            latest_seq: 0,
        }
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn last_answer(&self) -> Option<&AnswerResult> {
        self.last_answer.as_ref()
    }

    fn is_stale(&self, ticket: &RequestTicket) -> bool {
        ticket.seq < self.latest_seq || ticket.cancel.is_cancelled()
    }

    /// Applies one event to the terminal. Answers render in a fixed order:
    /// status line, history, header, then the reveal that swaps to the
    /// highlighted text on completion.
    pub async fn apply<W: Write>(&mut self, event: ViewEvent, out: &mut W) -> std::io::Result<()> {
        match event {
            ViewEvent::Loading { ticket, query } => {
                if self.is_stale(&ticket) {
                    return Ok(());
                }
                self.latest_seq = ticket.seq;
                writeln!(out, "{}", render::loading_card(&ticket, &query))?;
                out.flush()
            }
            ViewEvent::Answer { ticket, result } => {
                if self.is_stale(&ticket) {
                    tracing::debug!(rid = %ticket.rid, "stale answer dropped");
                    return Ok(());
                }
                self.render_answer(&ticket, result, out).await
            }
            ViewEvent::Failed {
                ticket,
                description,
            } => {
                if self.is_stale(&ticket) {
                    tracing::debug!(rid = %ticket.rid, "stale failure dropped");
                    return Ok(());
                }
                writeln!(out, "{}", render::error_card(&description))?;
                out.flush()
            }
            ViewEvent::CopyCitation => self.copy_citation(out),
            ViewEvent::SaveNote => self.save_note(out),
            ViewEvent::ShowHistory => {
                write!(out, "{}", render::history_panel(&self.history))?;
                out.flush()
            }
        }
    }

    async fn render_answer<W: Write>(
        &mut self,
        ticket: &RequestTicket,
        result: AnswerResult,
        out: &mut W,
    ) -> std::io::Result<()> {
        writeln!(out, "{}", render::status_line(&result.latency, &result.score))?;

        self.history.push(HistoryEntry::new(
            result.query.clone(),
            result.page.clone(),
        ));
        if self.options.show_history {
            write!(out, "{}", render::history_panel(&self.history))?;
        }

        writeln!(out, "{}", render::answer_header(&result))?;
        out.flush()?;

        if !self.tty {
            writeln!(out, "{}", result.answer)?;
        } else if self.options.type_interval_ms > 0 {
            let outcome = reveal::type_out(
                out,
                &result.answer,
                Duration::from_millis(self.options.type_interval_ms),
                self.columns,
                &ticket.cancel,
            )
            .await?;
            // highlighting lands only once the full answer has been revealed
            if outcome.completed {
                reveal::erase_rows(out, outcome.rows)?;
                write!(
                    out,
                    "{}",
                    render::render_markdown(&render::answer_markdown(&result), self.columns)
                )?;
            }
        } else {
            write!(
                out,
                "{}",
                render::render_markdown(&render::answer_markdown(&result), self.columns)
            )?;
        }
        writeln!(out, "{}", render::export_hint())?;
        out.flush()?;

        self.last_answer = Some(result);
        Ok(())
    }

    fn copy_citation<W: Write>(&mut self, out: &mut W) -> std::io::Result<()> {
        let Some(result) = self.last_answer.as_ref() else {
            writeln!(out, "nothing to copy yet")?;
            return out.flush();
        };
        match export::copy_citation(result, &self.options.source_label) {
            Ok(text) => writeln!(out, "citation copied to clipboard: {text}")?,
            Err(err) => {
                log::warn!("citation copy failed: {err:#}");
                writeln!(out, "citation copy failed: {err:#}")?;
            }
        }
        out.flush()
    }

    fn save_note<W: Write>(&mut self, out: &mut W) -> std::io::Result<()> {
        let Some(result) = self.last_answer.as_ref() else {
            writeln!(out, "nothing to save yet")?;
            return out.flush();
        };
        match export::save_research_note(result, &self.options.source_label, Path::new(".")) {
            Ok(path) => writeln!(out, "note saved to {}", path.display())?,
            Err(err) => {
                log::warn!("note save failed: {err:#}");
                writeln!(out, "note save failed: {err:#}")?;
            }
        }
        out.flush()
    }
}

/// Renderer task: drains view events into stdout until all senders hang up.
pub async fn run_renderer(mut events: mpsc::UnboundedReceiver<ViewEvent>, options: ConsoleOptions) {
    let tty = atty::is(atty::Stream::Stdout);
    let mut view = ConsoleView::new(options, render::console_columns(), tty);
    let mut stdout = std::io::stdout();
    while let Some(event) = events.recv().await {
        if let Err(err) = view.apply(event, &mut stdout).await {
            log::error!("render failed: {err:#}");
        }
    }
}

/// The interactive console: REPL on stdin, renderer on stdout.
pub async fn run(options: ConsoleOptions) -> Result<()> {
    let (events, rx) = mpsc::unbounded_channel();
    let renderer = tokio::spawn(run_renderer(rx, options.clone()));

    tracing::info!(endpoint = %options.endpoint, "console connected");
    println!(
        "lectern · query console · source: {}",
        options.source_label
    );
    println!("type a question and press enter · :copy citation · :save note · :history · :quit");

    let mut console = Console::new(AskClient::new(&options.endpoint), events.clone());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let trimmed = line.trim();
        match trimmed {
            ":quit" | ":q" => break,
            ":copy" => {
                let _ = events.send(ViewEvent::CopyCitation);
            }
            ":save" => {
                let _ = events.send(ViewEvent::SaveNote);
            }
            ":history" => {
                let _ = events.send(ViewEvent::ShowHistory);
            }
            _ if trimmed.starts_with(':') => println!("unknown command: {trimmed}"),
            _ => {
                console.dispatch(trimmed);
            }
        }
    }

    drop(console);
    drop(events);
    renderer.await?;
    Ok(())
}

/// One question, one answer, no animation. The scripting surface.
pub async fn ask_once(options: &ConsoleOptions, question: &str, as_json: bool) -> Result<()> {
    let client = AskClient::new(&options.endpoint);
    let result = client.ask(question).await?;

    if as_json {
        let payload = json!({
            "query": result.query,
            "answer": result.answer,
            "page": result.page,
            "score": result.score,
            "latency": result.latency,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    println!("{}", render::status_line(&result.latency, &result.score));
    println!("{}", render::answer_header(&result));
    if atty::is(atty::Stream::Stdout) {
        print!(
            "{}",
            render::render_markdown(
                &render::answer_markdown(&result),
                render::console_columns()
            )
        );
    } else {
        println!("{}", result.answer);
    }
    Ok(())
}
