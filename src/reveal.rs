use std::io::Write;
use std::time::Duration;

use termimad::crossterm::Command;
use termimad::crossterm::cursor::MoveUp;
use termimad::crossterm::terminal::{Clear, ClearType};
use tokio_util::sync::CancellationToken;

/// What a reveal pass left on the terminal: how many rows the plain text
/// occupied (wrap-aware, so the caller can erase and swap in the styled
/// rendering) and whether it ran to completion.
#[derive(Debug, PartialEq, Eq)]
pub struct RevealOutcome {
    pub rows: u16,
    pub completed: bool,
}

/// Types `text` one character per tick, simulating live generation. The
/// cancellation token is checked before every character; a cancelled reveal
/// stops where it is. A zero interval types everything in one pass.
pub async fn type_out<W: Write>(
    out: &mut W,
    text: &str,
    interval: Duration,
    columns: u16,
    cancel: &CancellationToken,
) -> std::io::Result<RevealOutcome> {
    let columns = columns.max(1);
    let mut ticker = (!interval.is_zero()).then(|| tokio::time::interval(interval));
    let mut col: u16 = 0;
    let mut rows: u16 = 1;

    for ch in text.chars() {
        if cancel.is_cancelled() {
            writeln!(out)?;
            out.flush()?;
            return Ok(RevealOutcome {
                rows,
                completed: false,
            });
        }
        if let Some(ticker) = ticker.as_mut() {
            ticker.tick().await;
        }
        if ch == '\n' {
            rows += 1;
            col = 0;
        } else {
            // terminals defer the wrap until the next character lands
            if col >= columns {
                rows += 1;
                col = 0;
            }
            col += 1;
        }
        write!(out, "{ch}")?;
        out.flush()?;
    }

    writeln!(out)?;
    out.flush()?;
    Ok(RevealOutcome {
        rows,
        completed: true,
    })
}

/// Erases the rows a completed reveal occupied, leaving the cursor at the
/// start of the erased block so the highlighted rendering can replace it.
pub fn erase_rows<W: Write>(out: &mut W, rows: u16) -> std::io::Result<()> {
    let mut seq = String::new();
    MoveUp(rows).write_ansi(&mut seq).ok();
    Clear(ClearType::FromCursorDown).write_ansi(&mut seq).ok();
    write!(out, "{seq}")?;
    out.flush()
}
