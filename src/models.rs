use nanoid::nanoid;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

/// Page reference as reported by the answer service. Normally a number, but
/// degraded answers carry sentinel labels ("N/A", "SYS_ERR") in the same
/// field.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum PageRef {
    Number(u32),
    Label(String),
}

impl std::fmt::Display for PageRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PageRef::Number(n) => write!(f, "{n}"),
            PageRef::Label(s) => write!(f, "{s}"),
        }
    }
}

/// One answered question, ready for rendering. Kept around only as the
/// "last answer" so the export commands have something to act on.
#[derive(Debug, Clone)]
pub struct AnswerResult {
    pub query: String,
    pub answer: String,
    pub page: PageRef,
    pub score: String,
    pub latency: String,
}

#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub query: String,
    pub page: PageRef,
}

impl HistoryEntry {
    pub fn new(query: String, page: PageRef) -> HistoryEntry {
        HistoryEntry { query, page }
    }
}

/// Generation token minted per dispatch. The renderer drops events carrying
/// a seq older than the newest it has seen, and the reveal animation checks
/// the cancellation token at every tick, so only the latest request renders.
#[derive(Debug, Clone)]
pub struct RequestTicket {
    pub seq: u64,
    pub rid: String,
    pub cancel: CancellationToken,
}

impl RequestTicket {
    pub fn new(seq: u64) -> RequestTicket {
        RequestTicket {
            seq,
            rid: nanoid!(8),
            cancel: CancellationToken::new(),
        }
    }
}
