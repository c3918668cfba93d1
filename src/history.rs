use std::collections::VecDeque;

use crate::models::HistoryEntry;

/// Visible entries are capped; the oldest entry is evicted past this.
pub const HISTORY_CAP: usize = 5;

/// Most-recent-first bounded list of answered queries. Session-only, nothing
/// is persisted.
#[derive(Debug, Default)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
}

impl History {
    pub fn new() -> History {
        History {
            entries: VecDeque::new(),
        }
    }

    /// Prepends an entry, evicting from the tail once the cap is exceeded.
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push_front(entry);
        while self.entries.len() > HISTORY_CAP {
            self.entries.pop_back();
        }
    }

    /// Newest first.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[test]
fn test_history_cap_and_order() {
    use crate::models::PageRef;

    let mut history = History::new();
    for i in 0..8u32 {
        history.push(HistoryEntry::new(format!("q{i}"), PageRef::Number(i)));
    }
    assert_eq!(history.len(), HISTORY_CAP);

    let queries: Vec<&str> = history.iter().map(|e| e.query.as_str()).collect();
    assert_eq!(queries, vec!["q7", "q6", "q5", "q4", "q3"]);
}

#[test]
fn test_history_below_cap() {
    use crate::models::PageRef;

    let mut history = History::new();
    assert!(history.is_empty());
    history.push(HistoryEntry::new("one".into(), PageRef::Number(1)));
    history.push(HistoryEntry::new("two".into(), PageRef::Label("N/A".into())));
    assert_eq!(history.len(), 2);
    assert_eq!(history.iter().next().unwrap().query, "two");
}
