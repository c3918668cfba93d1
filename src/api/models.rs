use serde::{Deserialize, Serialize};

use crate::models::PageRef;

/// Form body for the answer endpoint. Sent application/x-www-form-urlencoded.
#[derive(Debug, Serialize)]
pub struct AskRequest {
    pub question: String,
}

/// Wire shape of an answer. `latency` is the service's own figure and may be
/// absent; the client then reports its measured round-trip instead. `status`
/// is informational and unused here.
#[derive(Debug, Deserialize)]
pub struct AskResponse {
    pub answer: String,
    pub page: PageRef,
    pub score: String,
    #[serde(default)]
    pub latency: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[test]
fn test_ask_response_page_number_or_label() {
    let numbered: AskResponse =
        serde_json::from_str(r#"{"answer":"a","page":12,"score":"93.50%"}"#).unwrap();
    assert_eq!(numbered.page, PageRef::Number(12));
    assert!(numbered.latency.is_none());

    let degraded: AskResponse = serde_json::from_str(
        r#"{"answer":"Engine not initialized.","page":"N/A","score":"0%","status":"Error"}"#,
    )
    .unwrap();
    assert_eq!(degraded.page, PageRef::Label("N/A".to_string()));
    assert_eq!(degraded.status.as_deref(), Some("Error"));
}
