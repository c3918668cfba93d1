use anyhow::Result;
use futures::future::join_all;
use serde_json::json;
use tokio::sync::mpsc;
use tokio::time::{Duration, timeout};

use lectern::api::{AskClient, AskError};
use lectern::config::ConsoleOptions;
use lectern::console::{Console, ConsoleView, Dispatch};
use lectern::models::PageRef;

mod test_helpers {
    use anyhow::Result;
    use axum::routing::post;
    use axum::{Form, Json, Router};
    use serde::Deserialize;
    use serde_json::{Value, json};
    use tokio::net::TcpListener;

    #[derive(Debug, Deserialize)]
    pub struct AskForm {
        pub question: String,
    }

    async fn serve(app: Router) -> Result<String> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Ok(format!("http://{addr}/ask"))
    }

    /// Serves a canned JSON answer for POST /ask on an ephemeral port and
    /// returns the endpoint URL.
    pub async fn spawn_stub_service(response: Value) -> Result<String> {
        let app = Router::new().route(
            "/ask",
            post(move |Form(_form): Form<AskForm>| async move { Json(response) }),
        );
        serve(app).await
    }

    /// Echoes the received question back in the answer field, so tests can
    /// assert what actually crossed the wire.
    pub async fn spawn_echo_service() -> Result<String> {
        let app = Router::new().route(
            "/ask",
            post(|Form(form): Form<AskForm>| async move {
                Json(json!({
                    "answer": form.question,
                    "page": 1,
                    "score": "90.00%",
                }))
            }),
        );
        serve(app).await
    }

    /// Returns a body that is not JSON at all.
    pub async fn spawn_garbage_service() -> Result<String> {
        let app = Router::new().route("/ask", post(|| async { "not json" }));
        serve(app).await
    }

    pub fn console_options(endpoint: &str) -> super::ConsoleOptions {
        super::ConsoleOptions {
            endpoint: endpoint.to_string(),
            source_label: "Cloud_Computing.pdf".to_string(),
            type_interval_ms: 0,
            show_history: true,
        }
    }
}

#[tokio::test]
async fn test_ask_maps_response_fields() -> Result<()> {
    let endpoint = test_helpers::spawn_stub_service(json!({
        "answer": "Elasticity allows scaling.",
        "page": 12,
        "score": "93.50%",
        "latency": "7 ms",
        "status": "Success",
    }))
    .await?;

    let client = AskClient::new(&endpoint);
    let result = client.ask("what is elasticity").await?;

    assert_eq!(result.query, "what is elasticity");
    assert_eq!(result.answer, "Elasticity allows scaling.");
    assert_eq!(result.page, PageRef::Number(12));
    assert_eq!(result.score, "93.50%");
    assert_eq!(result.latency, "7 ms");
    Ok(())
}

#[tokio::test]
async fn test_ask_measures_latency_when_service_omits_it() -> Result<()> {
    let endpoint = test_helpers::spawn_stub_service(json!({
        "answer": "a",
        "page": 3,
        "score": "88.00%",
    }))
    .await?;

    let client = AskClient::new(&endpoint);
    let result = client.ask("anything").await?;

    let millis = result
        .latency
        .strip_suffix(" ms")
        .expect("fallback latency should end with ' ms'");
    assert!(millis.parse::<u128>().is_ok());
    Ok(())
}

#[tokio::test]
async fn test_question_field_survives_form_encoding() -> Result<()> {
    let endpoint = test_helpers::spawn_echo_service().await?;
    let client = AskClient::new(&endpoint);

    let question = "cloud computing & \"elastic\" scaling? 100%";
    let result = client.ask(question).await?;
    assert_eq!(result.answer, question);
    Ok(())
}

#[tokio::test]
async fn test_degraded_answer_keeps_sentinel_page() -> Result<()> {
    let endpoint = test_helpers::spawn_stub_service(json!({
        "answer": "Source material does not contain this info.",
        "page": "N/A",
        "score": "12.00%",
    }))
    .await?;

    let client = AskClient::new(&endpoint);
    let result = client.ask("off-topic question").await?;
    assert_eq!(result.page, PageRef::Label("N/A".to_string()));
    Ok(())
}

#[tokio::test]
async fn test_non_json_body_is_a_decode_error() -> Result<()> {
    let endpoint = test_helpers::spawn_garbage_service().await?;
    let client = AskClient::new(&endpoint);

    let err = client.ask("q").await.unwrap_err();
    assert!(matches!(err, AskError::Decode(_)));
    assert!(!err.to_string().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_unreachable_service_is_a_request_error() {
    let client = AskClient::new("http://127.0.0.1:1/ask");
    let err = client.ask("q").await.unwrap_err();
    assert!(matches!(err, AskError::Request(_)));
    assert!(err.to_string().contains("unreachable"));
}

#[tokio::test]
async fn test_concurrent_asks_all_resolve() -> Result<()> {
    let endpoint = test_helpers::spawn_echo_service().await?;
    let client = AskClient::new(&endpoint);

    let asks = (0..6).map(|i| {
        let client = &client;
        async move { client.ask(&format!("question {i}")).await }
    });
    let results = join_all(asks).await;
    for (i, result) in results.into_iter().enumerate() {
        assert_eq!(result?.answer, format!("question {i}"));
    }
    Ok(())
}

#[tokio::test]
async fn test_dispatch_flow_renders_answer_into_view() -> Result<()> {
    let endpoint = test_helpers::spawn_stub_service(json!({
        "answer": "Elasticity allows scaling.",
        "page": 12,
        "score": "93.50%",
    }))
    .await?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut console = Console::new(AskClient::new(&endpoint), tx);
    assert!(matches!(
        console.dispatch("what is elasticity"),
        Dispatch::Submitted(1)
    ));

    let mut view = ConsoleView::new(test_helpers::console_options(&endpoint), 80, false);
    let mut shown = Vec::new();
    for _ in 0..2 {
        let event = timeout(Duration::from_secs(5), rx.recv())
            .await?
            .expect("event stream ended early");
        view.apply(event, &mut shown).await?;
    }

    let shown = String::from_utf8(shown)?;
    assert!(shown.contains("searching the source material"));
    assert!(shown.contains("Elasticity allows scaling."));
    assert_eq!(view.history().len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_newer_dispatch_supersedes_older() -> Result<()> {
    let endpoint = test_helpers::spawn_echo_service().await?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut console = Console::new(AskClient::new(&endpoint), tx);
    console.dispatch("first question");
    console.dispatch("second question");

    let mut view = ConsoleView::new(test_helpers::console_options(&endpoint), 80, false);
    let mut shown = Vec::new();
    for _ in 0..4 {
        let event = timeout(Duration::from_secs(5), rx.recv())
            .await?
            .expect("event stream ended early");
        view.apply(event, &mut shown).await?;
    }

    // only the latest ticket's answer may render
    assert_eq!(view.history().len(), 1);
    assert_eq!(
        view.last_answer().map(|r| r.query.as_str()),
        Some("second question")
    );
    Ok(())
}
