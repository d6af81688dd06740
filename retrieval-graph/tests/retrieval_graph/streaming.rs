//! Streaming: node order, custom research events and failure delivery.

use std::sync::Arc;

use retrieval_graph::{MockLlm, RouteType, StreamEvent, StreamMode};
use serde_json::json;
use tokio_stream::StreamExt;

use crate::common::{runner, seeded, StubResearcher};

/// **Scenario**: Updates follow the node order of the research branch.
#[tokio::test]
async fn updates_follow_research_branch() {
    let llm = Arc::new(
        MockLlm::with_reply("answer").with_structured(json!({"steps": ["a", "b"]})),
    );
    let researcher = Arc::new(StubResearcher::new());

    let events: Vec<_> = runner(&llm, &researcher)
        .stream(seeded("q", RouteType::Langchain), [StreamMode::Updates])
        .collect()
        .await;

    let nodes: Vec<String> = events
        .into_iter()
        .filter_map(|e| match e {
            StreamEvent::Updates { node_id, .. } => Some(node_id),
            _ => None,
        })
        .collect();
    assert_eq!(
        nodes,
        vec![
            "analyze_and_route_query",
            "create_research_plan",
            "conduct_research",
            "conduct_research",
            "respond",
        ]
    );
}

/// **Scenario**: Each research iteration emits one custom event with the remaining count.
#[tokio::test]
async fn custom_events_report_research_progress() {
    let llm = Arc::new(
        MockLlm::with_reply("answer").with_structured(json!({"steps": ["a", "b", "c"]})),
    );
    let researcher = Arc::new(StubResearcher::new());

    let events: Vec<_> = runner(&llm, &researcher)
        .stream(seeded("q", RouteType::Langchain), [StreamMode::Custom])
        .collect()
        .await;

    let remaining: Vec<u64> = events
        .iter()
        .filter_map(|e| match e {
            StreamEvent::Custom(v) => v["remaining"].as_u64(),
            _ => None,
        })
        .collect();
    assert_eq!(remaining, vec![2, 1, 0]);
    assert_eq!(events.len(), 3);
}

/// **Scenario**: A failed run ends the stream with TaskEnd(Err) and Failed.
#[tokio::test]
async fn failure_ends_stream_with_failed_event() {
    let llm = Arc::new(
        MockLlm::with_reply("unused").with_structured(json!({"steps": ["broken"]})),
    );
    let researcher = Arc::new(StubResearcher::failing_on("broken"));

    let events: Vec<_> = runner(&llm, &researcher)
        .stream(
            seeded("q", RouteType::Langchain),
            [StreamMode::Tasks, StreamMode::Values],
        )
        .collect()
        .await;

    match events.last() {
        Some(StreamEvent::Failed { error }) => assert!(error.contains("index offline")),
        other => panic!("expected Failed last, got {:?}", other),
    }
    assert!(events.iter().any(|e| matches!(
        e,
        StreamEvent::TaskEnd { node_id, result: Err(_) } if node_id == "conduct_research"
    )));
}
