//! Routing: classification branches, pre-seeded routers and route failures.

use std::sync::Arc;

use retrieval_graph::{
    AgentError, AnalyzeAndRouteQueryNode, Message, MockLlm, Node, RouteType, Router,
};
use serde_json::json;

use crate::common::{question, runner, seeded, StubResearcher};

/// **Scenario**: A pre-seeded router skips classification; only the reply is generated.
#[tokio::test]
async fn preseeded_router_makes_no_classification_call() {
    let llm = Arc::new(MockLlm::with_reply("Python is a programming language."));
    let researcher = Arc::new(StubResearcher::new());

    let state = runner(&llm, &researcher)
        .invoke_state(seeded("what is python?", RouteType::General))
        .await
        .unwrap();

    assert_eq!(state.last_assistant_reply(), Some("Python is a programming language."));
    let calls = llm.invocations();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].schema, None);
    assert_eq!(state.router.unwrap().logic, "seeded by caller");
}

/// **Scenario**: `more-info` asks a clarifying question and never researches.
#[tokio::test]
async fn more_info_branch_asks_for_clarification() {
    let llm = Arc::new(
        MockLlm::with_reply("What would you like to build?")
            .with_structured(json!({"type": "more-info", "logic": "request is vague"})),
    );
    let researcher = Arc::new(StubResearcher::new());

    let state = runner(&llm, &researcher)
        .invoke(vec![Message::user("I want to build something")], None)
        .await
        .unwrap();

    assert_eq!(state.messages.len(), 2);
    assert_eq!(state.last_assistant_reply(), Some("What would you like to build?"));
    assert_eq!(state.router.unwrap().route_type, RouteType::MoreInfo);
    assert!(researcher.calls().is_empty());

    let reply_prompt = &llm.invocations()[1].messages;
    assert!(reply_prompt[0].content().contains("request is vague"));
}

/// **Scenario**: `general` answers directly with the router's logic in the prompt.
#[tokio::test]
async fn general_branch_answers_without_research() {
    let llm = Arc::new(
        MockLlm::with_reply("A closure captures its environment.")
            .with_structured(json!({"type": "general", "logic": "generic programming"})),
    );
    let researcher = Arc::new(StubResearcher::new());

    let state = runner(&llm, &researcher)
        .invoke(vec![Message::user("what is a closure?")], None)
        .await
        .unwrap();

    assert_eq!(state.last_assistant_reply(), Some("A closure captures its environment."));
    assert!(state.plan_steps.is_empty());
    assert!(state.documents.is_empty());
    assert!(researcher.calls().is_empty());
    assert_eq!(llm.invocation_count(), 2);
}

/// **Scenario**: `langchain` plans, researches each step and responds.
#[tokio::test]
async fn langchain_branch_researches_then_responds() {
    let llm = Arc::new(
        MockLlm::with_reply("Chains compose runnables.")
            .with_structured(json!({"type": "langchain", "logic": "library question"}))
            .with_structured(json!({"steps": ["chains", "runnables"]})),
    );
    let researcher = Arc::new(StubResearcher::new());

    let state = runner(&llm, &researcher)
        .invoke(vec![Message::user("how do chains work?")], None)
        .await
        .unwrap();

    assert_eq!(researcher.calls(), vec!["chains", "runnables"]);
    assert_eq!(state.last_assistant_reply(), Some("Chains compose runnables."));
    assert!(state.plan_steps.is_empty());
}

/// **Scenario**: A pre-seeded router with an unknown type fails with UnknownRoute
/// before any model call.
#[tokio::test]
async fn unknown_preseeded_route_fails() {
    let llm = Arc::new(MockLlm::with_reply("unused"));
    let researcher = Arc::new(StubResearcher::new());
    let state = question("weather?").with_router(Router::new(RouteType::from("weather"), "x"));

    let err = runner(&llm, &researcher).invoke_state(state).await.unwrap_err();

    match err {
        AgentError::UnknownRoute(v) => assert_eq!(v, "weather"),
        other => panic!("expected UnknownRoute, got {:?}", other),
    }
    assert_eq!(llm.invocation_count(), 0);
}

/// **Scenario**: Classifier output outside the three categories aborts the run.
#[tokio::test]
async fn invalid_classification_aborts_run() {
    let llm = Arc::new(
        MockLlm::with_reply("unused").with_structured(json!({"kind": "general"})),
    );
    let researcher = Arc::new(StubResearcher::new());

    let err = runner(&llm, &researcher)
        .invoke(vec![Message::user("hi")], None)
        .await
        .unwrap_err();

    assert!(matches!(err, AgentError::Classification(_)), "{:?}", err);
    assert_eq!(llm.invocation_count(), 1);
}

/// **Scenario**: Only the latest user message is classified.
#[tokio::test]
async fn classifier_sees_latest_user_message_only() {
    let llm = Arc::new(
        MockLlm::with_reply("ok")
            .with_structured(json!({"type": "general", "logic": "follow-up"})),
    );
    let researcher = Arc::new(StubResearcher::new());
    let history = vec![
        Message::user("first question"),
        Message::assistant("first answer"),
        Message::user("second question"),
    ];

    let state = runner(&llm, &researcher).invoke(history, None).await.unwrap();

    let classify = &llm.invocations()[0];
    assert_eq!(classify.schema.as_deref(), Some("router"));
    assert_eq!(classify.messages.len(), 2);
    assert_eq!(classify.messages[1], Message::user("second question"));
    // The responder sees the whole history.
    assert_eq!(llm.invocations()[1].messages.len(), 4);
    assert_eq!(state.messages.len(), 4);
}

/// **Scenario**: Running the router twice over a pre-seeded state yields the same
/// router both times and never calls the model.
#[tokio::test]
async fn preseeded_router_is_idempotent() {
    let llm = Arc::new(MockLlm::new());
    let node = AnalyzeAndRouteQueryNode::new(llm.clone(), "classify");
    let state = seeded("what is LCEL?", RouteType::Langchain);

    let (first, _) = node.run(state.clone()).await.unwrap();
    let (second, _) = node.run(state).await.unwrap();

    let expected = Some(Router::new(RouteType::Langchain, "seeded by caller"));
    assert_eq!(first.router, expected);
    assert_eq!(second.router, expected);
    assert_eq!(first, second);
    assert_eq!(llm.invocation_count(), 0);
}

/// **Scenario**: A multi-turn history comes back as an unchanged prefix with one reply appended.
#[tokio::test]
async fn general_branch_keeps_history_prefix() {
    let history = vec![
        Message::user("hello"),
        Message::assistant("Hi! Ask me about the docs."),
        Message::user("thanks, what time is it?"),
    ];
    let llm = Arc::new(
        MockLlm::with_reply("I can only help with the docs.")
            .with_structured(json!({"type": "general", "logic": "off-topic"})),
    );
    let researcher = Arc::new(StubResearcher::new());

    let state = runner(&llm, &researcher)
        .invoke(history.clone(), None)
        .await
        .unwrap();

    assert_eq!(state.messages.len(), history.len() + 1);
    assert_eq!(&state.messages[..history.len()], &history[..]);
    assert_eq!(
        state.messages.last(),
        Some(&Message::assistant("I can only help with the docs."))
    );
}
