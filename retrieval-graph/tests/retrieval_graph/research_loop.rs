//! Research loop: plan handling, per-step research, document accumulation and limits.

use std::sync::Arc;

use retrieval_graph::{
    AgentError, Document, InMemoryRetriever, Message, MockLlm, ResearchGraph, RetrievalGraphDeps,
    RetrievalRunner, RouteType, RunnableConfig,
};
use serde_json::json;

use crate::common::{runner, seeded, StubResearcher};

/// **Scenario**: An empty plan goes straight to respond; the researcher is never called.
#[tokio::test]
async fn empty_plan_skips_research() {
    let llm = Arc::new(
        MockLlm::with_reply("I could not find anything specific.")
            .with_structured(json!({"steps": []})),
    );
    let researcher = Arc::new(StubResearcher::new());

    let state = runner(&llm, &researcher)
        .invoke_state(seeded("what is LCEL?", RouteType::Langchain))
        .await
        .unwrap();

    assert!(researcher.calls().is_empty());
    assert!(state.documents.is_empty());
    assert_eq!(state.last_assistant_reply(), Some("I could not find anything specific."));
}

/// **Scenario**: N plan steps produce exactly N research calls, in plan order.
#[tokio::test]
async fn each_step_is_researched_once_in_order() {
    let llm = Arc::new(
        MockLlm::with_reply("done").with_structured(json!({"steps": ["one", "two", "three"]})),
    );
    let researcher = Arc::new(StubResearcher::new());

    let state = runner(&llm, &researcher)
        .invoke_state(seeded("explain retrievers", RouteType::Langchain))
        .await
        .unwrap();

    assert_eq!(researcher.calls(), vec!["one", "two", "three"]);
    assert!(state.plan_steps.is_empty());
}

/// **Scenario**: Documents from every step accumulate in step order and reach the response prompt.
#[tokio::test]
async fn documents_accumulate_across_steps() {
    let llm = Arc::new(
        MockLlm::with_reply("answer").with_structured(json!({"steps": ["alpha", "beta"]})),
    );
    let researcher = Arc::new(StubResearcher::new());

    let state = runner(&llm, &researcher)
        .invoke_state(seeded("q", RouteType::Langchain))
        .await
        .unwrap();

    assert_eq!(
        state.documents,
        vec![
            Document::new("notes on alpha", "alpha.md"),
            Document::new("notes on beta", "beta.md"),
        ]
    );
    let respond_prompt = llm.invocations().last().unwrap().messages[0].content().to_string();
    let alpha = respond_prompt.find("alpha.md").unwrap();
    let beta = respond_prompt.find("beta.md").unwrap();
    assert!(alpha < beta);
    assert!(respond_prompt.contains("seeded by caller"));
}

/// **Scenario**: Batches of different sizes concatenate in step order and the plan drains.
#[tokio::test]
async fn uneven_batches_concatenate_in_step_order() {
    let doc1 = Document::new("doc1", "a.md");
    let doc2 = Document::new("doc2", "b1.md");
    let doc3 = Document::new("doc3", "b2.md");
    let llm = Arc::new(
        MockLlm::with_reply("answer").with_structured(json!({"steps": ["step A", "step B"]})),
    );
    let researcher = Arc::new(
        StubResearcher::new()
            .with_batch("step A", vec![doc1.clone()])
            .with_batch("step B", vec![doc2.clone(), doc3.clone()]),
    );

    let state = runner(&llm, &researcher)
        .invoke_state(seeded("compare retrievers", RouteType::Langchain))
        .await
        .unwrap();

    assert_eq!(state.documents, vec![doc1, doc2, doc3]);
    assert!(state.plan_steps.is_empty());
    assert_eq!(researcher.calls(), vec!["step A", "step B"]);
}

/// **Scenario**: A multi-turn history survives the research branch unchanged, plus one reply.
#[tokio::test]
async fn research_branch_keeps_history_prefix() {
    let history = vec![
        Message::user("what is a retriever?"),
        Message::assistant("It returns documents for a query."),
        Message::user("and how do I build one?"),
    ];
    let llm = Arc::new(
        MockLlm::with_reply("Subclass BaseRetriever.")
            .with_structured(json!({"type": "langchain", "logic": "library question"}))
            .with_structured(json!({"steps": ["custom retrievers"]})),
    );
    let researcher = Arc::new(StubResearcher::new());

    let state = runner(&llm, &researcher)
        .invoke(history.clone(), None)
        .await
        .unwrap();

    assert_eq!(state.messages.len(), history.len() + 1);
    assert_eq!(&state.messages[..history.len()], &history[..]);
    assert_eq!(state.last_assistant_reply(), Some("Subclass BaseRetriever."));
}

/// **Scenario**: A failing research step aborts the run; later steps and respond never run.
#[tokio::test]
async fn research_failure_aborts_run() {
    let llm = Arc::new(
        MockLlm::with_reply("unused").with_structured(json!({"steps": ["ok", "broken", "never"]})),
    );
    let researcher = Arc::new(StubResearcher::failing_on("broken"));

    let err = runner(&llm, &researcher)
        .invoke_state(seeded("q", RouteType::Langchain))
        .await
        .unwrap_err();

    assert!(matches!(err, AgentError::Retrieval(_)), "{:?}", err);
    assert_eq!(researcher.calls(), vec!["ok", "broken"]);
    // Only the plan call; respond never ran.
    assert_eq!(llm.invocation_count(), 1);
}

/// **Scenario**: A malformed plan is a PlanGeneration error.
#[tokio::test]
async fn malformed_plan_aborts_run() {
    let llm = Arc::new(MockLlm::with_reply("unused").with_structured(json!({"plan": "x"})));
    let researcher = Arc::new(StubResearcher::new());

    let err = runner(&llm, &researcher)
        .invoke_state(seeded("q", RouteType::Langchain))
        .await
        .unwrap_err();

    assert!(matches!(err, AgentError::PlanGeneration(_)), "{:?}", err);
    assert!(researcher.calls().is_empty());
}

/// **Scenario**: A plan longer than the recursion limit allows fails with RecursionLimit.
#[tokio::test]
async fn long_plan_hits_recursion_limit() {
    let steps: Vec<String> = (0..10).map(|i| format!("step{}", i)).collect();
    let llm = Arc::new(MockLlm::with_reply("unused").with_structured(json!({"steps": steps})));
    let researcher = Arc::new(StubResearcher::new());
    let runner = runner(&llm, &researcher)
        .with_runnable_config(RunnableConfig::default().with_recursion_limit(4));

    let err = runner
        .invoke_state(seeded("q", RouteType::Langchain))
        .await
        .unwrap_err();

    assert!(matches!(err, AgentError::RecursionLimit(4)), "{:?}", err);
    // route, plan, then two research iterations fit in four steps.
    assert_eq!(researcher.calls(), vec!["step0", "step1"]);
}

/// **Scenario**: The production research sub-graph plugs into the loop end to end.
#[tokio::test]
async fn research_graph_over_in_memory_corpus() {
    let llm = Arc::new(
        MockLlm::with_reply("Use a vector store retriever.")
            .with_structured(json!({"type": "langchain", "logic": "library question"}))
            .with_structured(json!({"steps": ["find retriever docs"]}))
            .with_structured(json!({"queries": ["retriever", "vector store"]})),
    );
    let retriever = Arc::new(InMemoryRetriever::new(vec![
        Document::new("A retriever returns documents for a query.", "retrievers.md"),
        Document::new("Vector store backed search.", "vectorstores.md"),
        Document::new("Prompt templates format input.", "prompts.md"),
    ]));
    let researcher = ResearchGraph::new(llm.clone(), retriever, "write queries").unwrap();
    let runner =
        RetrievalRunner::new(RetrievalGraphDeps::new(llm.clone(), Arc::new(researcher)), false)
            .unwrap();

    let state = runner
        .invoke(vec![retrieval_graph::Message::user("how do retrievers work?")], None)
        .await
        .unwrap();

    let sources: Vec<&str> = state.documents.iter().map(|d| d.source.as_str()).collect();
    assert_eq!(sources, vec!["retrievers.md", "vectorstores.md"]);
    assert_eq!(state.last_assistant_reply(), Some("Use a vector store retriever."));
    // classify, plan, queries, respond
    assert_eq!(llm.invocation_count(), 4);
}
