//! Integration tests for the advisor pipeline.
//!
//! Every external collaborator is a stub from `common::mocks`, so these
//! exercise the orchestrator's sequencing, fallback mapping, and prompt
//! assembly without any network access.

mod common;

use common::mocks::{
    message, passage, MockEmbeddingProvider, MockHistoryStore, MockLanguageModel, MockVectorIndex,
};
use fina::rag::prompt::{APOLOGY_FALLBACK, NO_ANSWER_FALLBACK};
use fina::rag::Retriever;
use fina::types::{ConversationId, TurnRole};
use fina::{OrchestratorOptions, RagOrchestrator};
use std::sync::Arc;
use std::time::Duration;

fn orchestrator(
    history: MockHistoryStore,
    embeddings: MockEmbeddingProvider,
    index: MockVectorIndex,
    llm: MockLanguageModel,
    options: OrchestratorOptions,
) -> RagOrchestrator {
    RagOrchestrator::new(
        Arc::new(history),
        Arc::new(embeddings),
        Arc::new(index),
        Arc::new(llm),
        options,
    )
}

fn conv() -> ConversationId {
    ConversationId::from("conv-test")
}

// P1: exceptions from any collaborator are contained, never propagated.

#[tokio::test]
async fn embedding_failure_degrades_to_apology() {
    let advisor = orchestrator(
        MockHistoryStore::empty(),
        MockEmbeddingProvider::failing(),
        MockVectorIndex::with_passages(vec![]),
        MockLanguageModel::echoing(),
        OrchestratorOptions::default(),
    );

    let answer = advisor.answer("câu hỏi", &conv()).await;

    assert!(!answer.success);
    assert_eq!(answer.text, APOLOGY_FALLBACK);
}

#[tokio::test]
async fn llm_failure_degrades_to_apology() {
    let advisor = orchestrator(
        MockHistoryStore::empty(),
        MockEmbeddingProvider::new(),
        MockVectorIndex::with_passages(vec![passage("p", 0.9)]),
        MockLanguageModel::failing(),
        OrchestratorOptions::default(),
    );

    let answer = advisor.answer("câu hỏi", &conv()).await;

    assert!(!answer.success);
    assert_eq!(answer.text, APOLOGY_FALLBACK);
}

#[tokio::test]
async fn history_load_failure_degrades_to_apology() {
    let advisor = orchestrator(
        MockHistoryStore::failing(),
        MockEmbeddingProvider::new(),
        MockVectorIndex::with_passages(vec![]),
        MockLanguageModel::echoing(),
        OrchestratorOptions::default(),
    );

    let answer = advisor.answer("câu hỏi", &conv()).await;

    assert!(!answer.success);
    assert_eq!(answer.text, APOLOGY_FALLBACK);
}

// Scenario B: vector index raises a connection error.

#[tokio::test]
async fn index_connection_error_degrades_to_apology() {
    let advisor = orchestrator(
        MockHistoryStore::empty(),
        MockEmbeddingProvider::new(),
        MockVectorIndex::failing(),
        MockLanguageModel::echoing(),
        OrchestratorOptions::default(),
    );

    let answer = advisor.answer("câu hỏi", &conv()).await;

    assert!(!answer.success);
    assert_eq!(answer.text, APOLOGY_FALLBACK);
}

// P3: empty history still produces a prompt and an answer.

#[tokio::test]
async fn empty_history_produces_prompt_with_empty_history() {
    let llm = MockLanguageModel::recording("trả lời");
    let received = llm.received.clone();
    let advisor = orchestrator(
        MockHistoryStore::empty(),
        MockEmbeddingProvider::new(),
        MockVectorIndex::with_passages(vec![passage("p", 0.9)]),
        llm,
        OrchestratorOptions::default(),
    );

    let answer = advisor.answer("câu hỏi mới", &conv()).await;

    assert!(answer.success);
    assert_eq!(answer.text, "trả lời");
    let prompt = received.lock().unwrap().clone().unwrap();
    assert!(prompt.dialogue_history.is_empty());
    assert_eq!(prompt.new_query, "câu hỏi mới");
}

// Empty input must not crash either; the pipeline still runs end to end.

#[tokio::test]
async fn empty_query_still_answers() {
    let advisor = orchestrator(
        MockHistoryStore::empty(),
        MockEmbeddingProvider::new(),
        MockVectorIndex::with_passages(vec![]),
        MockLanguageModel::recording("ok"),
        OrchestratorOptions::default(),
    );

    let answer = advisor.answer("", &conv()).await;

    assert!(answer.success);
    assert_eq!(answer.text, "ok");
}

// P6: a response lacking the answer field maps to the fixed sentence.

#[tokio::test]
async fn missing_answer_field_substitutes_fixed_sentence() {
    let advisor = orchestrator(
        MockHistoryStore::empty(),
        MockEmbeddingProvider::new(),
        MockVectorIndex::with_passages(vec![passage("p", 0.9)]),
        MockLanguageModel::missing_answer(),
        OrchestratorOptions::default(),
    );

    let answer = advisor.answer("câu hỏi", &conv()).await;

    assert!(answer.success);
    assert_eq!(answer.text, NO_ANSWER_FALLBACK);
}

// Scenario A: stubbed retrieval feeds the concatenated context to the model.

#[tokio::test]
async fn answer_is_grounded_in_retrieved_context() {
    let advisor = orchestrator(
        MockHistoryStore::empty(),
        MockEmbeddingProvider::new(),
        MockVectorIndex::with_passages(vec![
            passage("quỹ mở cổ phiếu", 0.9),
            passage("gửi tiết kiệm kỳ hạn", 0.7),
        ]),
        MockLanguageModel::echoing(),
        OrchestratorOptions::default(),
    );

    let answer = advisor
        .answer("Tôi nên đầu tư vào đâu với 10 triệu/tháng?", &conv())
        .await;

    assert!(answer.success);
    assert!(answer
        .text
        .contains("quỹ mở cổ phiếu\n\ngửi tiết kiệm kỳ hạn"));
    assert!(answer.text.contains("turns[0]"));
}

// Scenario C / P2: structured history reaches the model in persisted order.

#[tokio::test]
async fn model_receives_history_as_ordered_structured_turns() {
    let llm = MockLanguageModel::recording("tiếp tục");
    let received = llm.received.clone();
    let advisor = orchestrator(
        MockHistoryStore::with_messages(vec![
            message("user", "A", 1),
            message("bot", "B", 2),
            message("user", "C", 3),
        ]),
        MockEmbeddingProvider::new(),
        MockVectorIndex::with_passages(vec![passage("p", 0.9)]),
        llm,
        OrchestratorOptions::default(),
    );

    let answer = advisor.answer("D", &conv()).await;
    assert!(answer.success);

    let prompt = received.lock().unwrap().clone().unwrap();
    assert_eq!(prompt.dialogue_history.len(), 3);
    assert_eq!(prompt.dialogue_history[0].role, TurnRole::User);
    assert_eq!(prompt.dialogue_history[0].content, "A");
    assert_eq!(prompt.dialogue_history[1].role, TurnRole::Assistant);
    assert_eq!(prompt.dialogue_history[1].content, "B");
    assert_eq!(prompt.dialogue_history[2].content, "C");
    // History stays out of the system text.
    assert!(!prompt.system_instruction.contains("A"));
}

// The history window keeps only the most recent turns.

#[tokio::test]
async fn history_window_caps_to_most_recent_turns() {
    let mut messages = Vec::new();
    for i in 0..50 {
        messages.push(message("user", &format!("m{}", i), i));
    }

    let llm = MockLanguageModel::recording("ok");
    let received = llm.received.clone();
    let advisor = orchestrator(
        MockHistoryStore::with_messages(messages),
        MockEmbeddingProvider::new(),
        MockVectorIndex::with_passages(vec![]),
        llm,
        OrchestratorOptions {
            history_window: Some(20),
            ..OrchestratorOptions::default()
        },
    );

    advisor.answer("mới nhất?", &conv()).await;

    let prompt = received.lock().unwrap().clone().unwrap();
    assert_eq!(prompt.dialogue_history.len(), 20);
    assert_eq!(prompt.dialogue_history[0].content, "m30");
    assert_eq!(prompt.dialogue_history[19].content, "m49");
}

// A stalled model call hits the deadline and degrades like any failure.

#[tokio::test]
async fn generation_timeout_degrades_to_apology() {
    let advisor = orchestrator(
        MockHistoryStore::empty(),
        MockEmbeddingProvider::new(),
        MockVectorIndex::with_passages(vec![]),
        MockLanguageModel::slow(Duration::from_millis(200)),
        OrchestratorOptions {
            request_timeout: Duration::from_millis(20),
            ..OrchestratorOptions::default()
        },
    );

    let answer = advisor.answer("câu hỏi", &conv()).await;

    assert!(!answer.success);
    assert_eq!(answer.text, APOLOGY_FALLBACK);
}

// P4: identical query + unchanged index is deterministic.

#[tokio::test]
async fn retrieval_is_deterministic_for_unchanged_index() {
    let retriever = Retriever::new(
        Arc::new(MockEmbeddingProvider::new()),
        Arc::new(MockVectorIndex::with_passages(vec![
            passage("a", 0.9),
            passage("b", 0.8),
            passage("c", 0.7),
        ])),
    );

    let first = retriever.retrieve("lãi suất", 40).await.unwrap();
    let second = retriever.retrieve("lãi suất", 40).await.unwrap();

    assert_eq!(first.len(), second.len());
    for (x, y) in first.iter().zip(second.iter()) {
        assert_eq!(x.text, y.text);
        assert_eq!(x.score, y.score);
    }
}

// P5: never more than k passages, even from an over-eager index.

#[tokio::test]
async fn retrieval_never_exceeds_k() {
    let many: Vec<_> = (0..60).map(|i| passage(&format!("p{}", i), 1.0)).collect();
    let retriever = Retriever::new(
        Arc::new(MockEmbeddingProvider::new()),
        Arc::new(MockVectorIndex::with_passages(many)),
    );

    let passages = retriever.retrieve("q", 40).await.unwrap();
    assert_eq!(passages.len(), 40);

    // Shorter when the index holds fewer matches.
    let sparse = Retriever::new(
        Arc::new(MockEmbeddingProvider::new()),
        Arc::new(MockVectorIndex::with_passages(vec![passage("only", 0.5)])),
    );
    let passages = sparse.retrieve("q", 40).await.unwrap();
    assert_eq!(passages.len(), 1);
}
