//! Memory assembler: persisted messages to dialogue context.

use crate::types::{DialogueContext, DialogueTurn, Message, TurnRole};

/// Convert persisted messages into a model-facing dialogue context.
///
/// Persisted order is preserved exactly: no re-sorting, no deduplication,
/// and no role-alternation enforcement (consecutive same-role messages are
/// legal). Unknown or legacy role labels are dropped rather than failing,
/// so schema drift in old conversations cannot break a query. The function
/// imposes no size cap; windowing is the orchestrator's call.
pub fn build_dialogue_context(history: &[Message]) -> DialogueContext {
    let mut context = Vec::with_capacity(history.len());
    for message in history {
        match map_role(&message.role) {
            Some(role) => context.push(DialogueTurn {
                role,
                content: message.content.clone(),
            }),
            None => {
                tracing::warn!(role = %message.role, "dropping message with unknown role label");
            }
        }
    }
    context
}

/// Map a persisted role label to a model-facing role tag.
///
/// The original store wrote `"user"` and `"bot"`; `"assistant"` is accepted
/// for rows written by newer callers.
fn map_role(label: &str) -> Option<TurnRole> {
    match label {
        "user" => Some(TurnRole::User),
        "bot" | "assistant" => Some(TurnRole::Assistant),
        _ => None,
    }
}
