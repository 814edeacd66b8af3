//! Prompt composition.
//!
//! The system instruction is a content contract, not a style hint: it pins
//! the advisory domain and the exact refusal sentence, so the template text
//! must stay stable across releases. Bump [`SYSTEM_PROMPT_VERSION`] on any
//! wording change.

use crate::types::{DialogueContext, PromptPayload, RetrievedPassage};

/// Version tag of the system instruction template.
pub const SYSTEM_PROMPT_VERSION: &str = "v1";

/// System instruction template with exactly one `{context}` substitution point.
///
/// Dialogue history and the new question are NOT part of this template;
/// they travel to the model as structured turns so the provider can apply
/// its own role-aware handling.
pub const SYSTEM_PROMPT_TEMPLATE: &str = "\
Bạn là chuyên gia tư vấn tài chính cá nhân chuyên nghiệp.
Thông tin tham khảo từ tài liệu tài chính:
{context}

- Trả lời bằng tiếng Việt dễ hiểu, chuyên nghiệp
- Dựa trên tài liệu tham khảo và kiến thức tài chính
- Tập trung vào các lĩnh vực: đầu tư, tiết kiệm, quản lý chi tiêu, bảo hiểm, hưu trí, thuế
- Đưa ra lời khuyên thực tế và an toàn
- Nếu không có thông tin, nói 'Xin lỗi, tôi chưa có đủ thông tin về vấn đề tài chính này.'";

/// Substitute when the model completes but returns no answer field.
pub const NO_ANSWER_FALLBACK: &str = "Xin lỗi, tôi không thể trả lời câu hỏi tài chính này.";

/// Apology returned when any pipeline stage fails.
pub const APOLOGY_FALLBACK: &str =
    "Xin lỗi, có lỗi xảy ra khi xử lý yêu cầu tài chính của bạn. Vui lòng thử lại.";

/// Separator between concatenated passage texts.
const PASSAGE_SEPARATOR: &str = "\n\n";

/// Build the prompt payload for one generation call.
///
/// Passage texts are concatenated in retrieval rank order (highest
/// similarity first). No truncation happens here; the retrieval K is the
/// only bound, and context-length management is the model consumer's
/// concern.
pub fn compose(
    retrieved: &[RetrievedPassage],
    history: &DialogueContext,
    query: &str,
) -> PromptPayload {
    let retrieved_context = retrieved
        .iter()
        .map(|p| p.text.as_str())
        .collect::<Vec<_>>()
        .join(PASSAGE_SEPARATOR);

    let system_instruction = SYSTEM_PROMPT_TEMPLATE.replacen("{context}", &retrieved_context, 1);

    PromptPayload {
        system_instruction,
        retrieved_context,
        dialogue_history: history.clone(),
        new_query: query.to_string(),
    }
}
