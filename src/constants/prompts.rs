pub const MAX_SUMMARY_CHARS: usize = 5000;
pub const MIN_SUMMARY_INPUT_CHARS: usize = 100;
pub const MAX_ASSISTANT_RESPONSE_CHARS: usize = 10_000;

pub const FLASHCARD_REPAIR_SUFFIX: &str =
    "IMPORTANT: Your previous response was cut off. Return the FULL JSON again. No extra text.";

pub fn flashcard_prompt(count: usize, text: &str) -> String {
    format!(
        r#"You are generating study flashcards.
Return ONLY valid JSON.

Schema:
{{ "cards": [ {{ "front": "...", "back": "...", "explanation": "..." }} ] }}

Rules:
- Exactly {count} cards.
- Use the text as the only source.
- explanation may be "-" if unsure.

Text:
"""{text}""""#
    )
}

pub fn flashcard_repair_prompt(original_prompt: &str) -> String {
    format!("{}\n\n{}", original_prompt, FLASHCARD_REPAIR_SUFFIX)
}

pub fn summary_prompt(text: &str) -> String {
    format!(
        r#"You are a study assistant that creates concise summaries of educational content.

Task: Create a clear, structured summary of the provided text.

Formatting rules:
- Plain text only (no Markdown, no code fences, no headings).
- Use short paragraphs separated by line breaks.
- Keep the summary under {MAX_SUMMARY_CHARS} characters.
- Focus on key concepts, main ideas, and important details.

Quality rules:
- Be accurate and comprehensive.
- Maintain the original meaning and context.
- Use clear, simple language suitable for studying.

Text to summarize:
"""
{text}
"""

Summary:"#
    )
}

pub fn assistant_prompt(user_prompt: &str) -> String {
    format!(
        r#"You are a study assistant for a learning app.
Answer in clear, concise plain text that helps the user study.

Formatting rules:
- Plain text only (no Markdown, no code fences, no headings).
- Avoid bullet lists; use short paragraphs or sentences instead.
- Do not include citations or links unless explicitly requested.
- Keep the response under {MAX_ASSISTANT_RESPONSE_CHARS} characters.

Behavior rules:
- Be accurate and grounded in the user's prompt.
- If the prompt is unclear, ask one short clarifying question.

User prompt:
"""{user_prompt}""""#
    )
}
