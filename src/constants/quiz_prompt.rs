pub fn quiz_generation_prompt(question_count: u32, text: &str) -> String {
    format!(
        r#"You are a quiz generator for educational content. Generate exactly {question_count} multiple-choice questions from the provided text.

CRITICAL RULES:
1. Each question must have EXACTLY 4 options
2. Only ONE option is correct
3. Distractors (wrong answers) must be plausible but clearly incorrect
4. Include a brief explanation (1-2 sentences) for why the correct answer is right
5. Questions should test understanding, not just memorization
6. Return ONLY valid JSON, no markdown formatting, no code blocks
7. Do NOT add any text before or after the JSON

OUTPUT FORMAT (strict JSON):
{{
  "questions": [
    {{
      "prompt": "Clear question text ending with ?",
      "options": ["Option A", "Option B", "Option C", "Option D"],
      "correctIndex": 0,
      "explanation": "Brief explanation of why this answer is correct."
    }}
  ]
}}

IMPORTANT: Your entire response must be a single valid JSON document.

VALIDATION:
- All options must be non-empty strings
- correctIndex must be 0, 1, 2, or 3
- No duplicate options within a question
- Explanation must be non-empty

Text to create quiz from:
"""
{text}
"""

Generate {question_count} questions in JSON format:"#
    )
}
