//! Line-oriented recognizer for text that is already written as questions and
//! answers, e.g. `Q: ... A: ...` or numbered questions followed by answers.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::domain::GeneratedFlashcard;

static INLINE_QA: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:q(?:uestion)?\s*\d*|\d+)\s*[:.)-]\s*(.+?)\s+a(?:nswer)?\s*\d*\s*[:.-]\s*(.+)$")
        .expect("INLINE_QA is a valid regex pattern")
});

static QUESTION_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:q(?:uestion)?\s*\d*|\d+)\s*[:.)-]\s*(.*)$")
        .expect("QUESTION_LINE is a valid regex pattern")
});

static ANSWER_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^a(?:nswer)?\s*\d*\s*[:.-]\s*(.*)$")
        .expect("ANSWER_LINE is a valid regex pattern")
});

#[derive(Debug)]
enum LineKind<'a> {
    Inline { question: &'a str, answer: &'a str },
    Question(&'a str),
    Answer(&'a str),
    Text(&'a str),
}

fn classify(line: &str) -> LineKind<'_> {
    if let Some(caps) = INLINE_QA.captures(line) {
        if let (Some(q), Some(a)) = (caps.get(1), caps.get(2)) {
            return LineKind::Inline {
                question: q.as_str().trim(),
                answer: a.as_str().trim(),
            };
        }
    }
    if let Some(caps) = QUESTION_LINE.captures(line) {
        return LineKind::Question(caps.get(1).map_or("", |m| m.as_str().trim()));
    }
    if let Some(caps) = ANSWER_LINE.captures(line) {
        return LineKind::Answer(caps.get(1).map_or("", |m| m.as_str().trim()));
    }
    LineKind::Text(line)
}

#[derive(Debug)]
enum ParserState {
    Idle,
    PendingQuestion(String),
    Answering { front: String, back: Vec<String> },
}

struct QaParser {
    state: ParserState,
    cards: Vec<GeneratedFlashcard>,
}

impl QaParser {
    fn new() -> Self {
        Self {
            state: ParserState::Idle,
            cards: Vec::new(),
        }
    }

    /// Emits the card being answered, if it has any answer text. A pending
    /// question without an answer is dropped.
    fn flush(&mut self) {
        if let ParserState::Answering { front, back } =
            std::mem::replace(&mut self.state, ParserState::Idle)
        {
            let back = back.join(" ");
            if !front.is_empty() && !back.is_empty() {
                self.cards.push(GeneratedFlashcard::ungrounded(front, back));
            }
        }
    }

    fn feed(&mut self, line: &str) {
        match classify(line) {
            LineKind::Inline { question, answer } => {
                self.flush();
                if !question.is_empty() && !answer.is_empty() {
                    self.cards
                        .push(GeneratedFlashcard::ungrounded(question, answer));
                }
            }
            LineKind::Question(question) => {
                self.flush();
                self.state = ParserState::PendingQuestion(question.to_string());
            }
            LineKind::Answer(answer) => match std::mem::replace(&mut self.state, ParserState::Idle) {
                ParserState::PendingQuestion(front) if !front.is_empty() => {
                    let back = if answer.is_empty() {
                        Vec::new()
                    } else {
                        vec![answer.to_string()]
                    };
                    self.state = ParserState::Answering { front, back };
                }
                ParserState::Answering { front, mut back } => {
                    // Another answer marker extends the same card.
                    if !answer.is_empty() {
                        back.push(answer.to_string());
                    }
                    self.state = ParserState::Answering { front, back };
                }
                _ => {}
            },
            LineKind::Text(text) => match &mut self.state {
                ParserState::PendingQuestion(front) if front.is_empty() => {
                    // Bare numbered line: the next text line is the question.
                    *front = text.to_string();
                }
                ParserState::PendingQuestion(front) => {
                    let front = std::mem::take(front);
                    self.state = ParserState::Answering {
                        front,
                        back: vec![text.to_string()],
                    };
                }
                ParserState::Answering { back, .. } => back.push(text.to_string()),
                ParserState::Idle => {}
            },
        }
    }

    fn finish(mut self) -> Vec<GeneratedFlashcard> {
        self.flush();
        self.cards
    }
}

/// Parses pre-structured Q/A text into cards without calling the model.
/// Returns an empty list when the text carries no recognizable pairs.
pub fn parse_qa_pairs(raw: &str) -> Vec<GeneratedFlashcard> {
    let mut parser = QaParser::new();
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .for_each(|line| parser.feed(line));
    parser.finish()
}
