pub mod flashcard;
pub mod generation_mode;
pub mod prompt;
pub mod quiz_question;
pub use flashcard::GeneratedFlashcard;
pub use generation_mode::GenerationMode;
pub use prompt::PromptRequest;
pub use quiz_question::{GeneratedQuizQuestion, GeneratedQuizSet};
