pub mod assistant_service;
pub mod flashcard_service;
pub mod gateway;
pub mod json_helpers;
pub mod model_service;
pub mod qa_parser;
pub mod quiz_service;
pub mod retry_policy;
pub mod summary_service;
