use std::sync::Arc;

use crate::{
    config::Config,
    services::{
        assistant_service::StudyAssistantService,
        flashcard_service::FlashcardService,
        gateway::{GatewaySettings, TextGenerationGateway},
        model_service::TextGenerator,
        quiz_service::QuizService,
        summary_service::SummaryService,
    },
};

/// All generation services, sharing one gateway.
#[derive(Clone)]
pub struct AppState {
    pub flashcard_service: Arc<FlashcardService>,
    pub quiz_service: Arc<QuizService>,
    pub summary_service: Arc<SummaryService>,
    pub assistant_service: Arc<StudyAssistantService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let gateway = Arc::new(TextGenerationGateway::from_config(&config));
        Self::from_gateway(config, gateway)
    }

    /// Uses `generator` in place of the configured provider adapter.
    pub fn with_generator(config: Config, generator: Arc<dyn TextGenerator>) -> Self {
        let gateway = Arc::new(TextGenerationGateway::new(
            config.generation_mode,
            Some(generator),
            GatewaySettings::from(&config),
        ));
        Self::from_gateway(config, gateway)
    }

    fn from_gateway(config: Config, gateway: Arc<TextGenerationGateway>) -> Self {
        let flashcard_service = Arc::new(FlashcardService::new(gateway.clone(), config.max_text_length));
        let quiz_service = Arc::new(QuizService::new(gateway.clone(), config.quiz_limits));
        let summary_service = Arc::new(SummaryService::new(gateway.clone(), config.max_text_length));
        let assistant_service = Arc::new(StudyAssistantService::new(gateway));

        Self {
            flashcard_service,
            quiz_service,
            summary_service,
            assistant_service,
            config: Arc::new(config),
        }
    }
}
