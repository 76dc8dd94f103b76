pub mod assistant;
pub mod matching;
pub mod navigation;

pub use assistant::{CareAssistant, GeminiCareAssistant};
pub use matching::SymptomMatchingService;
pub use navigation::NavigationService;
