// Public modules
pub mod candidate;
pub mod content;
pub mod finish_reason;
pub mod generate_content_request;
pub mod generate_content_response;
pub mod generation_config;
pub mod inline_data;
pub mod model;
pub mod model_info;
pub mod part;
pub mod system_instruction;

// Re-exports
pub use candidate::Candidate;
pub use content::{Content, ContentBuilder, ContentRole};
pub use finish_reason::FinishReason;
pub use generate_content_request::GenerateContentRequest;
pub use generate_content_response::{GenerateContentResponse, UsageMetadata};
pub use generation_config::GenerationConfig;
pub use inline_data::{ImageMediaType, InlineData};
pub use model::{KnownModel, Model};
pub use model_info::{ModelInfo, catalog};
pub use part::Part;
pub use system_instruction::SystemInstruction;
