mod client;
mod types;

pub use client::{CompletionBackend, DEFAULT_ENDPOINT, GeminiClient, api_error};
pub use types::{
    ApiErrorBody, ApiErrorDetail, Blob, Candidate, CandidateContent, CandidatePart, Completion,
    GenerateContentRequest, GenerateContentResponse, Message, Part, PromptFeedback, Role,
    SystemInstruction,
};
