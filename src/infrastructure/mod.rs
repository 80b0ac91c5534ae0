pub mod backend;
pub mod gemini_client;

pub use backend::GenerativeBackend;
pub use gemini_client::GeminiClient;
