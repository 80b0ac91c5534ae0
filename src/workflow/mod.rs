pub mod designer_session;
pub mod generation_cycle;

pub use designer_session::DesignerSession;
pub use generation_cycle::{validate_inputs, GenerationCycle, VARIANT_COUNT};
