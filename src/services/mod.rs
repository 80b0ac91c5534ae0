pub mod analysis_service;
pub mod edit_service;
pub mod encoding;

pub use analysis_service::DesignAnalysisService;
pub use edit_service::ImageEditService;
pub use encoding::encode_image;
