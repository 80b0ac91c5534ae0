//! 源图片与编码后的图片

use std::path::{Path, PathBuf};

/// 源图片内容的来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageContent {
    /// 内存中的原始字节
    Bytes(Vec<u8>),
    /// 磁盘文件，编码时才读取
    File(PathBuf),
    /// `data:<mime>;base64,<data>` 形式的字符串
    DataUri(String),
}

/// 用户选择的源图片
///
/// 不可变值，只在一轮生成中存活
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    pub content: ImageContent,
    pub mime_type: String,
}

impl SourceImage {
    pub fn from_bytes(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            content: ImageContent::Bytes(bytes),
            mime_type: mime_type.into(),
        }
    }

    /// 从文件路径创建，MIME 类型按扩展名推断
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mime_type = mime_from_extension(&path).to_string();
        Self {
            content: ImageContent::File(path),
            mime_type,
        }
    }

    pub fn from_data_uri(uri: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            content: ImageContent::DataUri(uri.into()),
            mime_type: mime_type.into(),
        }
    }
}

/// base64 编码后的图片（不带 data URI 前缀）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub data: String,
    pub mime_type: String,
}

/// 根据扩展名推断 MIME 类型
pub fn mime_from_extension(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase());

    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("heic") => "image/heic",
        Some("heif") => "image/heif",
        _ => "application/octet-stream",
    }
}
