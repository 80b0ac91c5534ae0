//! 图片编码 - 业务能力层
//!
//! 把源图片转换为标准 base64 文本，去掉 data URI 前缀，MIME 类型原样透传

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use tokio::fs;
use tracing::debug;

use crate::error::ReadError;
use crate::models::image::{EncodedImage, ImageContent, SourceImage};

/// 编码源图片
///
/// 每轮生成只调用一次，结果被所有编辑请求共享
pub async fn encode_image(image: &SourceImage) -> Result<EncodedImage, ReadError> {
    let data = match &image.content {
        ImageContent::Bytes(bytes) => BASE64_STANDARD.encode(bytes),
        ImageContent::File(path) => {
            let bytes = fs::read(path).await.map_err(|source| ReadError::Io {
                path: path.display().to_string(),
                source,
            })?;
            debug!("读取图片文件: {} ({} 字节)", path.display(), bytes.len());
            BASE64_STANDARD.encode(bytes)
        }
        ImageContent::DataUri(uri) => {
            let data = strip_data_uri_prefix(uri)?;
            // 只校验，不重新编码
            BASE64_STANDARD.decode(data)?;
            data.to_string()
        }
    };

    Ok(EncodedImage {
        data,
        mime_type: image.mime_type.clone(),
    })
}

/// 去掉 `data:<mime>;base64,` 前缀
pub fn strip_data_uri_prefix(uri: &str) -> Result<&str, ReadError> {
    if !uri.starts_with("data:") {
        return Ok(uri.trim());
    }
    uri.split_once(',')
        .filter(|(header, _)| header.ends_with(";base64"))
        .map(|(_, data)| data.trim())
        .ok_or(ReadError::MalformedDataUri)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    /// 8 字节 PNG 签名加几个非 ASCII 字节
    const FIXTURE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0xFF, 0xFE, 0x7F];

    #[tokio::test]
    async fn test_bytes_round_trip() {
        let image = SourceImage::from_bytes(FIXTURE.to_vec(), "image/png");
        let encoded = encode_image(&image).await.unwrap();

        assert_eq!(encoded.mime_type, "image/png");
        assert_eq!(BASE64_STANDARD.decode(&encoded.data).unwrap(), FIXTURE);
    }

    #[tokio::test]
    async fn test_file_round_trip() {
        let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        file.write_all(FIXTURE).unwrap();

        let image = SourceImage::from_path(file.path());
        let encoded = encode_image(&image).await.unwrap();

        assert_eq!(encoded.mime_type, "image/png");
        assert_eq!(BASE64_STANDARD.decode(&encoded.data).unwrap(), FIXTURE);
    }

    #[tokio::test]
    async fn test_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let image = SourceImage::from_path(dir.path().join("gone.png"));

        let err = encode_image(&image).await.unwrap_err();
        assert!(matches!(err, ReadError::Io { .. }));
    }

    #[tokio::test]
    async fn test_data_uri_prefix_is_stripped() {
        let data = BASE64_STANDARD.encode(FIXTURE);
        let uri = format!("data:image/webp;base64,{data}");
        let image = SourceImage::from_data_uri(uri, "image/webp");

        let encoded = encode_image(&image).await.unwrap();
        assert_eq!(encoded.data, data);
        assert_eq!(encoded.mime_type, "image/webp");
    }

    #[tokio::test]
    async fn test_bad_data_uri() {
        let image = SourceImage::from_data_uri("data:image/png,rawtext", "image/png");
        assert!(matches!(
            encode_image(&image).await.unwrap_err(),
            ReadError::MalformedDataUri
        ));

        let image = SourceImage::from_data_uri("data:image/png;base64,!!!", "image/png");
        assert!(matches!(
            encode_image(&image).await.unwrap_err(),
            ReadError::InvalidBase64(_)
        ));
    }

    #[test]
    fn test_strip_without_prefix() {
        assert_eq!(strip_data_uri_prefix("QUJD").unwrap(), "QUJD");
    }
}
