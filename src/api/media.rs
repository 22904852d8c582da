//! 生成文件（视频 / notebook）的 HTTP 输出

use std::path::{Component, Path, PathBuf};

use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use phf::phf_map;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;

use crate::error::{AppError, AppResult};

/// 扩展名 → Content-Type
static MEDIA_TYPES: phf::Map<&'static str, &'static str> = phf_map! {
    "mp4" => "video/mp4",
    "ipynb" => "application/json",
    "json" => "application/json",
};

/// 按扩展名获取 Content-Type
pub fn media_type(path: &Path) -> &'static str {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .and_then(|ext| MEDIA_TYPES.get(ext.as_str()).copied())
        .unwrap_or("application/octet-stream")
}

/// 把请求路径拼到根目录下，拒绝越界路径
///
/// 只允许普通路径段，`..`、绝对路径等一律视为不存在
pub fn join_within(root: &Path, relative: &str) -> Option<PathBuf> {
    let relative = Path::new(relative);
    if relative.as_os_str().is_empty()
        || !relative.components().all(|c| matches!(c, Component::Normal(_)))
    {
        return None;
    }
    Some(root.join(relative))
}

/// 每次读取的块大小
const CHUNK_SIZE: usize = 1024 * 1024;

/// `Range` 请求头的解析结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeRequest {
    /// 无法识别（多段、非 bytes 单位、格式错误），按完整文件输出
    Full,
    /// 单段范围 `[start, end)`
    Partial(u64, u64),
    /// 格式正确但超出文件范围
    Unsatisfiable,
}

/// 解析 `Range: bytes=start-end`，end 不包含
pub fn parse_range(range_header: &str, file_size: u64) -> RangeRequest {
    let Some(range_str) = range_header.trim().strip_prefix("bytes=") else {
        return RangeRequest::Full;
    };
    if range_str.contains(',') {
        return RangeRequest::Full;
    }
    let Some((start, end)) = range_str.split_once('-') else {
        return RangeRequest::Full;
    };
    let (start, end) = (start.trim(), end.trim());

    if start.is_empty() {
        // bytes=-N：最后 N 个字节
        let Ok(suffix) = end.parse::<u64>() else {
            return RangeRequest::Full;
        };
        if suffix == 0 || file_size == 0 {
            return RangeRequest::Unsatisfiable;
        }
        return RangeRequest::Partial(file_size.saturating_sub(suffix), file_size);
    }

    let Ok(start) = start.parse::<u64>() else {
        return RangeRequest::Full;
    };
    let end = if end.is_empty() {
        file_size
    } else {
        match end.parse::<u64>() {
            Ok(last) if last >= start => last.saturating_add(1).min(file_size),
            _ => return RangeRequest::Full,
        }
    };

    if start >= file_size {
        return RangeRequest::Unsatisfiable;
    }
    RangeRequest::Partial(start, end)
}

/// 输出一个文件，支持单段 Range 请求，内容按块流式发送
pub async fn serve_file(path: &Path, headers: &HeaderMap, download_name: &str) -> AppResult<Response> {
    let mut file = match tokio::fs::File::open(path).await {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::NotFound("File not found".to_string()))
        }
        Err(e) => return Err(AppError::file(path.display().to_string(), e)),
    };
    let file_size = file
        .metadata()
        .await
        .map_err(|e| AppError::file(path.display().to_string(), e))?
        .len();

    let content_type = media_type(path);
    let disposition = format!("inline; filename=\"{}\"", download_name.replace('"', ""));

    let range = headers
        .get(header::RANGE)
        .and_then(|v| v.to_str().ok())
        .map(|v| parse_range(v, file_size))
        .unwrap_or(RangeRequest::Full);

    let (status, start, length) = match range {
        RangeRequest::Full => (StatusCode::OK, 0, file_size),
        RangeRequest::Partial(start, end) => (StatusCode::PARTIAL_CONTENT, start, end - start),
        RangeRequest::Unsatisfiable => {
            return Ok((
                StatusCode::RANGE_NOT_SATISFIABLE,
                [(header::CONTENT_RANGE, format!("bytes */{}", file_size))],
                Body::empty(),
            )
                .into_response());
        }
    };

    if start > 0 {
        file.seek(std::io::SeekFrom::Start(start))
            .await
            .map_err(|e| AppError::file(path.display().to_string(), e))?;
    }
    let body = Body::from_stream(ReaderStream::with_capacity(file.take(length), CHUNK_SIZE));

    let mut response = (
        status,
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CONTENT_LENGTH, length.to_string()),
            (header::ACCEPT_RANGES, "bytes".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response();

    if status == StatusCode::PARTIAL_CONTENT {
        let content_range = format!("bytes {}-{}/{}", start, start + length - 1, file_size);
        let value = HeaderValue::from_str(&content_range).map_err(|e| AppError::Other(e.to_string()))?;
        response.headers_mut().insert(header::CONTENT_RANGE, value);
    }
    Ok(response)
}
