//! 统一错误类型定义

use serde::Serialize;
use thiserror::Error;

/// 工具箱错误类型
///
/// Every lookup keeps its failure cause here, even though the HTTP response
/// collapses failures into fixed fallback values.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum ToolboxError {
    /// 验证错误
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 网络错误
    #[error("Network error: {0}")]
    NetworkError(String),

    /// 请求超时
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Upstream answered with an unexpected HTTP status.
    #[error("{service} returned HTTP {status}")]
    UpstreamStatus {
        /// Upstream service name.
        service: String,
        /// HTTP status code.
        status: u16,
    },

    /// 响应解析失败
    #[error("Parse error: {0}")]
    ParseError(String),

    /// 域名解析失败
    #[error("Resolve error: {0}")]
    ResolveError(String),

    /// 未找到数据
    #[error("Not found: {0}")]
    NotFound(String),
}

impl ToolboxError {
    /// Classify a `reqwest` failure for `service`, keeping timeouts apart.
    pub(crate) fn from_request(service: &str, err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(format!("{service}: {err}"))
        } else if err.is_decode() {
            Self::ParseError(format!("{service}: {err}"))
        } else {
            Self::NetworkError(format!("{service}: {err}"))
        }
    }
}

/// 工具箱 Result 类型别名
pub type ToolboxResult<T> = std::result::Result<T, ToolboxError>;
