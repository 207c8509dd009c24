use std::time::Duration;
use thiserror::Error;

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 分析 API 调用错误
    #[error("API错误: {0}")]
    Api(#[from] ApiError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 报表生成错误
    #[error("报表错误: {0}")]
    Report(#[from] ReportError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 分析 API 调用错误
///
/// 超时、远端失败、传输错误三者必须可区分，调用方据此决定是否重试
#[derive(Debug, Error)]
pub enum ApiError {
    /// 网络请求失败（传输层 / HTTP 状态码错误）
    #[error("API请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: BoxedSource,
    },
    /// 轮询超时
    #[error("分析任务超时: 已等待 {:.2} 秒 ({operation})", .elapsed.as_secs_f64())]
    Timeout {
        operation: String,
        elapsed: Duration,
    },
    /// 服务端报告任务失败
    #[error("分析任务失败 ({operation}): {body}")]
    RemoteFailed { operation: String, body: String },
    /// 响应头缺少 operation-location
    #[error("响应头中缺少 operation-location ({endpoint})")]
    MissingOperationLocation { endpoint: String },
    /// 文件位置既不是存在的路径也不是 URL
    #[error("文件位置必须是有效路径或URL: {location}")]
    InvalidLocation { location: String },
    /// JSON 解析失败
    #[error("JSON解析失败: {source}")]
    JsonParseFailed {
        #[source]
        source: BoxedSource,
    },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 文件不存在
    #[error("文件不存在: {path}")]
    NotFound { path: String },
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: BoxedSource,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: BoxedSource,
    },
    /// 移动文件失败
    #[error("移动文件失败 ({from} -> {to}): {source}")]
    MoveFailed {
        from: String,
        to: String,
        #[source]
        source: BoxedSource,
    },
    /// JSON 文档解析失败
    #[error("JSON解析失败 ({path}): {source}")]
    JsonParseFailed {
        path: String,
        #[source]
        source: BoxedSource,
    },
    /// 目录不存在
    #[error("目录不存在: {path}")]
    DirectoryNotFound { path: String },
}

/// 报表生成错误
#[derive(Debug, Error)]
pub enum ReportError {
    /// 工作簿写入失败
    #[error("写入工作簿失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: BoxedSource,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 必填配置缺失
    #[error("缺少配置项: {name}")]
    Missing { name: String },
    /// 订阅密钥和 AAD 令牌都未提供
    #[error("必须提供 subscription_key 或 aad_token 之一")]
    MissingCredentials,
    /// 无法构造请求头
    #[error("无效的请求头 {name}: {reason}")]
    InvalidHeader { name: String, reason: String },
}

// ========== 从常见错误类型转换 ==========

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Api(ApiError::JsonParseFailed {
            source: Box::new(err),
        })
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: String::new(),
            source: Box::new(err),
        })
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建API请求失败错误
    pub fn api_request_failed(
        endpoint: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Api(ApiError::RequestFailed {
            endpoint: endpoint.into(),
            source: Box::new(source),
        })
    }

    /// 创建文件读取错误
    pub fn file_read_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 创建 JSON 文档解析错误
    pub fn json_parse_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::JsonParseFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 创建工作簿写入错误
    pub fn report_write_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Report(ReportError::WriteFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 是否为轮询超时
    pub fn is_timeout(&self) -> bool {
        matches!(self, AppError::Api(ApiError::Timeout { .. }))
    }

    /// 是否为服务端报告的失败
    pub fn is_remote_failure(&self) -> bool {
        matches!(self, AppError::Api(ApiError::RemoteFailed { .. }))
    }

    /// 是否为传输层错误
    pub fn is_transport(&self) -> bool {
        matches!(self, AppError::Api(ApiError::RequestFailed { .. }))
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
