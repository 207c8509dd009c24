/// 文档分析 API 客户端
///
/// 封装提交分析任务和轮询任务结果的调用逻辑
use crate::config::Config;
use crate::error::{ApiError, AppError, AppResult, ConfigError};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::{json, Value};
use std::path::Path;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, error, info};

const DEFAULT_USER_AGENT: &str = "cu-sample-code";
const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
const OPERATION_LOCATION_HEADER: &str = "operation-location";

/// 客户端连接参数
#[derive(Debug, Clone)]
pub struct AnalysisSettings {
    pub endpoint: String,
    pub api_version: String,
    pub subscription_key: Option<String>,
    pub aad_token: Option<String>,
    pub user_agent: String,
}

impl AnalysisSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            endpoint: config.cu_endpoint.clone(),
            api_version: config.cu_api_version.clone(),
            subscription_key: config.cu_subscription_key.clone(),
            aad_token: config.cu_aad_token.clone(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// 已提交的分析任务
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzeJob {
    pub operation_location: String,
}

impl AnalyzeJob {
    /// 从 operation-location 中取出请求 ID（仅用于日志）
    pub fn request_id(&self) -> &str {
        let path = self
            .operation_location
            .split('?')
            .next()
            .unwrap_or_default();
        path.rsplit('/').next().unwrap_or(path)
    }
}

/// 待分析内容的位置
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileLocation<'a> {
    /// 本地文件，以二进制上传
    Path(&'a Path),
    /// 远程 URL，由服务端下载
    Url(&'a str),
}

/// 判断位置类型：存在的本地路径优先，其次 http(s) URL
pub fn resolve_location(file_location: &str) -> AppResult<FileLocation<'_>> {
    let path = Path::new(file_location);
    if path.exists() {
        return Ok(FileLocation::Path(path));
    }
    if file_location.contains("https://") || file_location.contains("http://") {
        return Ok(FileLocation::Url(file_location));
    }
    Err(AppError::Api(ApiError::InvalidLocation {
        location: file_location.to_string(),
    }))
}

/// 构建分析请求地址
pub fn analyze_url(endpoint: &str, api_version: &str, analyzer_id: &str) -> String {
    format!(
        "{}/contentunderstanding/analyzers/{}:analyze?api-version={}&stringEncoding=utf16",
        endpoint.trim_end_matches('/'),
        analyzer_id,
        api_version
    )
}

/// 任务状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationStatus {
    Succeeded,
    Failed,
    Running,
}

impl OperationStatus {
    /// 从轮询响应中读取状态（不区分大小写，缺失视为进行中）
    pub fn from_body(body: &Value) -> Self {
        let status = body
            .get("status")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_lowercase();
        match status.as_str() {
            "succeeded" => OperationStatus::Succeeded,
            "failed" => OperationStatus::Failed,
            _ => OperationStatus::Running,
        }
    }
}

/// 文档分析客户端
pub struct AnalysisClient {
    http: reqwest::Client,
    endpoint: String,
    api_version: String,
}

impl AnalysisClient {
    /// 创建新的分析客户端
    ///
    /// 订阅密钥优先；没有订阅密钥时使用 AAD 令牌
    pub fn new(settings: &AnalysisSettings) -> AppResult<Self> {
        if settings.endpoint.trim().is_empty() {
            return Err(ConfigError::Missing {
                name: "endpoint".to_string(),
            }
            .into());
        }
        if settings.api_version.trim().is_empty() {
            return Err(ConfigError::Missing {
                name: "api_version".to_string(),
            }
            .into());
        }

        let headers = build_headers(settings)?;
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| AppError::api_request_failed(settings.endpoint.as_str(), e))?;

        Ok(Self {
            http,
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
            api_version: settings.api_version.clone(),
        })
    }

    /// 提交分析任务
    ///
    /// # 参数
    /// - `analyzer_id`: 分析器 ID
    /// - `file_location`: 本地文件路径或 URL
    ///
    /// # 返回
    /// 返回可用于轮询的任务句柄
    pub async fn begin_analyze(&self, analyzer_id: &str, file_location: &str) -> AppResult<AnalyzeJob> {
        let location = resolve_location(file_location)?;
        let url = analyze_url(&self.endpoint, &self.api_version, analyzer_id);

        let request = match location {
            FileLocation::Path(path) => {
                let data = tokio::fs::read(path)
                    .await
                    .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;
                debug!("上传文件 {}，大小: {} 字节", path.display(), data.len());
                self.http
                    .post(&url)
                    .header(CONTENT_TYPE, "application/octet-stream")
                    .body(data)
            }
            FileLocation::Url(remote) => self.http.post(&url).json(&json!({ "url": remote })),
        };

        let response = request
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AppError::api_request_failed(url.as_str(), e))?;

        let operation_location = response
            .headers()
            .get(OPERATION_LOCATION_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                AppError::Api(ApiError::MissingOperationLocation {
                    endpoint: url.clone(),
                })
            })?
            .to_string();

        info!("正在使用分析器 {} 分析文件 {}", analyzer_id, file_location);

        Ok(AnalyzeJob { operation_location })
    }

    /// 轮询任务直到完成
    ///
    /// # 参数
    /// - `job`: 任务句柄
    /// - `timeout`: 最长等待时间
    /// - `interval`: 轮询间隔
    ///
    /// # 返回
    /// 任务成功时返回完整的结果 JSON；超时、服务端失败、传输错误分别返回不同错误
    pub async fn poll_result(&self, job: &AnalyzeJob, timeout: Duration, interval: Duration) -> AppResult<Value> {
        let start = Instant::now();

        loop {
            let elapsed = start.elapsed();
            debug!("等待服务响应，已等待 {:.2} 秒", elapsed.as_secs_f64());
            if elapsed >= timeout {
                return Err(AppError::Api(ApiError::Timeout {
                    operation: job.request_id().to_string(),
                    elapsed,
                }));
            }

            // 单次请求也不能越过截止时间
            let body = match tokio::time::timeout(timeout - elapsed, self.fetch_status(job)).await {
                Ok(body) => body?,
                Err(_) => {
                    return Err(AppError::Api(ApiError::Timeout {
                        operation: job.request_id().to_string(),
                        elapsed: start.elapsed(),
                    }));
                }
            };

            match OperationStatus::from_body(&body) {
                OperationStatus::Succeeded => {
                    info!("✓ 分析结果已就绪，耗时 {:.2} 秒", elapsed.as_secs_f64());
                    return Ok(body);
                }
                OperationStatus::Failed => {
                    error!("❌ 分析任务失败: {}", body);
                    return Err(AppError::Api(ApiError::RemoteFailed {
                        operation: job.request_id().to_string(),
                        body: body.to_string(),
                    }));
                }
                OperationStatus::Running => {
                    info!("请求 {} 处理中...", job.request_id());
                }
            }

            sleep(interval).await;
        }
    }

    async fn fetch_status(&self, job: &AnalyzeJob) -> AppResult<Value> {
        self.http
            .get(&job.operation_location)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AppError::api_request_failed(job.operation_location.as_str(), e))?
            .json()
            .await
            .map_err(|e| AppError::api_request_failed(job.operation_location.as_str(), e))
    }

    /// 提交并等待结果
    pub async fn analyze(
        &self,
        analyzer_id: &str,
        file_location: &str,
        timeout: Duration,
        interval: Duration,
    ) -> AppResult<Value> {
        let job = self.begin_analyze(analyzer_id, file_location).await?;
        self.poll_result(&job, timeout, interval).await
    }
}

fn build_headers(settings: &AnalysisSettings) -> AppResult<HeaderMap> {
    let mut headers = HeaderMap::new();

    match (&settings.subscription_key, &settings.aad_token) {
        (Some(key), _) if !key.is_empty() => {
            headers.insert(
                HeaderName::from_static("ocp-apim-subscription-key"),
                header_value(SUBSCRIPTION_KEY_HEADER, key)?,
            );
        }
        (_, Some(token)) if !token.is_empty() => {
            headers.insert(
                AUTHORIZATION,
                header_value("Authorization", &format!("Bearer {}", token))?,
            );
        }
        _ => return Err(ConfigError::MissingCredentials.into()),
    }

    headers.insert(
        HeaderName::from_static("x-ms-useragent"),
        header_value("x-ms-useragent", &settings.user_agent)?,
    );

    Ok(headers)
}

fn header_value(name: &str, value: &str) -> AppResult<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| {
        ConfigError::InvalidHeader {
            name: name.to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}
