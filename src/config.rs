use std::path::PathBuf;
use std::time::Duration;

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    // --- 分析服务配置 ---
    pub cu_endpoint: String,
    pub cu_api_version: String,
    pub cu_subscription_key: Option<String>,
    pub cu_aad_token: Option<String>,
    pub cu_analyzer_id: String,
    /// 单个分析任务的最长等待时间（秒）
    pub poll_timeout_secs: u64,
    /// 轮询间隔（秒）
    pub poll_interval_secs: u64,
    // --- 文件与输出 ---
    /// 待分析海报目录
    pub playbills_folder: String,
    /// 分析结果 JSON 目录
    pub results_folder: String,
    /// 输出工作簿
    pub output_file: String,
    /// 运行日志文件
    pub output_log_file: String,
    /// 失败记录文件
    pub warn_file: String,
    /// 是否显示详细日志（打印样例行）
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cu_endpoint: String::new(),
            cu_api_version: "2025-05-01-preview".to_string(),
            cu_subscription_key: None,
            cu_aad_token: None,
            cu_analyzer_id: String::new(),
            poll_timeout_secs: 60 * 60,
            poll_interval_secs: 1,
            playbills_folder: "./playbills".to_string(),
            results_folder: "./curesults".to_string(),
            output_file: "seattle_opera_complete_by_year.xlsx".to_string(),
            output_log_file: "output.txt".to_string(),
            warn_file: "warn.txt".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            cu_endpoint: std::env::var("CU_ENDPOINT").unwrap_or(default.cu_endpoint),
            cu_api_version: std::env::var("CU_API_VERSION").unwrap_or(default.cu_api_version),
            cu_subscription_key: non_empty_var("CU_SUBSCRIPTION_KEY").or(default.cu_subscription_key),
            cu_aad_token: non_empty_var("CU_AAD_TOKEN").or(default.cu_aad_token),
            cu_analyzer_id: std::env::var("CU_ANALYZER_ID").unwrap_or(default.cu_analyzer_id),
            poll_timeout_secs: std::env::var("POLL_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.poll_timeout_secs),
            poll_interval_secs: std::env::var("POLL_INTERVAL_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.poll_interval_secs),
            playbills_folder: std::env::var("PLAYBILLS_FOLDER").unwrap_or(default.playbills_folder),
            results_folder: std::env::var("RESULTS_FOLDER").unwrap_or(default.results_folder),
            output_file: std::env::var("OUTPUT_FILE").unwrap_or(default.output_file),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
            warn_file: std::env::var("WARN_FILE").unwrap_or(default.warn_file),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
        }
    }

    /// 是否具备调用分析服务的条件
    pub fn analysis_enabled(&self) -> bool {
        !self.cu_endpoint.is_empty()
            && !self.cu_analyzer_id.is_empty()
            && (self.cu_subscription_key.is_some() || self.cu_aad_token.is_some())
    }

    pub fn poll_timeout(&self) -> Duration {
        Duration::from_secs(self.poll_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn playbills_path(&self) -> PathBuf {
        PathBuf::from(&self.playbills_folder)
    }

    pub fn results_path(&self) -> PathBuf {
        PathBuf::from(&self.results_folder)
    }

    pub fn output_path(&self) -> PathBuf {
        PathBuf::from(&self.output_file)
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_requires_endpoint_analyzer_and_credentials() {
        let mut config = Config::default();
        assert!(!config.analysis_enabled());

        config.cu_endpoint = "https://example.cognitiveservices.azure.com".to_string();
        config.cu_analyzer_id = "playbill-analyzer".to_string();
        assert!(!config.analysis_enabled());

        config.cu_aad_token = Some("token".to_string());
        assert!(config.analysis_enabled());
    }

    #[test]
    fn test_default_durations() {
        let config = Config::default();
        assert_eq!(config.poll_timeout(), Duration::from_secs(3600));
        assert_eq!(config.poll_interval(), Duration::from_secs(1));
    }
}
