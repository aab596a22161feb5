/*
 * Responsibility
 * - 環境変数や設定の読み込み (courses dir, upload dir, body limit, timeout など)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        Self::parse(&std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()))
    }

    fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    // Root of the disk course store.
    pub courses_dir: PathBuf,
    // Root under which per-request upload directories are created.
    pub upload_dir: PathBuf,

    pub max_body_bytes: usize,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = match std::env::var("PORT") {
            Ok(s) => s.parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            Err(_) => 8080,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_env();

        let courses_dir = std::env::var("AUTOGRADER_COURSES_DIR")
            .map(PathBuf::from)
            .map_err(|_| ConfigError::Missing("AUTOGRADER_COURSES_DIR"))?;

        let upload_dir = std::env::var("AUTOGRADER_UPLOAD_DIR")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(std::env::temp_dir);

        let max_body_bytes = match std::env::var("AUTOGRADER_MAX_BODY_BYTES") {
            Ok(v) => v
                .parse::<usize>()
                .map_err(|_| ConfigError::Invalid("AUTOGRADER_MAX_BODY_BYTES"))?,
            Err(_) => 16 * 1024 * 1024,
        };

        let request_timeout_seconds = match std::env::var("AUTOGRADER_REQUEST_TIMEOUT_SECONDS") {
            Ok(v) => v
                .parse::<u64>()
                .map_err(|_| ConfigError::Invalid("AUTOGRADER_REQUEST_TIMEOUT_SECONDS"))?,
            Err(_) => 60,
        };

        Ok(Self {
            addr,
            app_env,
            courses_dir,
            upload_dir,
            max_body_bytes,
            request_timeout: Duration::from_secs(request_timeout_seconds),
        })
    }
}
