//! 统一配置中心
//!
//! 提供应用的全局配置管理，包括：
//! - 服务监听地址
//! - 在线状态清理的间隔与超时

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// 全局应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 服务配置
    pub server: ServerConfig,
    /// 在线状态配置
    pub presence: PresenceConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// 在线状态配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresenceConfig {
    /// 两次清理之间的间隔（秒）
    pub sweep_interval_secs: u64,
    /// 未发送心跳超过该时长（秒）即被移出房间
    pub staleness_timeout_secs: u64,
}

impl PresenceConfig {
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    pub fn staleness_timeout(&self) -> Duration {
        Duration::from_secs(self.staleness_timeout_secs)
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

impl AppConfig {
    /// 从环境变量加载配置，缺失或无法解析的值使用默认值
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
                port: env_or("SERVER_PORT", 5000),
            },
            presence: PresenceConfig {
                sweep_interval_secs: env_or("PRESENCE_SWEEP_INTERVAL_SECS", 15),
                staleness_timeout_secs: env_or("PRESENCE_TIMEOUT_SECS", 10),
            },
        }
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.host.is_empty() {
            return Err(ConfigError::InvalidServerConfig(
                "Server host cannot be empty".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigError::InvalidServerPort(
                "Server port must be greater than 0".to_string(),
            ));
        }

        if self.presence.sweep_interval_secs == 0 {
            return Err(ConfigError::InvalidPresenceConfig(
                "Sweep interval must be greater than 0".to_string(),
            ));
        }

        if self.presence.staleness_timeout_secs == 0 {
            return Err(ConfigError::InvalidPresenceConfig(
                "Staleness timeout must be greater than 0".to_string(),
            ));
        }

        // chrono::Duration 以 i64 毫秒存储
        if self.presence.staleness_timeout_secs > i64::MAX as u64 / 1000 {
            return Err(ConfigError::InvalidPresenceConfig(
                "Staleness timeout is too large".to_string(),
            ));
        }

        Ok(())
    }
}

/// 配置错误类型
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid server port: {0}")]
    InvalidServerPort(String),
    #[error("Invalid server configuration: {0}")]
    InvalidServerConfig(String),
    #[error("Invalid presence configuration: {0}")]
    InvalidPresenceConfig(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 5000,
            },
            presence: PresenceConfig {
                sweep_interval_secs: 15,
                staleness_timeout_secs: 10,
            },
        }
    }
}
