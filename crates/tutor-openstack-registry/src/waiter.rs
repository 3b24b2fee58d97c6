//! レジストリ準備完了の待機モジュール（Exponential Backoff）
//!
//! カタログエンドポイントへの GET が成功するまで、接続エラーと
//! 一時的なステータスコードに対して指数バックオフで再試行する。

use crate::converter::REGISTRY_URL;
use crate::error::{RegistryError, Result};
use std::time::{Duration, Instant};
use tokio::time::sleep;

/// 再試行の対象とするステータスコード
pub const RETRY_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// 指数バックオフ設定
#[derive(Debug, Clone, PartialEq)]
pub struct BackoffConfig {
    /// 初回試行後の最大再試行回数
    pub max_retries: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub multiplier: f64,
    /// 1リクエストあたりのタイムアウト
    pub request_timeout_ms: u64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            max_retries: 14,
            initial_delay_ms: 1000,
            max_delay_ms: 120_000,
            multiplier: 2.0,
            request_timeout_ms: 5000,
        }
    }
}

impl BackoffConfig {
    /// 指定回数目の待機時間を計算（ミリ秒）
    pub fn delay_for_attempt(&self, attempt: u32) -> u64 {
        let delay = self.initial_delay_ms as f64 * self.multiplier.powi(attempt as i32);
        (delay as u64).min(self.max_delay_ms)
    }

    /// 全再試行の待機時間の合計（リクエスト時間は含まない）
    pub fn total_delay(&self) -> Duration {
        let ms: u64 = (0..self.max_retries)
            .map(|attempt| self.delay_for_attempt(attempt))
            .sum();
        Duration::from_millis(ms)
    }
}

/// HTTP ヘルスチェック
#[derive(Debug, Clone)]
pub struct HealthCheck {
    url: String,
    backoff: BackoffConfig,
}

enum Probe {
    Ready,
    Retry(String),
}

impl HealthCheck {
    pub fn new(url: impl Into<String>, backoff: BackoffConfig) -> Self {
        Self {
            url: url.into(),
            backoff,
        }
    }

    /// ローカルレジストリの `/v2/_catalog`
    pub fn registry_catalog() -> Self {
        Self::new(
            format!("{}/v2/_catalog", REGISTRY_URL),
            BackoffConfig::default(),
        )
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn backoff(&self) -> &BackoffConfig {
        &self.backoff
    }

    /// 準備完了まで待機し、要した試行回数を返す
    pub async fn wait(&self) -> Result<u32> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(self.backoff.request_timeout_ms))
            .build()?;
        let started = Instant::now();
        let total_attempts = self.backoff.max_retries + 1;
        let mut last_error = String::new();

        for attempt in 0..total_attempts {
            match self.probe(&client).await? {
                Probe::Ready => {
                    tracing::info!("Registry ready after {} attempt(s)", attempt + 1);
                    return Ok(attempt + 1);
                }
                Probe::Retry(reason) => {
                    last_error = reason;
                }
            }

            // 最後の試行でなければ待機
            if attempt + 1 < total_attempts {
                let delay_ms = self.backoff.delay_for_attempt(attempt);
                tracing::warn!(
                    "Registry not ready ({}), retrying in {} ms",
                    last_error,
                    delay_ms
                );
                sleep(Duration::from_millis(delay_ms)).await;
            }
        }

        Err(RegistryError::HealthCheckExhausted {
            url: self.url.clone(),
            attempts: total_attempts,
            elapsed: started.elapsed(),
            last_error,
        })
    }

    async fn probe(&self, client: &reqwest::Client) -> Result<Probe> {
        tracing::debug!("GET {}", self.url);
        match client.get(&self.url).send().await {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    Ok(Probe::Ready)
                } else if RETRY_STATUSES.contains(&status.as_u16()) {
                    Ok(Probe::Retry(format!("HTTP {}", status.as_u16())))
                } else {
                    Err(RegistryError::HealthCheckFailed {
                        url: self.url.clone(),
                        status: status.as_u16(),
                    })
                }
            }
            Err(e) if e.is_connect() || e.is_timeout() || e.is_request() => {
                Ok(Probe::Retry(e.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
