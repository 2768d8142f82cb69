//! HTTP client for the intervals.icu API with rate limiting.
//!
//! - Basic auth with `API_KEY:<key>`
//! - Rate limiting (30 req/s burst, 131 req/10s sustained)
//! - Automatic retry with exponential backoff on 429

use base64::Engine;
use chrono::{Local, Months, NaiveDate};
use log::{debug, info, warn};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use crate::config::Config;
use crate::error::{CoachError, Result};
use crate::types::{Activity, Profile, Wellness};

const BASE_URL: &str = "https://intervals.icu";

// API rate limits
const BURST_LIMIT: u32 = 30; // Max requests per second
const SUSTAINED_LIMIT: u32 = 131; // Max requests per 10 seconds
const WINDOW_MS: u64 = 10_000; // 10 second window

const MAX_RETRIES: u32 = 3;
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Activity listings look back this far.
const ACTIVITY_LOOKBACK_MONTHS: u32 = 6;

/// Rate limiter using sliding window
struct RateLimiter {
    request_times: Mutex<VecDeque<Instant>>,
    consecutive_429s: AtomicU32,
}

impl RateLimiter {
    fn new() -> Self {
        Self {
            request_times: Mutex::new(VecDeque::with_capacity(SUSTAINED_LIMIT as usize + 10)),
            consecutive_429s: AtomicU32::new(0),
        }
    }

    /// Time to wait before the next request may go out, if any.
    fn delay(times: &mut VecDeque<Instant>, now: Instant) -> Option<Duration> {
        // Prune old requests outside window
        let cutoff = now - Duration::from_millis(WINDOW_MS);
        while times.front().is_some_and(|&t| t < cutoff) {
            times.pop_front();
        }

        let wait_until = if times.len() >= SUSTAINED_LIMIT as usize {
            times.front().map(|&oldest| oldest + Duration::from_millis(WINDOW_MS))
        } else {
            let one_sec_ago = now - Duration::from_secs(1);
            let recent = times.iter().filter(|&&t| t > one_sec_ago).count();
            if recent >= BURST_LIMIT as usize {
                times
                    .iter()
                    .find(|&&t| t > one_sec_ago)
                    .map(|&t| t + Duration::from_secs(1))
            } else {
                None
            }
        };

        wait_until.filter(|&t| t > now).map(|t| t - now)
    }

    async fn wait_if_needed(&self) {
        loop {
            let wait_time = {
                let mut times = self.request_times.lock().await;
                Self::delay(&mut times, Instant::now())
            };

            match wait_time {
                Some(duration) => {
                    debug!("[Http] Rate limit: waiting {:?}", duration);
                    tokio::time::sleep(duration).await;
                }
                None => break,
            }
        }
    }

    async fn record_request(&self) {
        let mut times = self.request_times.lock().await;
        times.push_back(Instant::now());
    }

    fn record_success(&self) {
        self.consecutive_429s.store(0, Ordering::Relaxed);
    }

    fn record_429(&self) -> Duration {
        let count = self.consecutive_429s.fetch_add(1, Ordering::Relaxed) + 1;
        // Exponential backoff: 2s, 4s, 8s, 16s
        let backoff_ms = 1000 * (1u64 << count.min(4));
        Duration::from_millis(backoff_ms)
    }
}

/// Map a non-success status to the matching error.
fn status_error(status: StatusCode, path: &str, body: String) -> CoachError {
    match status {
        StatusCode::UNAUTHORIZED => CoachError::Authentication,
        StatusCode::NOT_FOUND => CoachError::NotFound {
            resource: path.to_string(),
        },
        _ => CoachError::Http {
            message: if body.is_empty() {
                status.to_string()
            } else {
                body
            },
            status_code: Some(status.as_u16()),
        },
    }
}

fn transport_error(e: reqwest::Error) -> CoachError {
    CoachError::Http {
        message: e.to_string(),
        status_code: e.status().map(|s| s.as_u16()),
    }
}

/// Inclusive `oldest..=newest` range ending today.
fn date_range(oldest: NaiveDate) -> (String, String) {
    let newest = Local::now().date_naive();
    (
        oldest.format("%Y-%m-%d").to_string(),
        newest.format("%Y-%m-%d").to_string(),
    )
}

/// Client for one athlete's data on intervals.icu.
pub struct IntervalsClient {
    client: Client,
    base_url: String,
    auth_header: String,
    athlete_id: String,
    rate_limiter: RateLimiter,
}

impl IntervalsClient {
    pub fn new(api_key: &str, athlete_id: &str) -> Result<Self> {
        Self::with_base_url(api_key, athlete_id, BASE_URL)
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.api_key, &config.athlete_id)
    }

    /// Client against another host, e.g. a local mock server.
    pub fn with_base_url(api_key: &str, athlete_id: &str, base_url: &str) -> Result<Self> {
        let auth = base64::engine::general_purpose::STANDARD.encode(format!("API_KEY:{}", api_key));

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| CoachError::Http {
                message: format!("Failed to create HTTP client: {}", e),
                status_code: None,
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_header: format!("Basic {}", auth),
            athlete_id: athlete_id.to_string(),
            rate_limiter: RateLimiter::new(),
        })
    }

    /// Athlete profile with sport settings.
    pub async fn get_profile(&self) -> Result<Profile> {
        self.get_json(&format!("/api/v1/athlete/{}", self.athlete_id), &[])
            .await
    }

    /// Most recent activities of the last six months, newest first.
    pub async fn get_activities(&self, limit: usize) -> Result<Vec<Activity>> {
        let today = Local::now().date_naive();
        let oldest = today
            .checked_sub_months(Months::new(ACTIVITY_LOOKBACK_MONTHS))
            .unwrap_or(today);
        let (oldest, newest) = date_range(oldest);

        let mut activities: Vec<Activity> = self
            .get_json(
                &format!("/api/v1/athlete/{}/activities", self.athlete_id),
                &[("oldest", oldest), ("newest", newest)],
            )
            .await?;

        // ISO-8601 start times sort chronologically as strings
        activities.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        activities.truncate(limit);
        Ok(activities)
    }

    /// One activity including its streams, power curve and zone times.
    pub async fn get_activity(&self, id: &str) -> Result<Activity> {
        self.get_json(&format!("/api/v1/activity/{}", id), &[]).await
    }

    /// Daily wellness records for the last `days` days, oldest first.
    pub async fn get_wellness(&self, days: u32) -> Result<Vec<Wellness>> {
        let today = Local::now().date_naive();
        let oldest = today - chrono::Duration::days(i64::from(days));
        let (oldest, newest) = date_range(oldest);

        let mut records: Vec<Wellness> = self
            .get_json(
                &format!("/api/v1/athlete/{}/wellness", self.athlete_id),
                &[("oldest", oldest), ("newest", newest)],
            )
            .await?;
        records.sort_by_key(|w| w.id);
        Ok(records)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let start = Instant::now();
        let mut retries = 0;

        loop {
            self.rate_limiter.wait_if_needed().await;

            let response = self
                .client
                .get(&url)
                .query(query)
                .header("Authorization", &self.auth_header)
                .send()
                .await;

            self.rate_limiter.record_request().await;

            let resp = match response {
                Ok(resp) => resp,
                Err(e) => {
                    retries += 1;
                    if retries > MAX_RETRIES {
                        return Err(transport_error(e));
                    }
                    let backoff = Duration::from_millis(500 * (1 << retries));
                    warn!(
                        "[Http] Error for {}: {}, retry {} after {:?}",
                        path, e, retries, backoff
                    );
                    tokio::time::sleep(backoff).await;
                    continue;
                }
            };

            let status = resp.status();
            if status == StatusCode::TOO_MANY_REQUESTS {
                retries += 1;
                if retries > MAX_RETRIES {
                    return Err(CoachError::RateLimited {
                        retries: MAX_RETRIES,
                    });
                }
                let backoff = self.rate_limiter.record_429();
                warn!("[Http] 429 for {}, retry {} after {:?}", path, retries, backoff);
                tokio::time::sleep(backoff).await;
                continue;
            }
            self.rate_limiter.record_success();

            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                return Err(status_error(status, path, body));
            }

            let body = resp.text().await.map_err(transport_error)?;
            info!(
                "[Http] GET {} -> {} bytes in {:.2}s",
                path,
                body.len(),
                start.elapsed().as_secs_f64()
            );
            return Ok(serde_json::from_str(&body)?);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rate_limiter() {
        let limiter = RateLimiter::new();

        // Should not wait on first request
        let start = Instant::now();
        limiter.wait_if_needed().await;
        limiter.record_request().await;
        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[test]
    fn test_burst_limit_delay() {
        let now = Instant::now();
        let mut times: VecDeque<Instant> = (0..BURST_LIMIT).map(|_| now).collect();
        let wait = RateLimiter::delay(&mut times, now).unwrap();
        assert!(wait <= Duration::from_secs(1));
        assert!(wait > Duration::from_millis(900));

        let mut few: VecDeque<Instant> = (0..5).map(|_| now).collect();
        assert!(RateLimiter::delay(&mut few, now).is_none());
    }

    #[test]
    fn test_backoff_grows() {
        let limiter = RateLimiter::new();
        assert_eq!(limiter.record_429(), Duration::from_secs(2));
        assert_eq!(limiter.record_429(), Duration::from_secs(4));
        limiter.record_success();
        assert_eq!(limiter.record_429(), Duration::from_secs(2));
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            status_error(StatusCode::UNAUTHORIZED, "/x", String::new()),
            CoachError::Authentication
        ));
        assert!(matches!(
            status_error(StatusCode::NOT_FOUND, "/api/v1/activity/i1", String::new()),
            CoachError::NotFound { .. }
        ));
        let err = status_error(StatusCode::BAD_GATEWAY, "/x", String::new());
        assert!(err.to_string().contains("502"));
    }
}
