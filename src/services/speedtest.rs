//! Internet throughput measurement against Cloudflare's speed endpoints

use std::time::Instant;

use async_trait::async_trait;

use crate::{Error, Result};

const DOWNLOAD_URL: &str = "https://speed.cloudflare.com/__down";
const UPLOAD_URL: &str = "https://speed.cloudflare.com/__up";

/// Bytes transferred in each direction
const DOWNLOAD_BYTES: usize = 25_000_000;
const UPLOAD_BYTES: usize = 10_000_000;

/// Measured throughput in megabits per second
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedReport {
    pub download_mbps: f64,
    pub upload_mbps: f64,
}

/// Measures connection throughput
#[async_trait(?Send)]
pub trait SpeedTester {
    /// Run a download then an upload measurement
    async fn measure(&self) -> Result<SpeedReport>;
}

/// Cloudflare speed test client
pub struct CloudflareSpeedTest {
    client: reqwest::Client,
}

impl CloudflareSpeedTest {
    /// Create a tester; the client's timeout bounds each transfer
    #[must_use]
    pub const fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn download(&self) -> Result<f64> {
        let started = Instant::now();
        let response = self
            .client
            .get(DOWNLOAD_URL)
            .query(&[("bytes", DOWNLOAD_BYTES)])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Error::service("speed test", format!("download {}", response.status())));
        }
        let body = response.bytes().await?;
        Ok(mbps(body.len(), started.elapsed().as_secs_f64()))
    }

    async fn upload(&self) -> Result<f64> {
        let payload = vec![0u8; UPLOAD_BYTES];
        let started = Instant::now();
        let response = self.client.post(UPLOAD_URL).body(payload).send().await?;
        if !response.status().is_success() {
            return Err(Error::service("speed test", format!("upload {}", response.status())));
        }
        Ok(mbps(UPLOAD_BYTES, started.elapsed().as_secs_f64()))
    }
}

#[async_trait(?Send)]
impl SpeedTester for CloudflareSpeedTest {
    async fn measure(&self) -> Result<SpeedReport> {
        let download_mbps = self.download().await?;
        let upload_mbps = self.upload().await?;
        tracing::info!(download_mbps, upload_mbps, "speed test complete");
        Ok(SpeedReport {
            download_mbps,
            upload_mbps,
        })
    }
}

/// Megabits per second for `bytes` moved in `seconds`
#[allow(clippy::cast_precision_loss)]
fn mbps(bytes: usize, seconds: f64) -> f64 {
    if seconds <= 0.0 {
        return 0.0;
    }
    (bytes as f64 * 8.0) / seconds / 1_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mbps() {
        assert!((mbps(1_250_000, 1.0) - 10.0).abs() < 1e-9);
        assert!((mbps(25_000_000, 2.0) - 100.0).abs() < 1e-9);
        assert!(mbps(100, 0.0).abs() < f64::EPSILON);
    }
}
