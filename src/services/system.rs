//! Host introspection

use async_trait::async_trait;
use sysinfo::System;

use crate::Result;

/// What the assistant reports about the machine
#[derive(Debug, Clone, PartialEq)]
pub struct SystemReport {
    pub os: String,
    pub release: String,
    pub host: String,
    pub processor: String,
    pub cpu_usage: f32,
    /// Charge in percent; `None` without a battery
    pub battery: Option<u8>,
}

impl SystemReport {
    /// Spoken description
    #[must_use]
    pub fn describe(&self) -> String {
        let mut text = format!(
            "You are using a {} system with a {} processor. Your machine is named {}, running on {}. Current CPU usage is {:.1}%.",
            self.os, self.processor, self.host, self.release, self.cpu_usage
        );
        if let Some(level) = self.battery {
            text.push_str(&format!(" Battery level is at {level}%."));
        }
        text
    }
}

/// Reads host details
#[async_trait(?Send)]
pub trait SystemProbe {
    /// Take a snapshot of the host
    async fn snapshot(&self) -> Result<SystemReport>;
}

/// Probe backed by `sysinfo`
#[derive(Debug, Default, Clone, Copy)]
pub struct SysinfoProbe;

#[async_trait(?Send)]
impl SystemProbe for SysinfoProbe {
    async fn snapshot(&self) -> Result<SystemReport> {
        let mut sys = System::new_all();
        // CPU usage needs two samples
        tokio::time::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL).await;
        sys.refresh_cpu_usage();

        let unknown = || "unknown".to_string();
        let report = SystemReport {
            os: System::name().unwrap_or_else(unknown),
            release: System::kernel_version().unwrap_or_else(unknown),
            host: System::host_name().unwrap_or_else(unknown),
            processor: sys
                .cpus()
                .first()
                .map(|c| c.brand().trim().to_string())
                .filter(|b| !b.is_empty())
                .unwrap_or_else(unknown),
            cpu_usage: sys.global_cpu_usage(),
            battery: battery_level(),
        };

        tracing::debug!(?report, "system snapshot");
        Ok(report)
    }
}

/// Battery charge from the kernel's power-supply class
#[cfg(target_os = "linux")]
fn battery_level() -> Option<u8> {
    let entries = std::fs::read_dir("/sys/class/power_supply").ok()?;
    entries
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_name().to_string_lossy().starts_with("BAT"))
        .find_map(|e| {
            std::fs::read_to_string(e.path().join("capacity"))
                .ok()?
                .trim()
                .parse()
                .ok()
        })
}

#[cfg(not(target_os = "linux"))]
const fn battery_level() -> Option<u8> {
    None
}
