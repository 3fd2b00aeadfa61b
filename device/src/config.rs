use std::time::Duration;

use crate::bus::Address;

/// the well-known address a follower listens at and the authority addresses every frame.
pub const TARGET_ADDRESS: Address = 0x10;
pub const FRAME_RATE: u8 = 60;

#[derive(Clone, Debug)]
pub struct DeviceConfig {
    pub target_address: Address,
    pub frame_rate: u8,
    pub negotiation: NegotiationConfig,
}

impl DeviceConfig {
    pub fn frame_period(&self) -> Duration {
        Duration::from_secs(1) / self.frame_rate.max(1) as u32
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            target_address: TARGET_ADDRESS,
            frame_rate: FRAME_RATE,
            negotiation: NegotiationConfig::default(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct NegotiationConfig {
    /// how long a listening device waits to be probed before it gives the address up.
    pub listen_timeout: Duration,
    /// probe-then-listen rounds before negotiation fails. zero fails immediately.
    pub max_attempts: u32,
    /// upper bound of the random pause between rounds.
    pub max_backoff: Duration,
}

impl Default for NegotiationConfig {
    fn default() -> Self {
        Self {
            listen_timeout: Duration::from_secs(10),
            max_attempts: 3,
            max_backoff: Duration::from_millis(250),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_period() {
        let config = DeviceConfig::default();
        assert_eq!(config.frame_period(), Duration::from_secs(1) / 60);
        let config = DeviceConfig {
            frame_rate: 0,
            ..Default::default()
        };
        assert_eq!(config.frame_period(), Duration::from_secs(1));
    }
}
