use clap::{Parser, ValueEnum};
use std::time::Duration;
use thiserror::Error;

// CLI argument structure
#[derive(Parser, Debug, Clone)]
#[command(name = "ping-gateway")]
#[command(about = "Ping service with per-client token bucket rate limiting")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, default_value_t = 8080)]
    pub port: u16,

    // Burst size - max tokens per bucket
    #[arg(short, long, default_value_t = 3)]
    pub capacity: u32,

    // Tokens added per second
    #[arg(short, long, default_value_t = 1.0)]
    pub refill_rate: f64,

    // Seconds without traffic before a client is evicted
    #[arg(long, default_value_t = 180)]
    pub idle_threshold: u64,

    // Seconds between eviction sweeps
    #[arg(long, default_value_t = 60)]
    pub sweep_interval: u64,

    // per-client: one bucket per peer IP, global: one shared bucket
    #[arg(long, value_enum, default_value_t = LimitScope::PerClient)]
    pub scope: LimitScope,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LimitScope {
    #[default]
    PerClient,
    Global,
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("capacity must be at least 1")]
    ZeroCapacity,

    #[error("refill rate must be a positive finite number, got {0}")]
    InvalidRefillRate(f64),

    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),
}

// Limiter settings, fixed at startup
#[derive(Debug, Clone, PartialEq)]
pub struct LimiterConfig {
    pub capacity: u32,
    pub refill_rate: f64,
    pub idle_threshold: Duration,
    pub sweep_interval: Duration,
    pub scope: LimitScope,
}

impl Default for LimiterConfig {
    fn default() -> Self {
        Self {
            capacity: 3,
            refill_rate: 1.0,
            idle_threshold: Duration::from_secs(3 * 60),
            sweep_interval: Duration::from_secs(60),
            scope: LimitScope::PerClient,
        }
    }
}

impl LimiterConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if !self.refill_rate.is_finite() || self.refill_rate <= 0.0 {
            return Err(ConfigError::InvalidRefillRate(self.refill_rate));
        }
        if self.idle_threshold.is_zero() {
            return Err(ConfigError::ZeroDuration("idle threshold"));
        }
        if self.sweep_interval.is_zero() {
            return Err(ConfigError::ZeroDuration("sweep interval"));
        }
        Ok(())
    }
}

impl TryFrom<&Args> for LimiterConfig {
    type Error = ConfigError;

    fn try_from(args: &Args) -> Result<Self, Self::Error> {
        let config = Self {
            capacity: args.capacity,
            refill_rate: args.refill_rate,
            idle_threshold: Duration::from_secs(args.idle_threshold),
            sweep_interval: Duration::from_secs(args.sweep_interval),
            scope: args.scope,
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_cli_defaults() {
        let args = Args::parse_from(["ping-gateway"]);
        let config = LimiterConfig::try_from(&args).unwrap();
        assert_eq!(config, LimiterConfig::default());
        assert_eq!(args.port, 8080);
    }

    #[test]
    fn parses_global_scope() {
        let args = Args::parse_from(["ping-gateway", "--scope", "global", "-c", "4", "-r", "2"]);
        let config = LimiterConfig::try_from(&args).unwrap();
        assert_eq!(config.scope, LimitScope::Global);
        assert_eq!(config.capacity, 4);
        assert_eq!(config.refill_rate, 2.0);
    }

    #[test]
    fn rejects_bad_values() {
        let zero_cap = LimiterConfig { capacity: 0, ..Default::default() };
        assert_eq!(zero_cap.validate(), Err(ConfigError::ZeroCapacity));

        let bad_rate = LimiterConfig { refill_rate: -1.0, ..Default::default() };
        assert_eq!(bad_rate.validate(), Err(ConfigError::InvalidRefillRate(-1.0)));

        let nan_rate = LimiterConfig { refill_rate: f64::NAN, ..Default::default() };
        assert!(matches!(nan_rate.validate(), Err(ConfigError::InvalidRefillRate(_))));

        let zero_sweep = LimiterConfig { sweep_interval: Duration::ZERO, ..Default::default() };
        assert_eq!(zero_sweep.validate(), Err(ConfigError::ZeroDuration("sweep interval")));
    }
}
