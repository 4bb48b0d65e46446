//! Process configuration read from the environment

use std::env;
use std::net::SocketAddr;

use crate::cycle::CycleStrategy;
use crate::error::{Error, Result};
use crate::insights::{InsightProfile, RuleSettings};

pub const DEFAULT_BIND: &str = "0.0.0.0:3050";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub profile: InsightProfile,
    pub rules: RuleSettings,
    pub strategy: CycleStrategy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3050)),
            profile: InsightProfile::default(),
            rules: RuleSettings::default(),
            strategy: CycleStrategy::default(),
        }
    }
}

impl AppConfig {
    /// Read `SAHELI_*` variables from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from any variable source. Unset variables fall back to defaults;
    /// set but unparseable ones are errors.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let bind = lookup("SAHELI_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind_addr: SocketAddr = bind.parse().map_err(|_| Error::InvalidSetting {
            name: "SAHELI_BIND",
            value: bind.clone(),
        })?;

        let profile = match lookup("SAHELI_INSIGHT_PROFILE") {
            Some(value) => value.parse::<InsightProfile>().map_err(|_| Error::InvalidSetting {
                name: "SAHELI_INSIGHT_PROFILE",
                value,
            })?,
            None => InsightProfile::default(),
        };

        let mut rules = profile.settings();
        if let Some(value) = lookup("SAHELI_INSIGHT_WINDOW") {
            rules.window_size = match value.parse::<usize>() {
                Ok(size) if size > 0 => size,
                _ => {
                    return Err(Error::InvalidSetting {
                        name: "SAHELI_INSIGHT_WINDOW",
                        value,
                    })
                }
            };
        }

        let strategy = match lookup("SAHELI_CYCLE_STRATEGY") {
            Some(value) => value.parse::<CycleStrategy>().map_err(|_| Error::InvalidSetting {
                name: "SAHELI_CYCLE_STRATEGY",
                value,
            })?,
            None => CycleStrategy::default(),
        };

        Ok(Self {
            bind_addr,
            profile,
            rules,
            strategy,
        })
    }
}
