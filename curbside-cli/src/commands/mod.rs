//! CLI subcommands.

pub mod route;
pub mod track;

use clap::ValueEnum;
use curbside::network::{ConnectionInfo, EffectiveType, FixedProbe};

/// Network condition to simulate.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum NetworkArg {
    /// 4g with high downlink.
    Fast,
    /// 4g with ordinary downlink.
    Medium,
    /// 2g-class connection.
    Slow,
    /// Environment reports offline.
    Offline,
    /// Host exposes no network-information signal.
    NoSignal,
}

impl NetworkArg {
    /// Build the matching probe.
    pub fn probe(self) -> FixedProbe {
        match self {
            NetworkArg::Fast => FixedProbe::online(ConnectionInfo::new(EffectiveType::FourG, 15.0)),
            NetworkArg::Medium => {
                FixedProbe::online(ConnectionInfo::new(EffectiveType::FourG, 5.0))
            }
            NetworkArg::Slow => FixedProbe::online(ConnectionInfo::new(EffectiveType::TwoG, 0.5)),
            NetworkArg::Offline => FixedProbe::offline(),
            NetworkArg::NoSignal => FixedProbe::no_signal(),
        }
    }
}
