//! Network quality monitoring and tier classification.
//!
//! The host environment may expose a network-information signal (effective
//! connection type, downlink bandwidth, round-trip time, save-data flag).
//! This module samples that signal through the [`NetworkProbe`] capability
//! trait and classifies it into a discrete [`QualityTier`] that drives
//! routing strategy and the tracker's poll cadence.
//!
//! # Design
//!
//! - [`NetworkProbe`] abstracts the host signal so classification can be
//!   tested without a real device. [`SystemProbe`] is the host-backed
//!   implementation; [`FixedProbe`] is the deterministic double.
//! - Classification is a pure function of the sampled snapshot: identical
//!   snapshots always classify identically.
//! - A host with no network-information signal at all is not an error;
//!   the monitor degrades to the safe middle tier ([`QualityTier::Medium`]).

use std::str::FromStr;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::watch;
use tracing::debug;

/// Downlink threshold (Mbps) above which a 4g connection counts as fast.
pub const FAST_DOWNLINK_MBPS: f64 = 10.0;

/// Effective connection type as reported by the host environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectiveType {
    /// Slowest bucket, high-latency 2g.
    Slow2g,
    /// 2g-class connection.
    TwoG,
    /// 3g-class connection.
    ThreeG,
    /// 4g-class connection.
    FourG,
}

impl EffectiveType {
    /// String form matching the host signal's vocabulary.
    pub fn as_str(&self) -> &'static str {
        match self {
            EffectiveType::Slow2g => "slow-2g",
            EffectiveType::TwoG => "2g",
            EffectiveType::ThreeG => "3g",
            EffectiveType::FourG => "4g",
        }
    }
}

impl FromStr for EffectiveType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "slow-2g" => Ok(EffectiveType::Slow2g),
            "2g" => Ok(EffectiveType::TwoG),
            "3g" => Ok(EffectiveType::ThreeG),
            "4g" => Ok(EffectiveType::FourG),
            other => Err(format!("unknown effective connection type: {other}")),
        }
    }
}

impl std::fmt::Display for EffectiveType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A point-in-time snapshot of the host's network-information signal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectionInfo {
    /// Effective connection type.
    pub effective_type: EffectiveType,
    /// Estimated downlink bandwidth in Mbps.
    pub downlink_mbps: f64,
    /// Estimated round-trip time in milliseconds.
    pub rtt_ms: u32,
    /// Whether the user has requested reduced data usage.
    pub save_data: bool,
}

impl ConnectionInfo {
    /// Create a snapshot with the given type and downlink; rtt and
    /// save-data default to zero/false.
    pub fn new(effective_type: EffectiveType, downlink_mbps: f64) -> Self {
        Self {
            effective_type,
            downlink_mbps,
            rtt_ms: 0,
            save_data: false,
        }
    }
}

/// Discrete network quality tier derived from a connection snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityTier {
    /// 4g with downlink above [`FAST_DOWNLINK_MBPS`].
    Fast,
    /// 4g or 3g, or no signal available (safe middle default).
    Medium,
    /// 2g, slow-2g, or low downlink.
    Slow,
    /// The environment reports offline.
    Offline,
}

impl QualityTier {
    /// Short display form.
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityTier::Fast => "fast",
            QualityTier::Medium => "medium",
            QualityTier::Slow => "slow",
            QualityTier::Offline => "offline",
        }
    }
}

impl FromStr for QualityTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fast" => Ok(QualityTier::Fast),
            "medium" => Ok(QualityTier::Medium),
            "slow" => Ok(QualityTier::Slow),
            "offline" => Ok(QualityTier::Offline),
            other => Err(format!("unknown quality tier: {other}")),
        }
    }
}

impl std::fmt::Display for QualityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classify a connection snapshot into a quality tier.
///
/// Evaluated in order, first match wins:
/// 1. offline → [`QualityTier::Offline`]
/// 2. no signal → [`QualityTier::Medium`]
/// 3. 4g with downlink above [`FAST_DOWNLINK_MBPS`] → [`QualityTier::Fast`]
/// 4. 4g or 3g → [`QualityTier::Medium`]
/// 5. otherwise → [`QualityTier::Slow`]
pub fn classify_tier(online: bool, info: Option<&ConnectionInfo>) -> QualityTier {
    if !online {
        return QualityTier::Offline;
    }
    let Some(info) = info else {
        return QualityTier::Medium;
    };
    match info.effective_type {
        EffectiveType::FourG if info.downlink_mbps > FAST_DOWNLINK_MBPS => QualityTier::Fast,
        EffectiveType::FourG | EffectiveType::ThreeG => QualityTier::Medium,
        EffectiveType::TwoG | EffectiveType::Slow2g => QualityTier::Slow,
    }
}

/// Capability trait for sampling the host's network state.
///
/// Abstracting the host signal allows classification and the tracker's
/// interval selection to be tested with a deterministic double.
pub trait NetworkProbe: Send + Sync {
    /// Whether the environment currently reports being online.
    fn is_online(&self) -> bool;

    /// The current network-information snapshot, if the host exposes one.
    fn connection_info(&self) -> Option<ConnectionInfo>;
}

/// Host-backed probe.
///
/// Desktop hosts expose no network-information signal, so this probe
/// reports online with no snapshot and the monitor degrades to the
/// medium tier. An embedding application with a richer host signal
/// supplies its own [`NetworkProbe`] instead.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemProbe;

impl NetworkProbe for SystemProbe {
    fn is_online(&self) -> bool {
        true
    }

    fn connection_info(&self) -> Option<ConnectionInfo> {
        None
    }
}

/// Deterministic probe for tests and simulation.
#[derive(Debug, Clone)]
pub struct FixedProbe {
    online: bool,
    info: Option<ConnectionInfo>,
}

impl FixedProbe {
    /// An online probe reporting the given snapshot.
    pub fn online(info: ConnectionInfo) -> Self {
        Self {
            online: true,
            info: Some(info),
        }
    }

    /// An online probe with no network-information signal.
    pub fn no_signal() -> Self {
        Self {
            online: true,
            info: None,
        }
    }

    /// An offline probe.
    pub fn offline() -> Self {
        Self {
            online: false,
            info: None,
        }
    }
}

impl NetworkProbe for FixedProbe {
    fn is_online(&self) -> bool {
        self.online
    }

    fn connection_info(&self) -> Option<ConnectionInfo> {
        self.info
    }
}

/// Last-sampled network state.
#[derive(Debug, Clone)]
struct Sampled {
    online: bool,
    info: Option<ConnectionInfo>,
}

/// Monitors the host's network quality signal.
///
/// Holds the last sampled snapshot and republishes tier changes on a
/// watch channel. [`refresh`](NetworkQualityMonitor::refresh) is called
/// on every environment change notification; its only side effects are
/// updating the cached snapshot and notifying subscribers.
pub struct NetworkQualityMonitor {
    probe: Arc<dyn NetworkProbe>,
    snapshot: RwLock<Sampled>,
    tier_tx: watch::Sender<QualityTier>,
}

impl NetworkQualityMonitor {
    /// Create a monitor over the given probe, sampling it once.
    pub fn new(probe: Arc<dyn NetworkProbe>) -> Self {
        let sampled = Sampled {
            online: probe.is_online(),
            info: probe.connection_info(),
        };
        let tier = classify_tier(sampled.online, sampled.info.as_ref());
        let (tier_tx, _) = watch::channel(tier);
        Self {
            probe,
            snapshot: RwLock::new(sampled),
            tier_tx,
        }
    }

    /// Re-sample the probe and notify subscribers if the tier changed.
    ///
    /// Returns the freshly classified tier.
    pub fn refresh(&self) -> QualityTier {
        let sampled = Sampled {
            online: self.probe.is_online(),
            info: self.probe.connection_info(),
        };
        let tier = classify_tier(sampled.online, sampled.info.as_ref());
        *self.snapshot.write() = sampled;

        self.tier_tx.send_if_modified(|current| {
            if *current != tier {
                debug!(from = %current, to = %tier, "network quality tier changed");
                *current = tier;
                true
            } else {
                false
            }
        });
        tier
    }

    /// The current quality tier. Never fails: a missing host signal
    /// classifies as [`QualityTier::Medium`].
    pub fn current_tier(&self) -> QualityTier {
        let s = self.snapshot.read();
        classify_tier(s.online, s.info.as_ref())
    }

    /// The current tier, or `None` if the host exposes no
    /// network-information signal at all.
    ///
    /// Offline is a signal, not an absence: an offline environment
    /// returns `Some(QualityTier::Offline)`.
    pub fn signal(&self) -> Option<QualityTier> {
        let s = self.snapshot.read();
        if !s.online {
            return Some(QualityTier::Offline);
        }
        s.info.as_ref().map(|info| classify_tier(true, Some(info)))
    }

    /// The last sampled connection snapshot, if any.
    pub fn connection_info(&self) -> Option<ConnectionInfo> {
        self.snapshot.read().info
    }

    /// Subscribe to tier change notifications.
    pub fn subscribe(&self) -> watch::Receiver<QualityTier> {
        self.tier_tx.subscribe()
    }
}
