//! GPS Source Selection
//!
//! Prefers an external GPS receiver while the telemetry link is up and the
//! fix quality holds, and falls back to an internal platform source when
//! either degrades. Switches back as soon as the external fix recovers.

use serde::{Deserialize, Serialize};
use tracing::info;

/// Fix quality reported by a GPS receiver, from worst to best
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GpsQuality {
    /// No fix at all
    NoSignal,
    /// Fix below 2D accuracy
    Poor,
    /// Two-dimensional fix
    TwoD,
    /// Three-dimensional fix
    ThreeD,
}

/// A location fix
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// One observation from the external receiver
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GpsSample {
    /// Reported fix quality
    pub quality: GpsQuality,
    /// Location, when the receiver produced one
    pub point: Option<GeoPoint>,
}

/// Which source currently provides location data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GpsSource {
    /// External receiver over the telemetry link
    External,
    /// Internal platform source
    Internal,
}

/// Selects between an external GPS receiver and an internal fallback.
///
/// The external receiver is preferred while the telemetry link is connected
/// and its fix quality is at least 2D. Otherwise the internal source runs,
/// when the platform supports one. The internal source is started and
/// stopped only on transitions.
#[derive(Debug)]
pub struct GeoProvider {
    /// Whether the platform has an internal GPS source
    internal_supported: bool,
    /// Whether the internal source is currently running
    internal_active: bool,
    /// Minimum usable external fix quality
    min_quality: GpsQuality,
}

impl GeoProvider {
    /// Create a provider; external fixes below `GpsQuality::TwoD` are unusable
    pub fn new(internal_supported: bool) -> Self {
        Self {
            internal_supported,
            internal_active: false,
            min_quality: GpsQuality::TwoD,
        }
    }

    /// Process one external receiver observation.
    ///
    /// Returns the external location while the link is up and the fix is
    /// usable; otherwise switches to the internal source and returns
    /// nothing. On platforms without an internal source the provider keeps
    /// listening for the external fix to recover.
    pub fn on_sample(&mut self, link_connected: bool, sample: &GpsSample) -> Option<GeoPoint> {
        if link_connected && sample.quality >= self.min_quality {
            if self.internal_active {
                info!("external GPS fix usable, stopping internal source");
                self.internal_active = false;
            }
            sample.point
        } else {
            if self.internal_supported && !self.internal_active {
                info!("external GPS unusable, starting internal source");
                self.internal_active = true;
            }
            None
        }
    }

    /// Which source is currently live
    pub fn active_source(&self) -> GpsSource {
        if self.internal_active {
            GpsSource::Internal
        } else {
            GpsSource::External
        }
    }

    /// Whether the internal source is running
    pub fn internal_active(&self) -> bool {
        self.internal_active
    }

    /// Whether the platform has an internal GPS source
    pub fn internal_supported(&self) -> bool {
        self.internal_supported
    }

    /// Stop the internal source
    pub fn shutdown(&mut self) {
        if self.internal_active {
            info!("shutting down internal GPS source");
            self.internal_active = false;
        }
    }
}
