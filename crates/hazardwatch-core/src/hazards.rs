//! Pass-through records for the earthquake, alert, and X-ray flux feeds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A USGS catalog event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Earthquake {
    pub id: String,
    pub mag: Option<f64>,
    pub place: Option<String>,
    /// Origin time, unix milliseconds.
    pub time: Option<i64>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    /// Hypocenter depth in km.
    pub depth: Option<f64>,
}

/// An active NWS alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherAlert {
    pub event: Option<String>,
    pub area: Option<String>,
    /// RFC 3339 effective (or sent) time as published.
    pub time: Option<String>,
}

/// One GOES X-ray flux reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlareReading {
    pub id: String,
    /// Flux in W/m².
    pub flux: Option<f64>,
    pub time: Option<String>,
}

/// Solar flare class derived from peak X-ray flux.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FluxClass {
    A,
    B,
    C,
    M,
    X,
}

impl FluxClass {
    /// Classifies a flux in W/m². Returns `None` for non-finite input.
    #[must_use]
    pub fn from_flux(flux: f64) -> Option<Self> {
        if !flux.is_finite() {
            return None;
        }
        Some(if flux >= 1e-4 {
            Self::X
        } else if flux >= 1e-5 {
            Self::M
        } else if flux >= 1e-6 {
            Self::C
        } else if flux >= 1e-7 {
            Self::B
        } else {
            Self::A
        })
    }
}

impl fmt::Display for FluxClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::M => "M",
            Self::X => "X",
        };
        write!(f, "{letter}-class")
    }
}

/// Look-back window for the earthquake catalog query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QuakeWindow {
    Hour,
    #[default]
    Day,
    Week,
}

impl QuakeWindow {
    #[must_use]
    pub fn hours(self) -> i64 {
        match self {
            Self::Hour => 1,
            Self::Day => 24,
            Self::Week => 24 * 7,
        }
    }
}

impl fmt::Display for QuakeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hour => write!(f, "hour"),
            Self::Day => write!(f, "day"),
            Self::Week => write!(f, "week"),
        }
    }
}

impl FromStr for QuakeWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hour" => Ok(Self::Hour),
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            other => Err(format!("unknown window '{other}' (expected hour, day, or week)")),
        }
    }
}
