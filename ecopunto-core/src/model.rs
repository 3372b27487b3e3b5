//! Domain data structures for drop-off points, schedule filters, and views.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Material tags offered as filter checkboxes.
pub const KNOWN_MATERIALS: [&str; 6] = [
    "plástico",
    "vidrio",
    "papel",
    "metal",
    "electrónicos",
    "aceite",
];

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
/// Identifier for a drop-off point.
pub struct PointId(pub String);

impl fmt::Display for PointId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Recycling drop-off location shown as a card.
pub struct Point {
    /// Unique identifier.
    pub id: PointId,
    /// Display name.
    pub name: String,
    /// Street address printed on the card.
    #[serde(default)]
    pub address: Option<String>,
    /// Accepted material tags, compared case-insensitively.
    pub materials: Vec<String>,
    /// Free-text opening hours such as "Lun-Vie 8:00-18:00".
    #[serde(rename = "schedule")]
    pub schedule_text: String,
    /// Distance from the last location fix, unknown until one arrives.
    #[serde(skip)]
    pub distance_km: Option<f64>,
}

impl Point {
    /// Construct a point without a known distance.
    #[must_use]
    pub fn new<I, N, S>(id: I, name: N, materials: &[&str], schedule_text: S) -> Self
    where
        I: Into<String>,
        N: Into<String>,
        S: Into<String>,
    {
        Self {
            id: PointId(id.into()),
            name: name.into(),
            address: None,
            materials: materials.iter().map(|&tag| tag.to_owned()).collect(),
            schedule_text: schedule_text.into(),
            distance_km: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
/// Opening-hours categories a user can filter by.
pub enum ScheduleFilter {
    /// Open around the clock.
    AllDay,
    /// Regular business hours.
    Commercial,
    /// Open on Saturday or Sunday.
    Weekends,
    /// Open Monday to Friday.
    Weekdays,
    /// Tag that no predicate knows about; never matches.
    Other(String),
}

impl ScheduleFilter {
    /// The four categories offered as checkboxes.
    pub const KNOWN: [Self; 4] = [
        Self::AllDay,
        Self::Commercial,
        Self::Weekends,
        Self::Weekdays,
    ];

    /// Human-friendly checkbox label.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::AllDay => "24 hours",
            Self::Commercial => "Business hours",
            Self::Weekends => "Weekends",
            Self::Weekdays => "Monday to Friday",
            Self::Other(tag) => tag.as_str(),
        }
    }
}

impl fmt::Display for ScheduleFilter {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slug = match self {
            Self::AllDay => "24h",
            Self::Commercial => "comercial",
            Self::Weekends => "fines",
            Self::Weekdays => "semana",
            Self::Other(tag) => tag.as_str(),
        };
        write!(formatter, "{slug}")
    }
}

impl From<&str> for ScheduleFilter {
    fn from(tag: &str) -> Self {
        match tag {
            "24h" => Self::AllDay,
            "comercial" => Self::Commercial,
            "fines" => Self::Weekends,
            "semana" => Self::Weekdays,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl FromStr for ScheduleFilter {
    type Err = Infallible;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(tag))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Layout of the point cards.
pub enum ViewMode {
    /// One card per row.
    #[default]
    List,
    /// Cards arranged in columns.
    Grid,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
/// Position reported by a location provider.
pub struct LocationFix {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// When the provider produced the fix.
    pub acquired_at: DateTime<Local>,
}

impl LocationFix {
    /// Fix taken at the current local time.
    #[must_use]
    pub fn now(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            acquired_at: Local::now(),
        }
    }
}
