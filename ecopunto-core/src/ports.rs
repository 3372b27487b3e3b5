//! Traits describing provider capabilities and their error types.

use async_trait::async_trait;

use crate::model::{LocationFix, Point, PointId};

#[derive(thiserror::Error, Debug)]
/// Errors that can occur while loading the point catalog.
pub enum PortError {
    /// Catalog source could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Catalog content is malformed.
    #[error("Parse error: {0}")]
    Parse(String),
    /// Two catalog entries share an identifier.
    #[error("Duplicate point id: {0}")]
    DuplicatePoint(PointId),
    /// Internal provider error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
/// Errors produced while acquiring the user's position.
pub enum LocateError {
    /// The user refused access to their position.
    #[error("Location permission denied")]
    PermissionDenied,
    /// The provider could not produce a position.
    #[error("Location unavailable: {0}")]
    Unavailable(String),
    /// A lookup is already in flight.
    #[error("A location lookup is already running")]
    Busy,
    /// The pending lookup was cancelled.
    #[error("Location lookup cancelled")]
    Cancelled,
}

#[async_trait]
/// Source of the drop-off points shown to the user.
pub trait CatalogPort: Send + Sync {
    /// Short human-readable description of the source.
    fn describe(&self) -> String;

    /// Load all points in their presentation order.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the source cannot be read or parsed.
    async fn load(&self) -> Result<Vec<Point>, PortError>;
}

#[async_trait]
/// Capability reporting the user's current position.
pub trait LocationPort: Send + Sync {
    /// Acquire a single position fix.
    ///
    /// # Errors
    ///
    /// Returns a [`LocateError`] when permission is refused or no fix is available.
    async fn locate(&self) -> Result<LocationFix, LocateError>;
}
