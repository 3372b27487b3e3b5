//! Provider implementation backed by a local point catalog and a configured position.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use ecopunto_core::{
    model::{LocationFix, Point},
    plugin::ProviderPlugin,
    ports::{CatalogPort, LocateError, LocationPort, PortError},
};

const BUILTIN_CATALOG: &str = include_str!("../catalog/default.toml");

/// Top-level layout of a catalog file: a list of `[[points]]` tables.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    points: Vec<Point>,
}

/// Catalog read from a TOML file on disk.
pub struct TomlCatalog {
    path: PathBuf,
}

impl TomlCatalog {
    /// Create a catalog reading from `path` on every load.
    #[must_use]
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CatalogPort for TomlCatalog {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn load(&self) -> Result<Vec<Point>, PortError> {
        let raw = tokio::fs::read_to_string(&self.path).await?;
        let points = parse_catalog(&raw)?;
        tracing::info!(path = %self.path.display(), count = points.len(), "catalog loaded");
        Ok(points)
    }
}

/// Catalog compiled into the binary.
pub struct BuiltinCatalog;

#[async_trait]
impl CatalogPort for BuiltinCatalog {
    fn describe(&self) -> String {
        "built-in catalog".to_owned()
    }

    async fn load(&self) -> Result<Vec<Point>, PortError> {
        parse_catalog(BUILTIN_CATALOG)
    }
}

/// Location provider answering with a configured position.
pub struct FixedLocation {
    latitude: f64,
    longitude: f64,
}

impl FixedLocation {
    /// Create a provider reporting the given coordinates.
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

#[async_trait]
impl LocationPort for FixedLocation {
    async fn locate(&self) -> Result<LocationFix, LocateError> {
        let valid = (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude);
        if !valid {
            return Err(LocateError::Unavailable(format!(
                "configured position {}, {} is out of range",
                self.latitude, self.longitude
            )));
        }
        Ok(LocationFix::now(self.latitude, self.longitude))
    }
}

/// Location provider for a user who refused the permission.
pub struct DeniedLocation;

#[async_trait]
impl LocationPort for DeniedLocation {
    async fn locate(&self) -> Result<LocationFix, LocateError> {
        Err(LocateError::PermissionDenied)
    }
}

#[derive(Debug, Clone, Default)]
/// Options for [`plugin`].
pub struct LocalOptions {
    /// Catalog file; the built-in catalog is used when absent.
    pub catalog_path: Option<PathBuf>,
    /// Latitude reported by the location provider.
    pub latitude: f64,
    /// Longitude reported by the location provider.
    pub longitude: f64,
    /// Simulate a refused location permission.
    pub location_denied: bool,
}

/// Build the plugin bundle for the local provider.
#[must_use]
pub fn plugin(options: &LocalOptions) -> ProviderPlugin {
    let catalog: Arc<dyn CatalogPort> = match &options.catalog_path {
        Some(path) => Arc::new(TomlCatalog::new(path.clone())),
        None => Arc::new(BuiltinCatalog),
    };
    let location: Arc<dyn LocationPort> = if options.location_denied {
        Arc::new(DeniedLocation)
    } else {
        Arc::new(FixedLocation::new(options.latitude, options.longitude))
    };

    ProviderPlugin::new("local", catalog, location)
}

/// Parse catalog text, rejecting repeated point ids.
fn parse_catalog(raw: &str) -> Result<Vec<Point>, PortError> {
    let file: CatalogFile =
        toml::from_str(raw).map_err(|err| PortError::Parse(err.to_string()))?;

    let mut seen = HashSet::new();
    for point in &file.points {
        if !seen.insert(&point.id) {
            return Err(PortError::DuplicatePoint(point.id.clone()));
        }
    }

    Ok(file.points)
}
