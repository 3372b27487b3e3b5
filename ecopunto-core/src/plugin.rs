//! Bundle of the ports a front end needs to run.

use std::sync::Arc;

use crate::ports::{CatalogPort, LocationPort};

/// Collection of ports implementing a provider.
pub struct ProviderPlugin {
    /// Display name of the provider.
    pub name: String,
    /// Implementation for loading drop-off points.
    pub catalog: Arc<dyn CatalogPort>,
    /// Implementation for acquiring the user's position.
    pub location: Arc<dyn LocationPort>,
}

impl ProviderPlugin {
    /// Bundle the given ports under a name.
    #[must_use]
    pub fn new<N: Into<String>>(
        name: N,
        catalog: Arc<dyn CatalogPort>,
        location: Arc<dyn LocationPort>,
    ) -> Self {
        Self {
            name: name.into(),
            catalog,
            location,
        }
    }
}
