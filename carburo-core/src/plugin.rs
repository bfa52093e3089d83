//! Bundle of ports implementing one price-reporting backend.

use std::sync::Arc;

use crate::ports::{CatalogPort, StationPort};

#[derive(Debug, Clone)]
/// Static metadata describing a backend.
pub struct ProviderMeta {
    /// Short identifier, e.g. `minetur`.
    pub id: String,
    /// Human-friendly name shown in the UI.
    pub name: String,
}

/// Collection of ports implementing a provider.
pub struct ProviderPlugin {
    /// Static metadata describing the provider.
    pub meta: ProviderMeta,
    /// Implementation of the province, municipality, and fuel catalogs.
    pub catalog_port: Arc<dyn CatalogPort>,
    /// Implementation of the station listing.
    pub station_port: Arc<dyn StationPort>,
}
