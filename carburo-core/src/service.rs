//! High-level service facade over the provider ports.

use tracing::{debug, info};

use crate::model::{FuelType, Municipality, Province, ProvinceId, Station};
use crate::plugin::{ProviderMeta, ProviderPlugin};
use crate::ports::PortError;
use crate::render::{RenderOptions, RenderedList, render};
use crate::schedule::WeekInstant;
use crate::selection::StationQuery;

/// Public entry point for catalogs and station listings.
pub struct CarburoService {
    plugin: ProviderPlugin,
}

impl CarburoService {
    /// Create a new service bound to the provided backend.
    #[must_use]
    pub fn new(plugin: ProviderPlugin) -> Self {
        Self { plugin }
    }

    /// Metadata of the backend in use.
    #[must_use]
    pub fn provider(&self) -> &ProviderMeta {
        &self.plugin.meta
    }

    /// List all provinces.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if the provider call fails.
    pub async fn provinces(&self) -> Result<Vec<Province>, PortError> {
        let provinces = self.plugin.catalog_port.provinces().await?;
        debug!(count = provinces.len(), "loaded provinces");
        Ok(provinces)
    }

    /// List the municipalities of a province.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if the provider call fails.
    pub async fn municipalities(&self, province: &ProvinceId) -> Result<Vec<Municipality>, PortError> {
        let municipalities = self.plugin.catalog_port.municipalities(province).await?;
        debug!(%province, count = municipalities.len(), "loaded municipalities");
        Ok(municipalities)
    }

    /// List fuel products.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if the provider call fails.
    pub async fn fuel_types(&self) -> Result<Vec<FuelType>, PortError> {
        let fuel_types = self.plugin.catalog_port.fuel_types().await?;
        debug!(count = fuel_types.len(), "loaded fuel types");
        Ok(fuel_types)
    }

    /// Fetch the raw station listing for a query.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if the provider call fails.
    pub async fn stations(&self, query: &StationQuery) -> Result<Vec<Station>, PortError> {
        info!(
            municipality = %query.municipality,
            fuel_type = %query.fuel_type,
            "querying stations"
        );
        self.plugin
            .station_port
            .stations(&query.municipality, &query.fuel_type)
            .await
    }

    /// Fetch stations for a query and render them, evaluating opening hours at `at`.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if the provider call fails.
    pub async fn listing(&self, query: &StationQuery, at: WeekInstant) -> Result<RenderedList, PortError> {
        let stations = self.stations(query).await?;
        let options = RenderOptions {
            at,
            open_only: query.open_only,
        };
        Ok(render(&stations, &options))
    }
}
