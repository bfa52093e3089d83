//! Traits describing provider capabilities and shared error type.

use async_trait::async_trait;
use reqwest::Error as ReqwestError;

use crate::model::{FuelType, FuelTypeId, Municipality, MunicipalityId, Province, ProvinceId, Station};

#[derive(thiserror::Error, Debug)]
/// Errors that can occur while talking to provider backends.
pub enum PortError {
    /// Network layer failed, or the server answered with an error status.
    #[error("Network error: {0}")]
    Network(#[from] ReqwestError),
    /// The response body did not have the expected shape.
    #[error("Unexpected response: {0}")]
    Decode(String),
    /// Internal provider error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[async_trait]
/// Geography and product catalogs.
pub trait CatalogPort: Send + Sync {
    /// List all provinces.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the provider request fails.
    async fn provinces(&self) -> Result<Vec<Province>, PortError>;

    /// List the municipalities of a province.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the provider request fails.
    async fn municipalities(&self, province: &ProvinceId) -> Result<Vec<Municipality>, PortError>;

    /// List the fuel products that prices are reported for.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the provider request fails.
    async fn fuel_types(&self) -> Result<Vec<FuelType>, PortError>;
}

#[async_trait]
/// Station listings with prices.
pub trait StationPort: Send + Sync {
    /// Fetch stations in a municipality selling the given fuel.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the provider request fails.
    async fn stations(
        &self,
        municipality: &MunicipalityId,
        fuel_type: &FuelTypeId,
    ) -> Result<Vec<Station>, PortError>;
}
