//! Domain data structures for provinces, municipalities, fuel types, and stations.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Identifier of a province as issued by the price-reporting service.
pub struct ProvinceId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Identifier of a municipality as issued by the price-reporting service.
pub struct MunicipalityId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Identifier of a fuel product as issued by the price-reporting service.
pub struct FuelTypeId(pub String);

impl fmt::Display for ProvinceId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

impl fmt::Display for MunicipalityId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

impl fmt::Display for FuelTypeId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Province entry of the geography catalog.
pub struct Province {
    /// Unique identifier.
    pub id: ProvinceId,
    /// Display name.
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Municipality entry of the geography catalog.
pub struct Municipality {
    /// Unique identifier.
    pub id: MunicipalityId,
    /// Province the municipality belongs to.
    pub province: ProvinceId,
    /// Display name.
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Fuel product entry of the product catalog.
pub struct FuelType {
    /// Unique identifier.
    pub id: FuelTypeId,
    /// Display name.
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Fuel station as returned by the listing service.
pub struct Station {
    /// Street address.
    pub address: String,
    /// Locality (town or district).
    pub locality: String,
    /// Province display name.
    pub province: String,
    /// Raw opening-hours string, e.g. `L-V: 08:00-22:00`.
    pub schedule: String,
    /// Price text exactly as reported, e.g. `1,459`.
    pub price_text: String,
    /// Parsed price per litre in euros, when the text was a number.
    pub price: Option<f64>,
    /// Brand label (`Rótulo`).
    pub brand: Option<String>,
    /// Postal code.
    pub postal_code: Option<String>,
}

/// Parse a price written with a decimal comma (`1,459`) or point.
///
/// Returns `None` for empty or non-numeric input.
#[must_use]
pub fn parse_price(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|price| price.is_finite())
}
