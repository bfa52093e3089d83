//! Provider implementation for Spain using the MINETUR `PreciosCarburantes` REST API.

/// Connection settings and environment overrides.
pub mod config;

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use carburo_core::{
    model::{FuelType, FuelTypeId, Municipality, MunicipalityId, Province, ProvinceId, Station, parse_price},
    plugin::{ProviderMeta, ProviderPlugin},
    ports::{CatalogPort, PortError, StationPort},
};

pub use config::MineturConfig;

/// Entry of /Listados/Provincias/
#[derive(Debug, Deserialize)]
struct ProvinceEntry {
    // sic: the service spells it "Povincia"
    #[serde(rename = "IDPovincia")]
    id: String,
    #[serde(rename = "Provincia")]
    name: String,
}

/// Entry of /Listados/MunicipiosPorProvincia/{provinceId}
#[derive(Debug, Deserialize)]
struct MunicipalityEntry {
    #[serde(rename = "IDMunicipio")]
    id: String,
    #[serde(rename = "IDProvincia")]
    province_id: String,
    #[serde(rename = "Municipio")]
    name: String,
}

/// Entry of /Listados/ProductosPetroliferos/
#[derive(Debug, Deserialize)]
struct ProductEntry {
    #[serde(rename = "IDProducto")]
    id: String,
    #[serde(rename = "NombreProducto")]
    name: String,
}

/// Response of /EstacionesTerrestres/FiltroMunicipioProducto/{municipalityId}/{productId}
#[derive(Debug, Deserialize)]
struct StationsResponse {
    #[serde(rename = "ListaEESSPrecio", default)]
    stations: Option<Vec<StationEntry>>,
    // Fecha, Nota and ResultadoConsulta are not needed
}

/// Single station inside `ListaEESSPrecio`.
#[derive(Debug, Deserialize)]
struct StationEntry {
    #[serde(rename = "Dirección", default)]
    address: String,
    #[serde(rename = "Localidad", default)]
    locality: String,
    #[serde(rename = "Provincia", default)]
    province: String,
    #[serde(rename = "Horario", default)]
    schedule: String,
    #[serde(rename = "PrecioProducto", default)]
    price: String,
    #[serde(rename = "Rótulo", default)]
    brand: Option<String>,
    #[serde(rename = "C.P.", default)]
    postal_code: Option<String>,
}

impl From<StationEntry> for Station {
    fn from(entry: StationEntry) -> Self {
        Self {
            price: parse_price(&entry.price),
            address: entry.address,
            locality: entry.locality,
            province: entry.province,
            schedule: entry.schedule,
            price_text: entry.price,
            brand: non_empty(entry.brand),
            postal_code: non_empty(entry.postal_code),
        }
    }
}

/// Province, municipality, and product catalogs.
pub struct MineturCatalogPort {
    client: Client,
    base_url: String,
}

impl MineturCatalogPort {
    /// Create a new catalog port bound to the given HTTP client.
    #[must_use]
    pub fn new(client: Client, config: &MineturConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
        }
    }
}

#[async_trait]
impl CatalogPort for MineturCatalogPort {
    async fn provinces(&self) -> Result<Vec<Province>, PortError> {
        let entries =
            fetch_json::<Vec<ProvinceEntry>>(self.client.get(provinces_url(&self.base_url))).await?;

        Ok(entries
            .into_iter()
            .map(|entry| Province {
                id: ProvinceId(entry.id),
                name: entry.name,
            })
            .collect())
    }

    async fn municipalities(&self, province: &ProvinceId) -> Result<Vec<Municipality>, PortError> {
        let url = municipalities_url(&self.base_url, province);
        let entries = fetch_json::<Vec<MunicipalityEntry>>(self.client.get(url)).await?;

        Ok(entries
            .into_iter()
            .map(|entry| Municipality {
                id: MunicipalityId(entry.id),
                province: ProvinceId(entry.province_id),
                name: entry.name,
            })
            .collect())
    }

    async fn fuel_types(&self) -> Result<Vec<FuelType>, PortError> {
        let entries =
            fetch_json::<Vec<ProductEntry>>(self.client.get(fuel_types_url(&self.base_url))).await?;

        Ok(entries
            .into_iter()
            .map(|entry| FuelType {
                id: FuelTypeId(entry.id),
                name: entry.name,
            })
            .collect())
    }
}

/// Station listing with prices for one product.
pub struct MineturStationPort {
    client: Client,
    base_url: String,
}

impl MineturStationPort {
    /// Create a new station port bound to the given HTTP client.
    #[must_use]
    pub fn new(client: Client, config: &MineturConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
        }
    }
}

#[async_trait]
impl StationPort for MineturStationPort {
    async fn stations(
        &self,
        municipality: &MunicipalityId,
        fuel_type: &FuelTypeId,
    ) -> Result<Vec<Station>, PortError> {
        let url = stations_url(&self.base_url, municipality, fuel_type);
        let response = fetch_json::<StationsResponse>(self.client.get(url)).await?;

        // A missing or null list means "no stations", not a failure.
        Ok(response
            .stations
            .unwrap_or_default()
            .into_iter()
            .map(Station::from)
            .collect())
    }
}

/// Build the plugin bundle for the MINETUR provider.
#[must_use]
pub fn plugin(client: Client, config: &MineturConfig) -> ProviderPlugin {
    let catalog_port = Arc::new(MineturCatalogPort::new(client.clone(), config));
    let station_port = Arc::new(MineturStationPort::new(client, config));

    ProviderPlugin {
        meta: provider_meta(),
        catalog_port,
        station_port,
    }
}

fn provider_meta() -> ProviderMeta {
    ProviderMeta {
        id: String::from("minetur"),
        name: String::from("Ministerio para la Transición Ecológica"),
    }
}

fn provinces_url(base_url: &str) -> String {
    format!("{base_url}/Listados/Provincias/")
}

fn municipalities_url(base_url: &str, province: &ProvinceId) -> String {
    format!("{base_url}/Listados/MunicipiosPorProvincia/{province}")
}

fn fuel_types_url(base_url: &str) -> String {
    format!("{base_url}/Listados/ProductosPetroliferos/")
}

fn stations_url(base_url: &str, municipality: &MunicipalityId, fuel_type: &FuelTypeId) -> String {
    format!("{base_url}/EstacionesTerrestres/FiltroMunicipioProducto/{municipality}/{fuel_type}")
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}

// Small helper to fetch and decode JSON with status handling.
async fn fetch_json<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, PortError> {
    let response = req
        .send()
        .await
        .map_err(PortError::from)?
        .error_for_status()
        .map_err(PortError::from)?;

    debug!(url = %response.url(), status = %response.status(), "response received");

    response.json().await.map_err(|err| {
        warn!("failed to decode response: {err}");
        if err.is_decode() {
            PortError::Decode(err.to_string())
        } else {
            PortError::from(err)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://example.test/PreciosCarburantes";

    #[test]
    fn urls_follow_the_service_layout() {
        assert_eq!(
            provinces_url(BASE),
            "https://example.test/PreciosCarburantes/Listados/Provincias/",
            "provinces"
        );
        assert_eq!(
            municipalities_url(BASE, &ProvinceId("28".to_owned())),
            "https://example.test/PreciosCarburantes/Listados/MunicipiosPorProvincia/28",
            "municipalities"
        );
        assert_eq!(
            fuel_types_url(BASE),
            "https://example.test/PreciosCarburantes/Listados/ProductosPetroliferos/",
            "fuel types"
        );
        assert_eq!(
            stations_url(BASE, &MunicipalityId("4354".to_owned()), &FuelTypeId("1".to_owned())),
            "https://example.test/PreciosCarburantes/EstacionesTerrestres/FiltroMunicipioProducto/4354/1",
            "stations"
        );
    }

    #[test]
    fn decodes_catalog_entries() {
        let provinces: Vec<ProvinceEntry> = serde_json::from_str(
            r#"[{"IDPovincia":"28","IDCCAA":"13","Provincia":"MADRID","CCAA":"Madrid"}]"#,
        )
        .expect("provinces decode");
        let province = provinces.first().expect("one province");
        assert_eq!((province.id.as_str(), province.name.as_str()), ("28", "MADRID"), "province");

        let municipalities: Vec<MunicipalityEntry> = serde_json::from_str(
            r#"[{"IDMunicipio":"4354","IDProvincia":"28","IDCCAA":"13","Municipio":"Madrid","Provincia":"MADRID","CCAA":"Madrid"}]"#,
        )
        .expect("municipalities decode");
        let municipality = municipalities.first().expect("one municipality");
        assert_eq!(municipality.province_id, "28", "province id carried");

        let products: Vec<ProductEntry> = serde_json::from_str(
            r#"[{"IDProducto":"1","NombreProducto":"Gasolina 95 E5","NombreProductoAbreviatura":"G95E5"}]"#,
        )
        .expect("products decode");
        assert_eq!(
            products.first().map(|product| product.name.as_str()),
            Some("Gasolina 95 E5"),
            "product name"
        );
    }

    #[test]
    fn decodes_station_listing() {
        let body = r#"{
            "Fecha": "16/10/2026 9:30:12",
            "ListaEESSPrecio": [{
                "C.P.": "28013",
                "Dirección": "CALLE MAYOR, 1",
                "Horario": "L-V: 07:00-22:00; S-D: 08:00-15:00",
                "Latitud": "40,416775",
                "Localidad": "MADRID",
                "Longitud (WGS84)": "-3,703790",
                "Margen": "D",
                "Municipio": "Madrid",
                "PrecioProducto": "1,559",
                "Provincia": "MADRID",
                "Remisión": "dm",
                "Rótulo": "REPSOL",
                "Tipo Venta": "P",
                "IDEESS": "4375",
                "IDMunicipio": "4354",
                "IDProvincia": "28",
                "IDCCAA": "13"
            }],
            "Nota": "Archivo de todos los productos en todas las estaciones de servicio.",
            "ResultadoConsulta": "OK"
        }"#;

        let response: StationsResponse = serde_json::from_str(body).expect("listing decodes");
        let stations = response
            .stations
            .unwrap_or_default()
            .into_iter()
            .map(Station::from)
            .collect::<Vec<_>>();

        let station = stations.first().expect("one station");
        assert_eq!(station.address, "CALLE MAYOR, 1", "address");
        assert_eq!(station.schedule, "L-V: 07:00-22:00; S-D: 08:00-15:00", "schedule verbatim");
        assert_eq!(station.price_text, "1,559", "price text");
        assert_eq!(station.price, Some(1.559), "price parsed");
        assert_eq!(station.brand.as_deref(), Some("REPSOL"), "brand");
        assert_eq!(station.postal_code.as_deref(), Some("28013"), "postal code");
    }

    #[test]
    fn null_or_missing_listing_is_empty() {
        let null_list: StationsResponse =
            serde_json::from_str(r#"{"ListaEESSPrecio": null, "ResultadoConsulta": "OK"}"#)
                .expect("null decodes");
        assert!(null_list.stations.unwrap_or_default().is_empty(), "null list");

        let missing: StationsResponse =
            serde_json::from_str(r#"{"ResultadoConsulta": "OK"}"#).expect("missing decodes");
        assert!(missing.stations.is_none(), "missing list");
    }

    #[test]
    fn blank_brand_is_dropped() {
        let entry: StationEntry = serde_json::from_str(
            r#"{"Dirección":"X","Localidad":"Y","Provincia":"Z","Horario":"L-D: 24H","PrecioProducto":"","Rótulo":"  "}"#,
        )
        .expect("entry decodes");
        let station = Station::from(entry);
        assert_eq!(station.brand, None, "blank brand");
        assert_eq!(station.price, None, "no price");
    }

    #[test]
    fn plugin_bundle_carries_provider_meta() {
        let config = MineturConfig {
            base_url: BASE.to_owned(),
            ..MineturConfig::default()
        };
        let plugin = plugin(Client::new(), &config);
        assert_eq!(plugin.meta.id, "minetur", "provider id");
    }
}
