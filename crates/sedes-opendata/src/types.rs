//! Wire types for the CKAN datastore and the Mapbox geocoding API.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// `datastore_search` envelope: `{ "success": bool, "result": { ... } }`.
#[derive(Debug, Deserialize)]
pub struct CkanEnvelope {
    pub success: bool,
    #[serde(default)]
    pub result: Option<CkanResult>,
    #[serde(default)]
    pub error: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct CkanResult {
    /// Kept untyped so one malformed record cannot fail the batch.
    #[serde(default)]
    pub records: Vec<Value>,
    #[serde(default)]
    pub total: Option<u64>,
}

/// One row of the facility dataset.
///
/// The datastore is loose about types: numbers arrive as strings and vice
/// versa, and blanks are common. Every field is parsed leniently.
#[derive(Debug, Default, Deserialize)]
pub struct FacilityRecord {
    #[serde(rename = "_id", default, deserialize_with = "lenient_i64")]
    pub row_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub tipo_de_servicio: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub sede: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub objeto_de_la_atencion: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub full_address: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub calle: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub numero_exterior: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub numero_interior: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub colonia: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub codigo_postal: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub alcaldia: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub referencias_de_ubicacion: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub horario_de_atencion_horas: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub dias_de_atencion: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub correo_electronico: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub telefono_1: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub extension_1: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub telefono_2: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub extension_2: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub longitude: Option<f64>,
    /// `"lat, lng"` text, used when the numeric columns are blank.
    #[serde(default, deserialize_with = "lenient_string")]
    pub coordenadas: Option<String>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    })
}

/// Mapbox Geocoding v6 `FeatureCollection`.
#[derive(Debug, Deserialize)]
pub struct GeocodeResponse {
    #[serde(default)]
    pub features: Vec<GeocodeFeature>,
}

#[derive(Debug, Deserialize)]
pub struct GeocodeFeature {
    #[serde(default)]
    pub geometry: Option<PointGeometry>,
    #[serde(default)]
    pub properties: Option<GeocodeProperties>,
}

/// GeoJSON `Point`; `coordinates` is `[longitude, latitude]`.
#[derive(Debug, Deserialize)]
pub struct PointGeometry {
    #[serde(default)]
    pub coordinates: Vec<f64>,
}

#[derive(Debug, Deserialize)]
pub struct GeocodeProperties {
    #[serde(default)]
    pub full_address: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}
