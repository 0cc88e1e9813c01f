//! Normalization of raw dataset records into [`Facility`] values.

use sedes_core::{format_phone, Address, Attendance, Contact, Facility, Phone};
use serde_json::Value;

use crate::error::SourceError;
use crate::types::{CkanEnvelope, FacilityRecord};

/// Parses a dataset payload into facilities.
///
/// Accepts either the full CKAN envelope or a bare array of records. Records
/// that fail to normalize are skipped with a warning; only a payload whose
/// overall shape is wrong is an error.
///
/// # Errors
///
/// - [`SourceError::Api`] if the envelope reports `"success": false`.
/// - [`SourceError::Deserialize`] if the payload is neither an envelope nor
///   an array.
pub fn parse_facilities(payload: Value, context: &str) -> Result<Vec<Facility>, SourceError> {
    let records = match payload {
        Value::Array(records) => records,
        other => {
            let envelope: CkanEnvelope =
                serde_json::from_value(other).map_err(|e| SourceError::Deserialize {
                    context: context.to_string(),
                    source: e,
                })?;
            if !envelope.success {
                let msg = envelope
                    .error
                    .as_ref()
                    .and_then(|e| e.get("message"))
                    .and_then(Value::as_str)
                    .unwrap_or("unknown error")
                    .to_string();
                return Err(SourceError::Api(msg));
            }
            envelope.result.map(|r| r.records).unwrap_or_default()
        }
    };

    let total = records.len();
    let facilities: Vec<Facility> = records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match normalize_record(record) {
            Ok(facility) => Some(facility),
            Err(e) => {
                tracing::warn!(context, index, error = %e, "skipping facility record");
                None
            }
        })
        .collect();

    if facilities.len() < total {
        tracing::warn!(
            context,
            kept = facilities.len(),
            total,
            "some facility records were skipped"
        );
    }
    Ok(facilities)
}

/// Converts one raw record into a [`Facility`].
///
/// # Errors
///
/// Returns [`SourceError::InvalidRecord`] if the record is not an object, or
/// lacks an identifier or a name.
pub fn normalize_record(record: Value) -> Result<Facility, SourceError> {
    let record: FacilityRecord = serde_json::from_value(record)
        .map_err(|e| SourceError::InvalidRecord(e.to_string()))?;

    let id = record
        .row_id
        .or(record.id)
        .ok_or_else(|| SourceError::InvalidRecord("missing identifier".to_string()))?;
    let name = record
        .sede
        .ok_or_else(|| SourceError::InvalidRecord(format!("record {id} has no name")))?;

    let (latitude, longitude) = match (record.latitude, record.longitude) {
        (Some(lat), Some(lng)) => (Some(lat), Some(lng)),
        (lat, lng) => match record.coordenadas.as_deref().and_then(parse_coordinate_pair) {
            Some((lat, lng)) => (Some(lat), Some(lng)),
            None => (lat, lng),
        },
    };

    let phones = [
        (record.telefono_1, record.extension_1),
        (record.telefono_2, record.extension_2),
    ]
    .into_iter()
    .filter_map(|(number, extension)| {
        let number = format_phone(number.as_deref()?)?;
        Some(Phone {
            number,
            extension: extension.as_deref().and_then(format_phone),
        })
    })
    .collect();

    Ok(Facility {
        id,
        name,
        service_type: record.tipo_de_servicio.unwrap_or_default(),
        purpose: record.objeto_de_la_atencion,
        address: Address {
            street: record.calle,
            exterior_number: record.numero_exterior.filter(|n| !is_placeholder(n)),
            interior_number: record.numero_interior.filter(|n| !is_placeholder(n)),
            neighborhood: record.colonia,
            postal_code: record.codigo_postal.map(pad_postal_code),
            borough: record.alcaldia,
            references: record.referencias_de_ubicacion,
            full_address: record.full_address,
        },
        contact: Contact {
            phones,
            email: record.correo_electronico.filter(|e| e.contains('@')),
        },
        attendance: Attendance {
            hours: record.horario_de_atencion_horas,
            days: record.dias_de_atencion,
        },
        latitude,
        longitude,
    })
}

fn is_placeholder(value: &str) -> bool {
    value.eq_ignore_ascii_case("S/N") || value.eq_ignore_ascii_case("S/C")
}

/// Postal codes published as numbers lose their leading zero (`6010`).
fn pad_postal_code(code: String) -> String {
    if code.len() < 5 && code.chars().all(|c| c.is_ascii_digit()) {
        format!("{code:0>5}")
    } else {
        code
    }
}

fn parse_coordinate_pair(text: &str) -> Option<(f64, f64)> {
    let (lat, lng) = text.split_once(',')?;
    Some((lat.trim().parse().ok()?, lng.trim().parse().ok()?))
}
