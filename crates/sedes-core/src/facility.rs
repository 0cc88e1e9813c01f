//! Facility domain types.

use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// A physical service location from the open dataset.
///
/// `latitude`/`longitude` may be absent or zero in the upstream data; such
/// facilities are kept in listings but never ranked (see [`Facility::location`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    pub id: i64,
    pub name: String,
    pub service_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    pub address: Address,
    pub contact: Contact,
    pub attendance: Attendance,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub street: Option<String>,
    pub exterior_number: Option<String>,
    pub interior_number: Option<String>,
    pub neighborhood: Option<String>,
    pub postal_code: Option<String>,
    pub borough: Option<String>,
    pub references: Option<String>,
    /// Pre-formatted single-line address as published upstream.
    pub full_address: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub phones: Vec<Phone>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phone {
    pub number: String,
    pub extension: Option<String>,
}

/// Free-text attendance schedule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attendance {
    pub hours: Option<String>,
    pub days: Option<String>,
}

impl Facility {
    /// The facility's coordinate, or `None` when it is unlocated.
    ///
    /// A coordinate is unlocated when either component is missing, exactly
    /// zero (the upstream "unset" sentinel), non-finite, or out of range.
    #[must_use]
    pub fn location(&self) -> Option<GeoPoint> {
        let (lat, lng) = (self.latitude?, self.longitude?);
        if lat == 0.0 || lng == 0.0 {
            return None;
        }
        let point = GeoPoint::new(lat, lng).with_label(self.name.clone());
        point.is_valid().then_some(point)
    }

    /// Best single-line address: the published line when present, otherwise
    /// assembled from the structured parts.
    #[must_use]
    pub fn display_address(&self) -> String {
        if let Some(full) = self.address.full_address.as_deref() {
            if !full.trim().is_empty() {
                return full.trim().to_string();
            }
        }

        let street = match (
            self.address.street.as_deref(),
            self.address.exterior_number.as_deref(),
        ) {
            (Some(s), Some(n)) => Some(format!("{s} {n}")),
            (Some(s), None) => Some(s.to_string()),
            _ => None,
        };

        [
            street.as_deref(),
            self.address.neighborhood.as_deref(),
            self.address.borough.as_deref(),
            self.address.postal_code.as_deref(),
        ]
        .into_iter()
        .flatten()
        .filter(|part| !part.trim().is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub(crate) fn facility(id: i64, lat: Option<f64>, lng: Option<f64>) -> Facility {
        Facility {
            id,
            name: format!("Sede {id}"),
            service_type: "Agencia del Ministerio Público".to_string(),
            purpose: None,
            address: Address::default(),
            contact: Contact::default(),
            attendance: Attendance::default(),
            latitude: lat,
            longitude: lng,
        }
    }
}
