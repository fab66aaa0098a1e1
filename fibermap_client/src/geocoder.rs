// Copyright 2025 the Fibermap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Place search and reverse geocoding.

use async_trait::async_trait;
use fibermap_model::{LatLng, ObjectDraft, ObjectKind};
use fibermap_region::RegionCandidate;
use serde::Deserialize;

use crate::{BackendError, BackendResult, ClientConfig};

/// Structured address components of a geocoder result.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Address {
    /// Street.
    pub road: Option<String>,
    /// House number on `road`.
    pub house_number: Option<String>,
    /// City.
    pub city: Option<String>,
    /// Town, when the place is not a city.
    pub town: Option<String>,
    /// Village.
    pub village: Option<String>,
    /// Hamlet.
    pub hamlet: Option<String>,
    /// County or district.
    pub county: Option<String>,
    /// State or province.
    pub state: Option<String>,
    /// Wider region.
    pub region: Option<String>,
    /// Postal code.
    pub postcode: Option<String>,
    /// Country.
    pub country: Option<String>,
    /// The geocoder's one-line rendering of the whole place.
    #[serde(skip)]
    pub display_name: Option<String>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl Address {
    /// The settlement name: city, town, village, hamlet, county, or region,
    /// whichever is known first.
    pub fn locality(&self) -> Option<&str> {
        [
            &self.city,
            &self.town,
            &self.village,
            &self.hamlet,
            &self.county,
            &self.region,
        ]
        .into_iter()
        .find_map(present)
    }

    /// A postal-style one-line address.
    ///
    /// Joins `road[, house_number]`, the city, town or village, the postcode,
    /// and the country. Without any of those, falls back to the display name.
    pub fn to_display_string(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if let Some(road) = present(&self.road) {
            match present(&self.house_number) {
                Some(number) => parts.push(format!("{road}, {number}")),
                None => parts.push(road.to_owned()),
            }
        }
        let settlement = [&self.city, &self.town, &self.village]
            .into_iter()
            .find_map(present);
        parts.extend(
            [settlement, present(&self.postcode), present(&self.country)]
                .into_iter()
                .flatten()
                .map(str::to_owned),
        );
        if parts.is_empty() {
            return self
                .display_name
                .clone()
                .unwrap_or_else(|| "Unknown address".to_owned());
        }
        parts.join(", ")
    }
}

/// One forward-search result.
#[derive(Clone, Debug, PartialEq)]
pub struct Place {
    /// Representative coordinate.
    pub position: LatLng,
    /// One-line rendering of the place.
    pub display_name: String,
    /// Geocoder place id.
    pub osm_id: Option<i64>,
    /// Structured components, when the geocoder returned them.
    pub address: Option<Address>,
}

impl Place {
    /// This place as a candidate for a new region.
    ///
    /// The name is the address locality, or else the first component of the
    /// display name.
    pub fn to_region_candidate(&self) -> RegionCandidate {
        let name = self
            .address
            .as_ref()
            .and_then(Address::locality)
            .or_else(|| self.display_name.split(',').next().map(str::trim))
            .unwrap_or_default()
            .to_owned();
        RegionCandidate {
            name,
            display_name: self.display_name.clone(),
            position: self.position,
            osm_id: self.osm_id,
        }
    }
}

/// Forward and reverse geocoding.
///
/// Calls are cancellable by dropping or aborting their future.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Places matching `query`, at most `limit` of them.
    async fn search(&self, query: &str, limit: usize) -> BackendResult<Vec<Place>>;

    /// The address at `position`.
    async fn reverse(&self, position: LatLng) -> BackendResult<Address>;
}

/// A form for a new object at `position`, with the address filled in by
/// reverse geocoding.
///
/// A failed lookup leaves the address empty; the form is still usable.
pub async fn object_draft_at<G: Geocoder + ?Sized>(
    geocoder: &G,
    kind: ObjectKind,
    position: LatLng,
) -> ObjectDraft {
    let mut draft = ObjectDraft::new(kind, position);
    match geocoder.reverse(position).await {
        Ok(address) => draft.address = Some(address.to_display_string()),
        Err(err) => tracing::warn!(%err, "reverse geocoding failed"),
    }
    draft
}

/// [`Geocoder`] backed by a Nominatim-compatible service.
#[derive(Clone, Debug)]
pub struct NominatimGeocoder {
    client: reqwest::Client,
    base: String,
    user_agent: String,
    accept_language: Option<String>,
}

#[derive(Deserialize)]
struct RawPlace {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: String,
    #[serde(default)]
    osm_id: Option<i64>,
    #[serde(default)]
    address: Option<Address>,
}

#[derive(Deserialize)]
struct RawReverse {
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    address: Address,
}

impl RawPlace {
    fn into_place(self) -> BackendResult<Place> {
        let parse = |v: &str| {
            v.parse::<f64>()
                .map_err(|_| BackendError::Decode(format!("bad coordinate {v:?}")))
        };
        let display_name = self.display_name;
        let address = self.address.map(|a| Address {
            display_name: Some(display_name.clone()),
            ..a
        });
        Ok(Place {
            position: LatLng::new(parse(&self.lat)?, parse(&self.lon)?),
            display_name,
            osm_id: self.osm_id,
            address,
        })
    }
}

impl NominatimGeocoder {
    /// A geocoder at `base`, identifying itself as `user_agent`.
    pub fn new(base: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base: base.into().trim_end_matches('/').to_owned(),
            user_agent: user_agent.into(),
            accept_language: None,
        }
    }

    /// A geocoder configured from `config`.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            accept_language: config.accept_language.clone(),
            ..Self::new(config.geocoder_base.clone(), config.user_agent.clone())
        }
    }

    fn get(&self, endpoint: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/{endpoint}", self.base);
        tracing::debug!(%url, "geocoder request");
        let builder = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&[("format", "json"), ("addressdetails", "1")]);
        match &self.accept_language {
            Some(lang) => builder.query(&[("accept-language", lang.as_str())]),
            None => builder,
        }
    }

    async fn send<T: serde::de::DeserializeOwned>(
        builder: reqwest::RequestBuilder,
    ) -> BackendResult<T> {
        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
                detail: format!("geocoder error {status}"),
            });
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn search(&self, query: &str, limit: usize) -> BackendResult<Vec<Place>> {
        let builder = self
            .get("search")
            .query(&[("q", query)])
            .query(&[("limit", limit)]);
        let raw: Vec<RawPlace> = Self::send(builder).await?;
        raw.into_iter().map(RawPlace::into_place).collect()
    }

    async fn reverse(&self, position: LatLng) -> BackendResult<Address> {
        let builder = self
            .get("reverse")
            .query(&[("lat", position.latitude), ("lon", position.longitude)])
            .query(&[("zoom", 18)]);
        let raw: RawReverse = Self::send(builder).await?;
        Ok(Address {
            display_name: raw.display_name,
            ..raw.address
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_string_joins_known_components() {
        let address = Address {
            road: Some("Khreshchatyk".into()),
            house_number: Some("22".into()),
            town: Some("Kyiv".into()),
            postcode: Some("01001".into()),
            country: Some("Ukraine".into()),
            ..Address::default()
        };
        assert_eq!(
            address.to_display_string(),
            "Khreshchatyk, 22, Kyiv, 01001, Ukraine"
        );
    }

    #[test]
    fn display_string_falls_back_to_display_name() {
        let address = Address {
            state: Some("Somewhere".into()),
            display_name: Some("Field, Somewhere".into()),
            ..Address::default()
        };
        assert_eq!(address.to_display_string(), "Field, Somewhere");
        assert_eq!(Address::default().to_display_string(), "Unknown address");
    }

    #[test]
    fn locality_prefers_city_then_smaller_places() {
        let mut address = Address {
            village: Some("Bila".into()),
            county: Some("Ternopil Raion".into()),
            ..Address::default()
        };
        assert_eq!(address.locality(), Some("Bila"));
        address.city = Some("  ".into());
        assert_eq!(address.locality(), Some("Bila"));
        address.village = None;
        assert_eq!(address.locality(), Some("Ternopil Raion"));
    }

    #[test]
    fn raw_search_results_parse() {
        let json = r#"[{
            "lat": "49.8397", "lon": "24.0297",
            "display_name": "Lviv, Lviv Oblast, Ukraine",
            "osm_id": 1234,
            "address": {"city": "Lviv", "country": "Ukraine"}
        }]"#;
        let raw: Vec<RawPlace> = serde_json::from_str(json).unwrap();
        let place = raw.into_iter().next().unwrap().into_place().unwrap();
        assert_eq!(place.position, LatLng::new(49.8397, 24.0297));
        let candidate = place.to_region_candidate();
        assert_eq!(candidate.name, "Lviv");
        assert_eq!(candidate.osm_id, Some(1234));
    }

    #[test]
    fn bad_coordinates_are_decode_errors() {
        let raw = RawPlace {
            lat: "north".into(),
            lon: "0".into(),
            display_name: String::new(),
            osm_id: None,
            address: None,
        };
        assert!(matches!(raw.into_place(), Err(BackendError::Decode(_))));
    }

    #[test]
    fn candidate_name_from_display_name() {
        let place = Place {
            position: LatLng::new(0.0, 0.0),
            display_name: "Bila, Ternopil Raion, Ukraine".into(),
            osm_id: None,
            address: None,
        };
        assert_eq!(place.to_region_candidate().name, "Bila");
    }
}
