use serde::Deserialize;

use crate::clients::errors::{Error, Result};

#[derive(Deserialize, Debug, Clone, Default)]
pub struct Country {
    pub name: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct City {
    pub name: Option<String>,
    pub country: Option<Country>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct Venue {
    pub name: Option<String>,
    pub city: Option<City>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct Artist {
    pub name: Option<String>,
}

/// One attended concert as returned by setlist.fm.
///
/// Nested parts are optional on purpose: a record with an absent key still
/// deserializes, and the gap surfaces when the record is flattened into a
/// [`ConcertRow`].
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Setlist {
    pub artist: Option<Artist>,
    pub event_date: Option<String>,
    pub venue: Option<Venue>,
}

/// One page of `GET user/{username}/attended`.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SetlistPage {
    pub setlist: Vec<Setlist>,
    pub total: u64,
    pub items_per_page: u64,
    pub page: u64,
}

/// Flat spreadsheet row: artist, date, venue, city, country.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConcertRow {
    pub artist: String,
    pub date: String,
    pub venue: String,
    pub city: String,
    pub country: String,
}

impl ConcertRow {
    pub const HEADERS: [&'static str; 5] = ["Artist", "Date", "Venue", "City", "Country"];

    /// Flattens a setlist, `index` is its 0-based position used in error reports.
    pub fn try_from_setlist(index: usize, setlist: &Setlist) -> Result<Self> {
        let missing = |field| Error::MissingField { index, field };

        let artist = setlist
            .artist
            .as_ref()
            .and_then(|a| a.name.clone())
            .ok_or_else(|| missing("artist.name"))?;
        let date = setlist
            .event_date
            .clone()
            .ok_or_else(|| missing("eventDate"))?;
        let venue = setlist.venue.as_ref().ok_or_else(|| missing("venue"))?;
        let venue_name = venue.name.clone().ok_or_else(|| missing("venue.name"))?;
        let city = venue.city.as_ref().ok_or_else(|| missing("venue.city"))?;
        let city_name = city
            .name
            .clone()
            .ok_or_else(|| missing("venue.city.name"))?;
        let country = city
            .country
            .as_ref()
            .and_then(|c| c.name.clone())
            .ok_or_else(|| missing("venue.city.country.name"))?;

        Ok(ConcertRow {
            artist,
            date,
            venue: venue_name,
            city: city_name,
            country,
        })
    }

    pub fn cells(&self) -> [&str; 5] {
        [
            self.artist.as_str(),
            self.date.as_str(),
            self.venue.as_str(),
            self.city.as_str(),
            self.country.as_str(),
        ]
    }
}
