use chrono::Datelike;
use serde::{Deserialize, Serialize};

/// Earliest year any predefined period covers.
pub const MIN_PERIOD_YEAR: i32 = -3000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Confirmed,
    Probable,
    Possible,
}

impl Category {
    pub const ALL: [Self; 3] = [Self::Confirmed, Self::Probable, Self::Possible];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Probable => "probable",
            Self::Possible => "possible",
        }
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Confirmed),
            1 => Some(Self::Probable),
            2 => Some(Self::Possible),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Self::Confirmed => 0,
            Self::Probable => 1,
            Self::Possible => 2,
        }
    }

    /// Infers a category from free text such as "Validated report" or "likely".
    /// Anything unrecognised is `Possible`.
    pub fn infer(value: &str) -> Self {
        let value = value.trim().to_lowercase();
        if value.contains("confirm") || value.contains("validated") {
            Self::Confirmed
        } else if value.contains("prob") || value.contains("likely") {
            Self::Probable
        } else {
            Self::Possible
        }
    }

    /// Category implied by a credibility score, used for generated samples.
    pub const fn from_credibility(credibility: u8) -> Self {
        if credibility >= 8 {
            Self::Confirmed
        } else if credibility >= 5 {
            Self::Probable
        } else {
            Self::Possible
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Confirmed => "Confirmed",
            Self::Probable => "Probable",
            Self::Possible => "Possible",
        }
    }

    /// Hex color of the category's markers.
    pub const fn hex_color(self) -> &'static str {
        match self {
            Self::Confirmed => "#6ee7ff",
            Self::Probable => "#ff7b3d",
            Self::Possible => "#65fc78",
        }
    }

    pub const fn rgb(self) -> (u8, u8, u8) {
        match self {
            Self::Confirmed => (0x6e, 0xe7, 0xff),
            Self::Probable => (0xff, 0x7b, 0x3d),
            Self::Possible => (0x65, 0xfc, 0x78),
        }
    }
}

/// A named, closed year interval used for discrete filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Ancient,
    Medieval,
    Modern,
    Contemporary,
}

impl Period {
    pub const ALL: [Self; 4] = [
        Self::Ancient,
        Self::Medieval,
        Self::Modern,
        Self::Contemporary,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ancient => "ancient",
            Self::Medieval => "medieval",
            Self::Modern => "modern",
            Self::Contemporary => "contemporary",
        }
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Ancient),
            1 => Some(Self::Medieval),
            2 => Some(Self::Modern),
            3 => Some(Self::Contemporary),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Self::Ancient => 0,
            Self::Medieval => 1,
            Self::Modern => 2,
            Self::Contemporary => 3,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "ancient" => Some(Self::Ancient),
            "medieval" => Some(Self::Medieval),
            "modern" => Some(Self::Modern),
            "contemporary" => Some(Self::Contemporary),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Ancient => "Ancient",
            Self::Medieval => "Medieval",
            Self::Modern => "Modern",
            Self::Contemporary => "Contemporary",
        }
    }

    pub const fn start(self) -> i32 {
        match self {
            Self::Ancient => MIN_PERIOD_YEAR,
            Self::Medieval => 500,
            Self::Modern => 1750,
            Self::Contemporary => 1950,
        }
    }

    /// Last year of the period. Contemporary runs to the current calendar year.
    pub fn end(self) -> i32 {
        match self {
            Self::Ancient => 499,
            Self::Medieval => 1749,
            Self::Modern => 1949,
            Self::Contemporary => chrono::Local::now().year(),
        }
    }

    pub fn contains(self, year: i32) -> bool {
        (self.start()..=self.end()).contains(&year)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    /// Returns `None` unless both values are finite and inside WGS84 ranges.
    pub fn new(lat: f64, lng: f64) -> Option<Self> {
        let valid = lat.is_finite()
            && lng.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lng);
        valid.then_some(Self { lat, lng })
    }
}

/// A normalized geotagged event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub position: GeoPoint,
    pub category: Category,
    /// Negative values are BCE years.
    pub year: Option<i32>,
    pub title: String,
    pub date: String,
    pub location: String,
    pub region: String,
    pub country: String,
    pub credibility: u8,
    pub description: String,
}

impl Record {
    /// "Place, Region, Country" with empty parts skipped.
    pub fn place_line(&self) -> String {
        [&self.location, &self.region, &self.country]
            .into_iter()
            .filter(|part| !part.is_empty())
            .cloned()
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Formats a year for display, using a BCE suffix for negative years.
pub fn format_year(year: i32) -> String {
    if year < 0 {
        format!("{} BCE", year.unsigned_abs())
    } else {
        year.to_string()
    }
}
