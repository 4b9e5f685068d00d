//! The three-category weather domain.
//!
//! The demand model only distinguishes Clear, Cloudy, and Rain. Raw
//! condition strings from the weather API collapse into these three
//! categories, and historical sales rows written by the previous system may
//! carry the same categories under their Indonesian labels (Cerah, Berawan,
//! Hujan) - both spellings decode to the same category.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A weather category, the only granularity the demand model consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeatherCategory {
    Clear,
    Cloudy,
    Rain,
}

impl WeatherCategory {
    /// All categories, in feature-code order.
    pub const ALL: [Self; 3] = [Self::Clear, Self::Cloudy, Self::Rain];

    /// Collapse a raw condition string from the weather API.
    ///
    /// The mapping is total: `Clear` maps to Clear, the rainy condition
    /// group maps to Rain, and everything else (Clouds, Mist, Haze, ...)
    /// maps to Cloudy.
    #[must_use]
    pub fn from_condition(raw: &str) -> Self {
        match raw {
            "Clear" => Self::Clear,
            "Rain" | "Drizzle" | "Thunderstorm" => Self::Rain,
            _ => Self::Cloudy,
        }
    }

    /// Decode a stored category label, accepting both the English and the
    /// legacy Indonesian spellings. Unrecognized labels decode to Cloudy,
    /// matching the neutral code the model trains with.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label {
            "Clear" | "Cerah" => Self::Clear,
            "Rain" | "Hujan" => Self::Rain,
            _ => Self::Cloudy,
        }
    }

    /// The numeric feature code used by the demand model.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Clear => 0,
            Self::Cloudy => 1,
            Self::Rain => 2,
        }
    }

    /// Canonical label, used on the wire and in stored rows.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::Cloudy => "Cloudy",
            Self::Rain => "Rain",
        }
    }
}

impl fmt::Display for WeatherCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for WeatherCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for WeatherCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(Self::from_label(&label))
    }
}
