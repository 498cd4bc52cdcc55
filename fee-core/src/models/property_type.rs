use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    Land,
    House,
    Unit,
}

impl PropertyType {
    pub const ALL: [PropertyType; 3] = [Self::Land, Self::House, Self::Unit];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Land => "land",
            Self::House => "house",
            Self::Unit => "unit",
        }
    }

    /// Parses a property type tag. Matching ignores case and surrounding
    /// whitespace; anything else is `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "land" => Some(Self::Land),
            "house" => Some(Self::House),
            "unit" => Some(Self::Unit),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Land => "LAND",
            Self::House => "HOUSE",
            Self::Unit => "UNIT",
        }
    }

    pub fn blurb(&self) -> &'static str {
        match self {
            Self::Land => "Vacant land purchase",
            Self::House => "Detached dwelling",
            Self::Unit => "Apartment/townhouse",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
