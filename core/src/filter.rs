use crate::catalog::DEFAULT_CITY_KEY;
use crate::place::Place;

pub const ALL_LABEL: &str = "All";

/// A filter slot that either accepts everything or one exact value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    All,
    Only(String),
}

impl Selection {
    /// Parses a `<select>` value; the "All" label maps to [`Selection::All`].
    pub fn from_label(label: &str) -> Self {
        let trimmed = label.trim();
        if trimmed.is_empty() || trimmed == ALL_LABEL {
            Selection::All
        } else {
            Selection::Only(trimmed.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Selection::All => ALL_LABEL,
            Selection::Only(value) => value,
        }
    }

    pub fn accepts(&self, value: &str) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(expected) => expected == value,
        }
    }

    pub fn accepts_optional(&self, value: Option<&str>) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(expected) => value == Some(expected.as_str()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterState {
    pub city: String,
    pub category: Selection,
    pub recommender: Selection,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            city: DEFAULT_CITY_KEY.to_string(),
            category: Selection::All,
            recommender: Selection::All,
        }
    }
}

impl FilterState {
    pub fn matches(&self, place: &Place) -> bool {
        place.city == self.city
            && self.category.accepts(&place.category)
            && self
                .recommender
                .accepts_optional(place.recommended_by.as_deref())
    }

    pub fn apply<'a>(&self, places: &'a [Place]) -> Vec<&'a Place> {
        places.iter().filter(|place| self.matches(place)).collect()
    }
}
