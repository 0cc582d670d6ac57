use crate::geo::LngLat;
use crate::place::{Place, PlaceId};

pub const STAR: char = '★';

/// Which admin callbacks a marker carries. Only presence matters for
/// rendering; the callbacks themselves live with the view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MarkerActions {
    pub edit: bool,
    pub delete: bool,
}

impl MarkerActions {
    pub const NONE: Self = Self {
        edit: false,
        delete: false,
    };
    pub const ALL: Self = Self {
        edit: true,
        delete: true,
    };

    pub fn any(&self) -> bool {
        self.edit || self.delete
    }
}

/// Read-only projection of a [`Place`] for the map. Two markers render the
/// same when they compare equal.
#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
    pub id: PlaceId,
    pub coordinates: LngLat,
    pub title: String,
    pub rating: Option<f64>,
    pub category: Option<String>,
    pub review: Option<String>,
    pub recommended_by: Option<String>,
    pub image: Option<String>,
    pub actions: MarkerActions,
}

impl Marker {
    pub fn from_place(place: &Place, actions: MarkerActions) -> Self {
        Self {
            id: place.id.clone(),
            coordinates: place.coordinates,
            title: place.name.clone(),
            rating: Some(f64::from(place.rating)),
            category: non_empty(&place.category),
            review: non_empty(&place.review),
            recommended_by: place.recommended_by.as_deref().and_then(non_empty),
            image: place.image.as_deref().and_then(non_empty),
            actions,
        }
    }

    pub fn same_position(&self, other: &Marker) -> bool {
        self.id == other.id && self.coordinates == other.coordinates
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Admin mode attaches edit and delete to every marker.
pub fn derive_markers<'a, I>(places: I, admin_mode: bool) -> Vec<Marker>
where
    I: IntoIterator<Item = &'a Place>,
{
    let actions = if admin_mode {
        MarkerActions::ALL
    } else {
        MarkerActions::NONE
    };
    places
        .into_iter()
        .map(|place| Marker::from_place(place, actions))
        .collect()
}

/// Rounds to the nearest whole star; non-finite or negative ratings render nothing.
pub fn star_string(rating: f64) -> String {
    if !rating.is_finite() || rating <= 0.0 {
        return String::new();
    }
    let count = rating.round().min(u8::MAX as f64) as usize;
    std::iter::repeat(STAR).take(count).collect()
}
