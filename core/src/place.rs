use std::fmt;

use rand::Rng;

use crate::geo::LngLat;

pub const PLACE_ID_LEN: usize = 12;
pub const PLACE_ID_ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlaceId(String);

impl PlaceId {
    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        let alphabet = PLACE_ID_ALPHABET.as_bytes();
        let mut id = String::with_capacity(PLACE_ID_LEN);
        for _ in 0..PLACE_ID_LEN {
            let idx = rng.random_range(0..alphabet.len());
            id.push(alphabet[idx] as char);
        }
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Place {
    pub id: PlaceId,
    pub name: String,
    pub city: String,
    pub category: String,
    pub rating: u8,
    pub review: String,
    pub coordinates: LngLat,
    pub recommended_by: Option<String>,
    pub image: Option<String>,
}

/// Validated form output. Carries no identity, city or position; the caller
/// supplies those on insert and keeps them on update.
#[derive(Clone, Debug, PartialEq)]
pub struct PlaceDraft {
    pub name: String,
    pub category: String,
    pub rating: u8,
    pub review: String,
    pub recommended_by: Option<String>,
    pub image: Option<String>,
}

impl Place {
    pub fn from_draft(id: PlaceId, city: &str, coordinates: LngLat, draft: PlaceDraft) -> Self {
        Self {
            id,
            name: draft.name,
            city: city.to_string(),
            category: draft.category,
            rating: draft.rating,
            review: draft.review,
            coordinates,
            recommended_by: draft.recommended_by,
            image: draft.image,
        }
    }

    pub fn to_draft(&self) -> PlaceDraft {
        PlaceDraft {
            name: self.name.clone(),
            category: self.category.clone(),
            rating: self.rating,
            review: self.review.clone(),
            recommended_by: self.recommended_by.clone(),
            image: self.image.clone(),
        }
    }

    fn replaced_with(&self, draft: PlaceDraft) -> Self {
        Self::from_draft(self.id.clone(), &self.city, self.coordinates, draft)
    }
}

pub fn find_place<'a>(places: &'a [Place], id: &PlaceId) -> Option<&'a Place> {
    places.iter().find(|place| &place.id == id)
}

/// New places go to the front of the list.
pub fn with_inserted(places: &[Place], place: Place) -> Vec<Place> {
    let mut next = Vec::with_capacity(places.len() + 1);
    next.push(place);
    next.extend(places.iter().cloned());
    next
}

/// Returns `None` when no place has `id`.
pub fn with_replaced(places: &[Place], id: &PlaceId, draft: PlaceDraft) -> Option<Vec<Place>> {
    let index = places.iter().position(|place| &place.id == id)?;
    let mut next = places.to_vec();
    next[index] = places[index].replaced_with(draft);
    Some(next)
}

/// Returns `None` when no place has `id`.
pub fn without(places: &[Place], id: &PlaceId) -> Option<Vec<Place>> {
    if !places.iter().any(|place| &place.id == id) {
        return None;
    }
    Some(
        places
            .iter()
            .filter(|place| &place.id != id)
            .cloned()
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn generated_ids_use_alphabet() {
        let mut rng = SmallRng::seed_from_u64(7);
        let id = PlaceId::generate(&mut rng);
        assert_eq!(id.as_str().len(), PLACE_ID_LEN);
        assert!(id.as_str().chars().all(|ch| PLACE_ID_ALPHABET.contains(ch)));
        assert_eq!(id.to_string(), id.as_str());
    }

    #[test]
    fn consecutive_ids_differ() {
        let mut rng = SmallRng::seed_from_u64(99);
        let first = PlaceId::generate(&mut rng);
        let second = PlaceId::generate(&mut rng);
        assert_ne!(first, second);
    }
}
