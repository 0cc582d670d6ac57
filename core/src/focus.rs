use crate::geo::LngLat;
use crate::place::PlaceId;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FocusChange {
    /// Camera should travel to the target, even if it already sits there.
    #[default]
    Moved,
    /// Target data changed in place; popups refresh, camera stays.
    Refreshed,
}

/// The place the user picked and where it sits. Identity is the id; the
/// coordinate only drives the camera.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FocusState {
    pub place: Option<PlaceId>,
    pub target: Option<LngLat>,
    pub version: u64,
    pub change: FocusChange,
}

impl FocusState {
    pub fn focus_on(&self, place: PlaceId, target: LngLat) -> Self {
        Self {
            place: Some(place),
            target: Some(target),
            version: self.version.wrapping_add(1),
            change: FocusChange::Moved,
        }
    }

    pub fn refreshed(&self) -> Self {
        Self {
            place: self.place.clone(),
            target: self.target,
            version: self.version.wrapping_add(1),
            change: FocusChange::Refreshed,
        }
    }

    pub fn cleared() -> Self {
        Self::default()
    }

    pub fn is_focused(&self, id: &PlaceId) -> bool {
        self.place.as_ref() == Some(id)
    }
}
