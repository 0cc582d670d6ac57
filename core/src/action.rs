use crate::filter::Selection;
use crate::geo::LngLat;
use crate::place::{PlaceDraft, PlaceId};

#[derive(Clone, Debug)]
pub enum ExplorerAction {
    SetAdminMode(bool),
    SelectCity(String),
    SelectCategory(Selection),
    SelectRecommender(Selection),
    MapClicked(LngLat),
    BeginEdit(PlaceId),
    /// `new_id` is only used when the open form is creating a place.
    SubmitForm { draft: PlaceDraft, new_id: PlaceId },
    CloseForm,
    DeletePlace(PlaceId),
    FocusPlace(PlaceId),
    ClearFocus,
    ToggleSidebar,
    DismissNotice,
}
