use crate::action::ExplorerAction;
use crate::camera::CityView;
use crate::catalog::city_by_key;
use crate::filter::FilterState;
use crate::focus::FocusState;
use crate::form::FormMode;
use crate::marker::{derive_markers, Marker};
use crate::place::{find_place, with_inserted, with_replaced, without, Place, PlaceDraft, PlaceId};

#[derive(Clone, Debug, PartialEq)]
pub struct FormSession {
    pub mode: FormMode,
    pub initial: Option<PlaceDraft>,
}

/// Everything the application shell owns. Transitions are pure: `apply`
/// returns the next state and leaves `self` untouched.
#[derive(Clone, Debug, PartialEq)]
pub struct ExplorerState {
    pub places: Vec<Place>,
    pub filters: FilterState,
    pub admin_mode: bool,
    pub form: Option<FormSession>,
    pub focus: FocusState,
    pub sidebar_visible: bool,
    pub notice: Option<String>,
}

impl Default for ExplorerState {
    fn default() -> Self {
        Self::new()
    }
}

impl ExplorerState {
    pub fn new() -> Self {
        Self {
            places: Vec::new(),
            filters: FilterState::default(),
            admin_mode: false,
            form: None,
            focus: FocusState::default(),
            sidebar_visible: true,
            notice: None,
        }
    }

    pub fn apply(&self, action: ExplorerAction) -> Self {
        let mut next = self.clone();
        match action {
            ExplorerAction::SetAdminMode(enabled) => next.admin_mode = enabled,
            ExplorerAction::SelectCity(key) => {
                if let Some(city) = city_by_key(&key) {
                    next.filters.city = city.key.to_string();
                }
            }
            ExplorerAction::SelectCategory(selection) => next.filters.category = selection,
            ExplorerAction::SelectRecommender(selection) => {
                next.filters.recommender = selection
            }
            ExplorerAction::MapClicked(coords) => {
                let coords = coords.wrapped();
                if self.admin_mode && self.form.is_none() && coords.is_valid() {
                    next.form = Some(FormSession {
                        mode: FormMode::Create { coords },
                        initial: None,
                    });
                }
            }
            ExplorerAction::BeginEdit(id) => {
                if self.admin_mode {
                    if let Some(place) = find_place(&self.places, &id) {
                        next.form = Some(FormSession {
                            mode: FormMode::Edit { id },
                            initial: Some(place.to_draft()),
                        });
                    }
                }
            }
            ExplorerAction::SubmitForm { draft, new_id } => {
                next.submit(draft, new_id);
            }
            ExplorerAction::CloseForm => next.form = None,
            ExplorerAction::DeletePlace(id) => {
                if self.admin_mode {
                    next.delete(&id);
                }
            }
            ExplorerAction::FocusPlace(id) => {
                if let Some(place) = find_place(&self.places, &id) {
                    next.focus = self.focus.focus_on(id, place.coordinates);
                }
            }
            ExplorerAction::ClearFocus => next.focus = FocusState::cleared(),
            ExplorerAction::ToggleSidebar => next.sidebar_visible = !self.sidebar_visible,
            ExplorerAction::DismissNotice => next.notice = None,
        }
        next
    }

    fn delete(&mut self, id: &PlaceId) {
        let Some(places) = without(&self.places, id) else {
            return;
        };
        self.places = places;
        if self.focus.is_focused(id) {
            self.focus = FocusState::cleared();
        }
        let editing_deleted = matches!(
            &self.form,
            Some(FormSession { mode: FormMode::Edit { id: editing }, .. }) if editing == id
        );
        if editing_deleted {
            self.form = None;
        }
    }

    fn submit(&mut self, draft: PlaceDraft, new_id: PlaceId) {
        let Some(session) = self.form.take() else {
            return;
        };
        match session.mode {
            FormMode::Create { coords } => {
                let notice = format!("{} added to {}.", draft.name, self.filters.city);
                let place = Place::from_draft(new_id, &self.filters.city, coords, draft);
                self.places = with_inserted(&self.places, place);
                self.notice = Some(notice);
            }
            FormMode::Edit { id } => {
                let notice = format!("{} updated.", draft.name);
                if let Some(places) = with_replaced(&self.places, &id, draft) {
                    self.places = places;
                    self.notice = Some(notice);
                    if self.focus.is_focused(&id) {
                        self.focus = self.focus.refreshed();
                    }
                }
            }
        }
    }

    pub fn visible_places(&self) -> Vec<&Place> {
        self.filters.apply(&self.places)
    }

    pub fn markers(&self) -> Vec<Marker> {
        derive_markers(self.visible_places(), self.admin_mode)
    }

    pub fn city_view(&self) -> Option<CityView> {
        city_by_key(&self.filters.city).map(|city| CityView {
            center: city.center,
            zoom: city.zoom,
        })
    }

    pub fn focused_place(&self) -> Option<&Place> {
        let id = self.focus.place.as_ref()?;
        self.visible_places()
            .into_iter()
            .find(|place| &place.id == id)
    }

    pub fn form_open(&self) -> bool {
        self.form.is_some()
    }
}
