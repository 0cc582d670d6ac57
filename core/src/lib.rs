pub mod action;
pub mod camera;
pub mod catalog;
pub mod filter;
pub mod focus;
pub mod form;
pub mod geo;
pub mod marker;
pub mod place;
pub mod popup;
pub mod reconcile;
pub mod state;

pub use action::ExplorerAction;
pub use camera::{CameraCommand, CameraDirector, CameraZooms, CityView};
pub use catalog::{
    city_by_key, CityEntry, FormRules, MapSettings, RecommenderEntry,
    TileProviderKind, CATEGORIES, CITY_CATALOG, DEFAULT_CITY_KEY, FORM_RULES, MAP_SETTINGS,
    RECOMMENDERS,
};
pub use filter::{FilterState, Selection, ALL_LABEL};
pub use focus::{FocusChange, FocusState};
pub use form::{
    check_image_file, FormEdit, FormError, FormMode, FormSchema, FormVariant, PlaceFormState,
    IMAGE_MAX_BYTES,
};
pub use geo::LngLat;
pub use marker::{derive_markers, star_string, Marker, MarkerActions};
pub use place::{Place, PlaceDraft, PlaceId, PLACE_ID_ALPHABET, PLACE_ID_LEN};
pub use popup::{PopupContent, PopupImage};
pub use reconcile::{MarkerReconciler, MarkerSurface, ReconcileOutcome};
pub use state::{ExplorerState, FormSession};
