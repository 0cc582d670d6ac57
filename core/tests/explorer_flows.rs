use city_explorer_core::{
    ExplorerAction, ExplorerState, FormEdit, FormError, FormMode, FormSchema, LngLat, PlaceId,
    PlaceFormState, Selection, DEFAULT_CITY_KEY,
};
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn schema() -> FormSchema {
    FormSchema {
        categories: vec![
            "Japanese".to_string(),
            "Brazilian".to_string(),
            "Italian".to_string(),
        ],
        recommenders: vec!["Cadu".to_string(), "Danilo Carneiro".to_string()],
        require_recommender: true,
        rating_min: 1,
        rating_max: 5,
        default_rating: 5,
    }
}

fn fill(name: &str, category: &str, rating: u8, recommender: &str) -> PlaceFormState {
    PlaceFormState::for_create(&schema())
        .apply(FormEdit::Name(name.to_string()))
        .apply(FormEdit::Category(category.to_string()))
        .apply(FormEdit::Rating(Some(rating)))
        .apply(FormEdit::RecommendedBy(recommender.to_string()))
}

fn add_place(
    state: &ExplorerState,
    rng: &mut SmallRng,
    at: LngLat,
    form: &PlaceFormState,
) -> ExplorerState {
    let state = state.apply(ExplorerAction::MapClicked(at));
    let draft = form.validate(&schema()).expect("valid form");
    state.apply(ExplorerAction::SubmitForm {
        draft,
        new_id: PlaceId::generate(rng),
    })
}

fn admin_state() -> ExplorerState {
    ExplorerState::new().apply(ExplorerAction::SetAdminMode(true))
}

#[test]
fn add_then_filter_scenario() {
    let mut rng = SmallRng::seed_from_u64(1);
    let state = admin_state();
    assert_eq!(state.filters.city, DEFAULT_CITY_KEY);
    assert_eq!(state.filters.category, Selection::All);

    let at = LngLat::new(-46.63, -23.55);
    let state = add_place(&state, &mut rng, at, &fill("Test Cafe", "Brazilian", 4, "Cadu"));
    assert_eq!(state.places.len(), 1);
    assert!(state.form.is_none());
    let place = &state.places[0];
    assert_eq!(place.name, "Test Cafe");
    assert_eq!(place.coordinates, at);
    assert_eq!(place.recommended_by.as_deref(), Some("Cadu"));
    assert_eq!(place.city, DEFAULT_CITY_KEY);

    let markers = state.markers();
    assert_eq!(markers.len(), 1);
    assert_eq!(markers[0].id, place.id);

    let state = state.apply(ExplorerAction::SelectCategory(Selection::Only(
        "Italian".to_string(),
    )));
    assert!(state.markers().is_empty());
    assert_eq!(state.places.len(), 1);
}

#[test]
fn clicks_ignored_outside_admin_or_with_open_form() {
    let state = ExplorerState::new().apply(ExplorerAction::MapClicked(LngLat::new(1.0, 1.0)));
    assert!(state.form.is_none());

    let state = admin_state().apply(ExplorerAction::MapClicked(LngLat::new(1.0, 1.0)));
    let state = state.apply(ExplorerAction::MapClicked(LngLat::new(2.0, 2.0)));
    assert_eq!(
        state.form.as_ref().map(|session| session.mode.clone()),
        Some(FormMode::Create {
            coords: LngLat::new(1.0, 1.0)
        })
    );
}

#[test]
fn clicks_on_repeated_world_open_wrapped_form() {
    let state = admin_state().apply(ExplorerAction::MapClicked(LngLat::new(313.37, -23.55)));
    let coords = match state.form.as_ref().map(|session| &session.mode) {
        Some(FormMode::Create { coords }) => *coords,
        other => panic!("expected create form, got {other:?}"),
    };
    assert!((coords.lng - -46.63).abs() < 1e-9);
    assert_eq!(coords.lat, -23.55);

    let state = admin_state().apply(ExplorerAction::MapClicked(LngLat::new(f64::NAN, 0.0)));
    assert!(state.form.is_none());
    let state = admin_state().apply(ExplorerAction::MapClicked(LngLat::new(10.0, 95.0)));
    assert!(state.form.is_none());
}

#[test]
fn edit_keeps_identity_and_position() {
    let mut rng = SmallRng::seed_from_u64(2);
    let at = LngLat::new(-46.64, -23.56);
    let state = add_place(&admin_state(), &mut rng, at, &fill("Sushi Bar", "Japanese", 3, "Cadu"));
    let id = state.places[0].id.clone();

    let state = state.apply(ExplorerAction::BeginEdit(id.clone()));
    let session = state.form.clone().expect("edit form open");
    let initial = session.initial.expect("edit form carries the record");
    let form = PlaceFormState::for_edit(&initial)
        .apply(FormEdit::Name("Sushi House".to_string()))
        .apply(FormEdit::Rating(Some(5)))
        .apply(FormEdit::Category("Italian".to_string()))
        .apply(FormEdit::RecommendedBy("Danilo Carneiro".to_string()))
        .apply(FormEdit::Review("Great".to_string()));
    let draft = form.validate(&schema()).expect("valid edit");
    let state = state.apply(ExplorerAction::SubmitForm {
        draft,
        new_id: PlaceId::generate(&mut rng),
    });

    assert_eq!(state.places.len(), 1);
    let place = &state.places[0];
    assert_eq!(place.id, id);
    assert_eq!(place.coordinates, at);
    assert_eq!(place.name, "Sushi House");
    assert_eq!(place.rating, 5);
    assert_eq!(place.category, "Italian");
    assert_eq!(place.review, "Great");
    assert_eq!(place.recommended_by.as_deref(), Some("Danilo Carneiro"));
}

#[test]
fn editing_focused_place_refreshes_focus() {
    let mut rng = SmallRng::seed_from_u64(3);
    let at = LngLat::new(-46.65, -23.57);
    let state = add_place(&admin_state(), &mut rng, at, &fill("Cantina", "Italian", 4, "Cadu"));
    let id = state.places[0].id.clone();
    let state = state.apply(ExplorerAction::FocusPlace(id.clone()));
    let version = state.focus.version;

    let state = state.apply(ExplorerAction::BeginEdit(id));
    let draft = fill("Cantina Nova", "Italian", 4, "Cadu")
        .validate(&schema())
        .expect("valid");
    let state = state.apply(ExplorerAction::SubmitForm {
        draft,
        new_id: PlaceId::generate(&mut rng),
    });
    assert_eq!(state.focus.target, Some(at));
    assert!(state.focus.version > version);
}

#[test]
fn delete_clears_focus_only_for_focused_place() {
    let mut rng = SmallRng::seed_from_u64(4);
    let first_at = LngLat::new(-46.60, -23.50);
    let second_at = LngLat::new(-46.61, -23.51);
    let state = add_place(&admin_state(), &mut rng, first_at, &fill("One", "Italian", 4, "Cadu"));
    let state = add_place(&state, &mut rng, second_at, &fill("Two", "Italian", 4, "Cadu"));
    let two = state.places[0].id.clone();
    let one = state.places[1].id.clone();

    let focused = state.apply(ExplorerAction::FocusPlace(one.clone()));
    let after = focused.apply(ExplorerAction::DeletePlace(two));
    assert_eq!(after.focus, focused.focus);
    assert_eq!(after.places.len(), 1);

    let after = after.apply(ExplorerAction::DeletePlace(one));
    assert_eq!(after.focus.target, None);
    assert!(after.places.is_empty());
}

#[test]
fn delete_keeps_focus_on_other_place_at_same_point() {
    let mut rng = SmallRng::seed_from_u64(8);
    let at = LngLat::new(-46.63, -23.55);
    let state = add_place(&admin_state(), &mut rng, at, &fill("First", "Italian", 4, "Cadu"));
    let state = add_place(&state, &mut rng, at, &fill("Second", "Italian", 4, "Cadu"));
    let second = state.places[0].id.clone();
    let first = state.places[1].id.clone();

    let focused = state.apply(ExplorerAction::FocusPlace(second.clone()));
    assert_eq!(
        focused.focused_place().map(|place| place.id.clone()),
        Some(second.clone())
    );

    let after = focused.apply(ExplorerAction::DeletePlace(first));
    assert_eq!(after.focus, focused.focus);
    assert_eq!(
        after.focused_place().map(|place| place.id.clone()),
        Some(second)
    );
}

#[test]
fn focused_place_is_the_one_picked_among_shared_points() {
    let mut rng = SmallRng::seed_from_u64(9);
    let at = LngLat::new(-46.62, -23.54);
    let state = add_place(&admin_state(), &mut rng, at, &fill("Front", "Italian", 4, "Cadu"));
    let state = add_place(&state, &mut rng, at, &fill("Back", "Italian", 4, "Cadu"));
    let older = state.places[1].id.clone();

    let state = state.apply(ExplorerAction::FocusPlace(older.clone()));
    let focused = state.focused_place().expect("focused place visible");
    assert_eq!(focused.id, older);
    assert_eq!(focused.name, "Front");
}

#[test]
fn delete_closes_edit_form_for_that_place() {
    let mut rng = SmallRng::seed_from_u64(10);
    let state = add_place(
        &admin_state(),
        &mut rng,
        LngLat::new(-46.6, -23.5),
        &fill("Doomed", "Italian", 4, "Cadu"),
    );
    let state = add_place(
        &state,
        &mut rng,
        LngLat::new(-46.7, -23.6),
        &fill("Other", "Italian", 4, "Cadu"),
    );
    let other = state.places[0].id.clone();
    let doomed = state.places[1].id.clone();

    let editing = state.apply(ExplorerAction::BeginEdit(doomed.clone()));
    let kept = editing.apply(ExplorerAction::DeletePlace(other));
    assert!(kept.form.is_some());

    let closed = kept.apply(ExplorerAction::DeletePlace(doomed));
    assert!(closed.form.is_none());
    assert!(closed.places.is_empty());
}

#[test]
fn delete_requires_admin_mode() {
    let mut rng = SmallRng::seed_from_u64(11);
    let state = add_place(
        &admin_state(),
        &mut rng,
        LngLat::new(-46.6, -23.5),
        &fill("Keeper", "Italian", 4, "Cadu"),
    );
    let id = state.places[0].id.clone();
    let state = state
        .apply(ExplorerAction::FocusPlace(id.clone()))
        .apply(ExplorerAction::SetAdminMode(false));

    let after = state.apply(ExplorerAction::DeletePlace(id));
    assert_eq!(after.places, state.places);
    assert_eq!(after.focus, state.focus);
}

#[test]
fn focusing_same_place_twice_bumps_version() {
    let mut rng = SmallRng::seed_from_u64(5);
    let state = add_place(
        &admin_state(),
        &mut rng,
        LngLat::new(-46.6, -23.5),
        &fill("Doces", "Brazilian", 5, "Cadu"),
    );
    let id = state.places[0].id.clone();
    let once = state.apply(ExplorerAction::FocusPlace(id.clone()));
    let twice = once.apply(ExplorerAction::FocusPlace(id));
    assert_eq!(once.focus.target, twice.focus.target);
    assert!(twice.focus.version > once.focus.version);

    let overview = twice.apply(ExplorerAction::ClearFocus);
    assert_eq!(overview.focus.target, None);
    assert_eq!(overview.focus.version, 0);
}

#[test]
fn invalid_submissions_are_rejected() {
    let blank = fill("   ", "Italian", 4, "Cadu");
    assert_eq!(blank.validate(&schema()), Err(FormError::MissingName));

    for rating in [0u8, 6] {
        let form = fill("Valid", "Italian", rating, "Cadu");
        assert!(matches!(
            form.validate(&schema()),
            Err(FormError::RatingOutOfRange { .. })
        ));
    }

    let missing_rating = fill("Valid", "Italian", 3, "Cadu").apply(FormEdit::Rating(None));
    assert_eq!(missing_rating.validate(&schema()), Err(FormError::MissingRating));

    let state = admin_state().apply(ExplorerAction::MapClicked(LngLat::new(-46.6, -23.5)));
    let state = match blank.validate(&schema()) {
        Ok(draft) => state.apply(ExplorerAction::SubmitForm {
            draft,
            new_id: PlaceId::generate(&mut SmallRng::seed_from_u64(6)),
        }),
        Err(_) => state,
    };
    assert!(state.places.is_empty());
    assert!(state.form.is_some());
}

#[test]
fn admin_off_blocks_edit() {
    let mut rng = SmallRng::seed_from_u64(7);
    let state = add_place(
        &admin_state(),
        &mut rng,
        LngLat::new(-46.6, -23.5),
        &fill("Spot", "Italian", 4, "Cadu"),
    );
    let id = state.places[0].id.clone();
    let state = state.apply(ExplorerAction::SetAdminMode(false));
    assert!(state.markers().iter().all(|marker| !marker.actions.any()));
    let state = state.apply(ExplorerAction::BeginEdit(id));
    assert!(state.form.is_none());
}

#[test]
fn transitions_leave_previous_state_untouched() {
    let before = admin_state();
    let _after = before.apply(ExplorerAction::MapClicked(LngLat::new(1.0, 1.0)));
    assert!(before.form.is_none());
}
