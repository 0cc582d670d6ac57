use std::rc::Rc;

use city_explorer_core::{
    star_string, ExplorerAction, ExplorerState, FormMode, FormSchema, FormVariant, Place,
    PlaceDraft, PlaceId, Selection, ALL_LABEL, CATEGORIES, CITY_CATALOG, MAP_SETTINGS,
    RECOMMENDERS,
};
use gloo::timers::callback::Timeout;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::app_core::{use_explorer, ExplorerCore, ExplorerHandle};
use crate::map_view::MapView;
use crate::persisted::{clear_map_token, load_map_token, save_map_token};
use crate::place_form::PlaceForm;

const NOTICE_TIMEOUT_MS: u32 = 4_000;

#[derive(Properties, PartialEq)]
pub(crate) struct AppProps {
    #[prop_or_else(default_handle)]
    pub(crate) explorer: ExplorerHandle,
}

impl Default for AppProps {
    fn default() -> Self {
        Self {
            explorer: default_handle(),
        }
    }
}

fn default_handle() -> ExplorerHandle {
    ExplorerHandle::new(ExplorerCore::new())
}

#[function_component(App)]
pub(crate) fn app(props: &AppProps) -> Html {
    html! {
        <ContextProvider<ExplorerHandle> context={props.explorer.clone()}>
            <Shell />
        </ContextProvider<ExplorerHandle>>
    }
}

fn select_value(event: &Event) -> String {
    let select: HtmlSelectElement = event.target_unchecked_into();
    select.value()
}

fn form_key(mode: &FormMode) -> String {
    match mode {
        FormMode::Create { coords } => format!("create:{coords}"),
        FormMode::Edit { id } => format!("edit:{id}"),
    }
}

fn count_label(count: usize) -> String {
    format!("Places ({count})")
}

#[function_component(Shell)]
fn shell() -> Html {
    let explorer = use_explorer();
    let schema = use_memo((), |_| FormSchema::from_catalog());
    let map_token = use_state(load_map_token);

    let notice = explorer
        .as_ref()
        .and_then(|(_, state)| state.notice.clone());
    {
        let handle = explorer.as_ref().map(|(handle, _)| handle.clone());
        use_effect_with(notice, move |notice| {
            let timeout = match (notice, handle) {
                (Some(_), Some(handle)) => Some(Timeout::new(NOTICE_TIMEOUT_MS, move || {
                    handle.dispatch(ExplorerAction::DismissNotice)
                })),
                _ => None,
            };
            move || drop(timeout)
        });
    }

    let Some((handle, state)) = explorer else {
        return html! { <p class="app-error">{"Explorer store missing."}</p> };
    };

    let dispatch = |action: fn(String) -> ExplorerAction| {
        let handle = handle.clone();
        Callback::from(move |event: Event| handle.dispatch(action(select_value(&event))))
    };
    let on_city = dispatch(ExplorerAction::SelectCity);
    let on_category = dispatch(|label| ExplorerAction::SelectCategory(Selection::from_label(&label)));
    let on_recommender =
        dispatch(|label| ExplorerAction::SelectRecommender(Selection::from_label(&label)));
    let on_admin = {
        let handle = handle.clone();
        Callback::from(move |event: Event| {
            let input: HtmlInputElement = event.target_unchecked_into();
            handle.dispatch(ExplorerAction::SetAdminMode(input.checked()));
        })
    };
    let on_toggle_sidebar = {
        let handle = handle.clone();
        Callback::from(move |_: MouseEvent| handle.dispatch(ExplorerAction::ToggleSidebar))
    };
    let on_dismiss_notice = {
        let handle = handle.clone();
        Callback::from(move |_: MouseEvent| handle.dispatch(ExplorerAction::DismissNotice))
    };
    let on_save_token = {
        let map_token = map_token.clone();
        Callback::from(move |token: String| {
            save_map_token(&token);
            map_token.set(load_map_token());
        })
    };
    let on_clear_token = {
        let map_token = map_token.clone();
        Callback::from(move |_: MouseEvent| {
            clear_map_token();
            map_token.set(None);
        })
    };

    let provider = MAP_SETTINGS.provider;
    let access_token = (*map_token).clone().map(AttrValue::from);
    let sidebar_class = classes!(
        "sidebar-panel",
        (!state.sidebar_visible).then_some("sidebar-panel--hidden")
    );
    let map_class = classes!(
        "map-section",
        state.sidebar_visible.then_some("map-section--shifted")
    );

    html! {
        <div class="app">
            <header class="app-header">
                <div class="app-header__title">
                    <button
                        type="button"
                        class="button button--ghost toggle-button"
                        aria-label={if state.sidebar_visible { "Hide sidebar" } else { "Show sidebar" }}
                        onclick={on_toggle_sidebar}
                    >
                        {if state.sidebar_visible { "⟨" } else { "⟩" }}
                    </button>
                    <div>
                        <h1>{"City Explorer"}</h1>
                        <p class="subtitle">{"Curated places worth visiting"}</p>
                    </div>
                </div>
                <div class="app-header__controls">
                    if provider.requires_token() && map_token.is_some() {
                        <button type="button" class="button button--ghost" onclick={on_clear_token}>
                            {"Forget map token"}
                        </button>
                    }
                    <label class="switch">
                        <span>{"Admin mode"}</span>
                        <input type="checkbox" checked={state.admin_mode} onchange={on_admin} />
                    </label>
                </div>
            </header>
            <main class="app-main">
                <aside class={sidebar_class}>
                    <FilterCard
                        city={state.filters.city.clone()}
                        category={state.filters.category.label().to_string()}
                        recommender={state.filters.recommender.label().to_string()}
                        {on_city}
                        {on_category}
                        {on_recommender}
                    />
                    if let Some(notice) = state.notice.clone() {
                        <div class="notice" role="status">
                            <span>{notice}</span>
                            <button type="button" class="button button--ghost" onclick={on_dismiss_notice}>
                                {"Dismiss"}
                            </button>
                        </div>
                    }
                    <PlaceList />
                </aside>
                <section class={map_class}>
                    <MapView {provider} {access_token}>
                        <TokenPrompt on_save={on_save_token} />
                    </MapView>
                </section>
            </main>
            <FormOverlay schema={schema.clone()} state={state.clone()} handle={handle.clone()} />
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct FilterCardProps {
    city: String,
    category: String,
    recommender: String,
    on_city: Callback<Event>,
    on_category: Callback<Event>,
    on_recommender: Callback<Event>,
}

#[function_component(FilterCard)]
fn filter_card(props: &FilterCardProps) -> Html {
    let option = |value: &str, selected: &str| {
        html! {
            <option value={value.to_string()} selected={value == selected}>{value.to_string()}</option>
        }
    };
    let cities: Html = CITY_CATALOG
        .iter()
        .map(|city| option(city.key, &props.city))
        .collect();
    let categories: Html = std::iter::once(ALL_LABEL)
        .chain(CATEGORIES.iter().copied())
        .map(|category| option(category, &props.category))
        .collect();
    let recommenders: Html = std::iter::once(ALL_LABEL)
        .chain(RECOMMENDERS.iter().map(|entry| entry.name))
        .map(|name| option(name, &props.recommender))
        .collect();

    html! {
        <section class="card">
            <h2 class="card__title">{"Filters"}</h2>
            <label class="field">
                <span>{"City"}</span>
                <select onchange={props.on_city.clone()}>{cities}</select>
            </label>
            <label class="field">
                <span>{"Category"}</span>
                <select onchange={props.on_category.clone()}>{categories}</select>
            </label>
            <label class="field">
                <span>{"Recommended by"}</span>
                <select onchange={props.on_recommender.clone()}>{recommenders}</select>
            </label>
        </section>
    }
}

#[function_component(PlaceList)]
fn place_list() -> Html {
    let Some((handle, state)) = use_explorer() else {
        return html! {};
    };
    let places = state.visible_places();
    let focused_id = state.focused_place().map(|place| place.id.clone());

    let on_overview = {
        let handle = handle.clone();
        Callback::from(move |_: MouseEvent| handle.dispatch(ExplorerAction::ClearFocus))
    };

    let cards: Html = places
        .iter()
        .map(|place| {
            let focused = focused_id.as_ref() == Some(&place.id);
            html! {
                <PlaceCard
                    key={place.id.to_string()}
                    place={(*place).clone()}
                    {focused}
                    admin_mode={state.admin_mode}
                    handle={handle.clone()}
                />
            }
        })
        .collect();

    html! {
        <section class="card">
            <h2 class="card__title">{count_label(places.len())}</h2>
            if state.focus.place.is_some() {
                <button type="button" class="button button--outline wide" onclick={on_overview}>
                    {"Return to City Overview"}
                </button>
            }
            if places.is_empty() {
                <div class="empty-hint">
                    <p>{"No places yet."}</p>
                    if state.admin_mode {
                        <p class="empty-hint__admin">{"Click on the map to add your first one."}</p>
                    }
                </div>
            }
            {cards}
        </section>
    }
}

#[derive(Properties, PartialEq)]
struct PlaceCardProps {
    place: Place,
    focused: bool,
    admin_mode: bool,
    handle: ExplorerHandle,
}

#[function_component(PlaceCard)]
fn place_card(props: &PlaceCardProps) -> Html {
    let place = &props.place;
    let action = |build: fn(PlaceId) -> ExplorerAction| {
        let handle = props.handle.clone();
        let id = place.id.clone();
        Callback::from(move |event: MouseEvent| {
            event.stop_propagation();
            handle.dispatch(build(id.clone()));
        })
    };
    let on_focus = action(ExplorerAction::FocusPlace);
    let on_edit = action(ExplorerAction::BeginEdit);
    let on_delete = action(ExplorerAction::DeletePlace);

    let class = classes!("place-card", props.focused.then_some("place-card--focused"));
    let stars = star_string(f64::from(place.rating));
    html! {
        <div {class} onclick={on_focus}>
            <div class="place-card__name">{place.name.clone()}</div>
            <div class="place-card__meta">
                {format!("{} • {} ({})", place.category, stars, place.rating)}
            </div>
            if let Some(name) = place.recommended_by.clone() {
                <div class="place-card__meta">{format!("Recommended by {name}")}</div>
            }
            if !place.review.is_empty() {
                <div class="place-card__review">{place.review.clone()}</div>
            }
            if props.focused {
                <div class="place-card__focus">{"Map focused here"}</div>
            }
            if props.admin_mode {
                <div class="place-card__actions">
                    <button type="button" class="button button--ghost" onclick={on_edit}>{"Edit"}</button>
                    <button type="button" class="button button--danger" onclick={on_delete}>{"Delete"}</button>
                </div>
            }
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct FormOverlayProps {
    schema: Rc<FormSchema>,
    state: Rc<ExplorerState>,
    handle: ExplorerHandle,
}

/// Backdrop plus the open form. Docked beside the sidebar when it is visible.
#[function_component(FormOverlay)]
fn form_overlay(props: &FormOverlayProps) -> Html {
    let Some(session) = props.state.form.as_ref() else {
        return html! {};
    };
    let on_close = {
        let handle = props.handle.clone();
        Callback::from(move |_: ()| handle.dispatch(ExplorerAction::CloseForm))
    };
    let on_backdrop = {
        let on_close = on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };
    let on_submit = {
        let handle = props.handle.clone();
        Callback::from(move |draft: PlaceDraft| handle.submit(draft))
    };
    let variant = if props.state.sidebar_visible {
        FormVariant::Sidebar
    } else {
        FormVariant::Dialog
    };
    let class = classes!(
        "form-overlay",
        (variant == FormVariant::Sidebar).then_some("form-overlay--shifted")
    );
    html! {
        <>
            <div class="form-backdrop" onclick={on_backdrop} />
            <div {class}>
                <PlaceForm
                    key={form_key(&session.mode)}
                    open=true
                    mode={session.mode.clone()}
                    initial={session.initial.clone()}
                    {variant}
                    schema={props.schema.clone()}
                    {on_submit}
                    {on_close}
                />
            </div>
        </>
    }
}

#[derive(Properties, PartialEq)]
struct TokenPromptProps {
    on_save: Callback<String>,
}

#[function_component(TokenPrompt)]
fn token_prompt(props: &TokenPromptProps) -> Html {
    let input = use_node_ref();
    let onsubmit = {
        let input = input.clone();
        let on_save = props.on_save.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            if let Some(input) = input.cast::<HtmlInputElement>() {
                let value = input.value();
                if !value.trim().is_empty() {
                    on_save.emit(value);
                }
            }
        })
    };
    html! {
        <form class="token-prompt" {onsubmit}>
            <h2>{"Map access token required"}</h2>
            <p>{"The configured tile provider needs an access token. It is stored only in this browser."}</p>
            <input ref={input} type="password" placeholder="Paste your access token" />
            <button type="submit" class="button button--primary">{"Save token"}</button>
        </form>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use city_explorer_core::LngLat;
    use console_error_panic_hook::set_once as set_panic_hook;
    use gloo::timers::future::TimeoutFuture;
    use wasm_bindgen_test::*;

    fn mount(explorer: ExplorerHandle) -> web_sys::Element {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .expect("document available");
        let root = document.create_element("div").expect("create test root");
        document
            .body()
            .expect("body available")
            .append_child(&root)
            .expect("append test root");
        yew::Renderer::<App>::with_root_and_props(root.clone(), AppProps { explorer }).render();
        root
    }

    fn text_of(root: &web_sys::Element, selector: &str) -> Option<String> {
        root.query_selector(selector)
            .ok()
            .flatten()
            .and_then(|node| node.text_content())
    }

    #[wasm_bindgen_test]
    fn form_keys_follow_session() {
        let coords = LngLat::new(-46.63, -23.55);
        assert_eq!(
            form_key(&FormMode::Create { coords }),
            "create:-46.63000, -23.55000"
        );
        assert_eq!(count_label(0), "Places (0)");
    }

    #[wasm_bindgen_test(async)]
    async fn shell_lists_added_place() {
        set_panic_hook();
        let core = ExplorerCore::with_state(ExplorerState::new(), 3);
        let root = mount(ExplorerHandle::new(core.clone()));
        TimeoutFuture::new(0).await;
        assert_eq!(text_of(&root, "h1").as_deref(), Some("City Explorer"));
        assert_eq!(text_of(&root, ".card + .card .card__title").as_deref(), Some("Places (0)"));

        core.dispatch(ExplorerAction::SetAdminMode(true));
        core.dispatch(ExplorerAction::MapClicked(LngLat::new(-46.63, -23.55)));
        TimeoutFuture::new(0).await;
        assert!(root.query_selector(".place-form").ok().flatten().is_some());

        core.submit(PlaceDraft {
            name: "Test Cafe".to_string(),
            category: "Brazilian".to_string(),
            rating: 4,
            review: String::new(),
            recommended_by: Some("Cadu".to_string()),
            image: None,
        });
        TimeoutFuture::new(0).await;
        assert!(root.query_selector(".place-form").ok().flatten().is_none());
        assert_eq!(text_of(&root, ".place-card__name").as_deref(), Some("Test Cafe"));
        assert_eq!(
            text_of(&root, ".notice span").as_deref(),
            Some("Test Cafe added to São Paulo.")
        );
    }
}
