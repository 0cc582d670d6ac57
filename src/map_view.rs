use std::cell::RefCell;
use std::rc::Rc;

use city_explorer_core::{
    CameraCommand, CameraDirector, CameraZooms, ExplorerAction, ExplorerState, MarkerReconciler,
    PlaceId, ReconcileOutcome, TileProviderKind, MAP_SETTINGS,
};
use web_sys::HtmlElement;
use yew::prelude::*;

use crate::app_core::{use_explorer, ExplorerHandle};
use crate::leaflet::{event_lng_lat, MapHandle, MapOptions, Pin, PinLayer};

#[derive(Properties, PartialEq)]
pub(crate) struct MapViewProps {
    pub(crate) provider: TileProviderKind,
    #[prop_or_default]
    pub(crate) access_token: Option<AttrValue>,
    /// Shown instead of the map when the provider cannot serve tiles.
    #[prop_or_default]
    pub(crate) children: Html,
}

struct MapSession {
    reconciler: MarkerReconciler<Pin>,
    surface: PinLayer,
    camera: CameraDirector,
    popup_version: u64,
    sidebar_visible: bool,
    // Dropped last so pins are gone before the map is removed.
    map: MapHandle,
}

impl MapSession {
    fn open(
        container: &HtmlElement,
        tile_url: &str,
        provider: TileProviderKind,
        explorer: &ExplorerHandle,
        admin_live: Rc<RefCell<bool>>,
        state: &ExplorerState,
    ) -> Result<Self, String> {
        let mut map = MapHandle::open(
            container,
            &MapOptions {
                tile_url,
                attribution: provider.attribution(),
                center: MAP_SETTINGS.initial_center,
                zoom: MAP_SETTINGS.initial_zoom,
                max_zoom: MAP_SETTINGS.max_zoom,
            },
        )?;
        {
            let explorer = explorer.clone();
            map.on_click(move |event| {
                if !*admin_live.borrow() {
                    return;
                }
                if let Some(coords) = event_lng_lat(&event) {
                    explorer.dispatch(ExplorerAction::MapClicked(coords));
                }
            });
        }
        let on_edit = {
            let explorer = explorer.clone();
            Callback::from(move |id: PlaceId| explorer.dispatch(ExplorerAction::BeginEdit(id)))
        };
        let on_delete = {
            let explorer = explorer.clone();
            Callback::from(move |id: PlaceId| explorer.dispatch(ExplorerAction::DeletePlace(id)))
        };
        let surface = map.surface(on_edit, on_delete);
        Ok(Self {
            reconciler: MarkerReconciler::new(),
            surface,
            camera: CameraDirector::new(CameraZooms {
                overview: MAP_SETTINGS.overview_zoom,
                focus: MAP_SETTINGS.focus_zoom,
            }),
            popup_version: state.focus.version,
            sidebar_visible: state.sidebar_visible,
            map,
        })
    }

    fn sync(&mut self, state: &ExplorerState) {
        if self.sidebar_visible != state.sidebar_visible {
            self.sidebar_visible = state.sidebar_visible;
            self.map.invalidate_size();
        }

        for command in self.camera.update(state.city_view(), state.focus.clone()) {
            match command {
                CameraCommand::FlyTo { center, zoom } => self.map.fly_to(center, zoom),
            }
        }

        let markers = state.markers();
        let outcome = self
            .reconciler
            .reconcile(&mut self.surface, &markers, state.admin_mode);
        log_outcome(outcome);

        if self.popup_version != state.focus.version {
            self.popup_version = state.focus.version;
            let pin = state
                .focused_place()
                .and_then(|place| self.reconciler.pin(&place.id));
            if let Some(pin) = pin {
                pin.open_popup();
            }
        }
    }
}

fn log_outcome(outcome: ReconcileOutcome) {
    #[cfg(target_arch = "wasm32")]
    {
        if let ReconcileOutcome::Redrawn {
            kept,
            refreshed,
            created,
            removed,
        } = outcome
        {
            gloo::console::log!(format!(
                "map: redraw kept={kept} refreshed={refreshed} created={created} removed={removed}"
            ));
        }
    }
    #[cfg(not(target_arch = "wasm32"))]
    let _ = outcome;
}

impl Drop for MapSession {
    fn drop(&mut self) {
        self.reconciler.clear(&mut self.surface);
    }
}

#[function_component(MapView)]
pub(crate) fn map_view(props: &MapViewProps) -> Html {
    let explorer = use_explorer();
    let container = use_node_ref();
    let session = use_mut_ref(|| None::<MapSession>);
    let admin_live = use_mut_ref(|| false);
    let tile_url = props
        .provider
        .url_template(props.access_token.as_deref());

    if let Some((_, state)) = explorer.as_ref() {
        *admin_live.borrow_mut() = state.admin_mode;
    }

    {
        let session = session.clone();
        use_effect_with(tile_url.clone(), move |_| {
            move || {
                session.borrow_mut().take();
            }
        });
    }

    {
        let session = session.clone();
        let container = container.clone();
        let admin_live = admin_live.clone();
        let provider = props.provider;
        let tile_url = tile_url.clone();
        let explorer = explorer.clone();
        use_effect(move || {
            let (Some((handle, state)), Some(tile_url)) = (explorer, tile_url) else {
                return;
            };
            let mut session = session.borrow_mut();
            if session.is_none() {
                // Container not mounted yet; the next render retries.
                let Some(element) = container.cast::<HtmlElement>() else {
                    return;
                };
                match MapSession::open(&element, &tile_url, provider, &handle, admin_live, &state) {
                    Ok(opened) => {
                        #[cfg(target_arch = "wasm32")]
                        gloo::console::log!("map: initialized");
                        *session = Some(opened);
                    }
                    Err(err) => {
                        #[cfg(target_arch = "wasm32")]
                        gloo::console::warn!("map: init failed", err);
                        #[cfg(not(target_arch = "wasm32"))]
                        let _ = err;
                        return;
                    }
                }
            }
            if let Some(session) = session.as_mut() {
                session.sync(&state);
            }
        });
    }

    if tile_url.is_none() {
        return html! {
            <div class="map-placeholder">
                { props.children.clone() }
            </div>
        };
    }

    let form_open = explorer
        .as_ref()
        .is_some_and(|(_, state)| state.form_open());
    let class = classes!("map-canvas", form_open.then_some("map-canvas--dimmed"));
    html! {
        <div ref={container} {class} />
    }
}
