//! Leaflet bindings and the pin layer that backs marker reconciliation.
//!
//! Only the handful of `L.*` calls the map view needs are declared. Popups are
//! built as DOM nodes with `text_content`, never from HTML strings.

use city_explorer_core::{LngLat, Marker, MarkerSurface, PlaceId, PopupContent, PopupImage};
use gloo::events::EventListener;
use js_sys::{Array, Function, Object, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlButtonElement, HtmlElement, HtmlImageElement};
use yew::Callback;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = L, js_name = Map)]
    type LeafletMap;

    #[wasm_bindgen(js_namespace = L, js_name = map)]
    fn create_map(container: &HtmlElement, options: &JsValue) -> LeafletMap;

    #[wasm_bindgen(method, js_name = setView)]
    fn set_view(this: &LeafletMap, center: &Array, zoom: f64) -> LeafletMap;

    #[wasm_bindgen(method, js_name = flyTo)]
    fn fly_to(this: &LeafletMap, center: &Array, zoom: f64) -> LeafletMap;

    #[wasm_bindgen(method, js_name = invalidateSize)]
    fn invalidate_size(this: &LeafletMap) -> LeafletMap;

    #[wasm_bindgen(method)]
    fn on(this: &LeafletMap, event: &str, handler: &Function) -> LeafletMap;

    #[wasm_bindgen(method)]
    fn off(this: &LeafletMap, event: &str, handler: &Function) -> LeafletMap;

    #[wasm_bindgen(method)]
    fn remove(this: &LeafletMap) -> LeafletMap;

    #[wasm_bindgen(js_namespace = L, js_name = TileLayer)]
    type TileLayer;

    #[wasm_bindgen(js_namespace = L, js_name = tileLayer)]
    fn create_tile_layer(url_template: &str, options: &JsValue) -> TileLayer;

    #[wasm_bindgen(method, js_name = addTo)]
    fn add_to(this: &TileLayer, map: &LeafletMap) -> TileLayer;

    #[wasm_bindgen(js_namespace = L, js_name = LayerGroup)]
    #[derive(Clone)]
    type LayerGroup;

    #[wasm_bindgen(js_namespace = L, js_name = layerGroup)]
    fn create_layer_group() -> LayerGroup;

    #[wasm_bindgen(method, js_name = addTo)]
    fn add_to(this: &LayerGroup, map: &LeafletMap) -> LayerGroup;

    #[wasm_bindgen(method, js_name = addLayer)]
    fn add_layer(this: &LayerGroup, layer: &LeafletMarker) -> LayerGroup;

    #[wasm_bindgen(method, js_name = removeLayer)]
    fn remove_layer(this: &LayerGroup, layer: &LeafletMarker) -> LayerGroup;

    #[wasm_bindgen(method, js_name = clearLayers)]
    fn clear_layers(this: &LayerGroup) -> LayerGroup;

    #[wasm_bindgen(js_namespace = L, js_name = Marker)]
    type LeafletMarker;

    #[wasm_bindgen(js_namespace = L, js_name = marker)]
    fn create_marker(lat_lng: &Array, options: &JsValue) -> LeafletMarker;

    #[wasm_bindgen(method, js_name = bindPopup)]
    fn bind_popup(this: &LeafletMarker, content: &JsValue, options: &JsValue) -> LeafletMarker;

    #[wasm_bindgen(method, js_name = setPopupContent)]
    fn set_popup_content(this: &LeafletMarker, content: &JsValue) -> LeafletMarker;

    #[wasm_bindgen(method, js_name = openPopup)]
    fn open_popup(this: &LeafletMarker) -> LeafletMarker;
}

const POPUP_MAX_WIDTH: f64 = 280.0;

/// Leaflet is loaded from a script tag; without it no `L.*` call is safe.
pub(crate) fn leaflet_available() -> bool {
    web_sys::window()
        .and_then(|window| Reflect::get(&window, &JsValue::from_str("L")).ok())
        .is_some_and(|value| value.is_object())
}

fn lat_lng(point: LngLat) -> Array {
    let (lat, lng) = point.lat_lng();
    Array::of2(&JsValue::from_f64(lat), &JsValue::from_f64(lng))
}

fn options(entries: &[(&str, JsValue)]) -> JsValue {
    let object = Object::new();
    for (key, value) in entries {
        let _ = Reflect::set(&object, &JsValue::from_str(key), value);
    }
    object.into()
}

/// Reads `event.latlng` from a Leaflet mouse event.
pub(crate) fn event_lng_lat(event: &JsValue) -> Option<LngLat> {
    let latlng = Reflect::get(event, &JsValue::from_str("latlng")).ok()?;
    let lat = Reflect::get(&latlng, &JsValue::from_str("lat")).ok()?.as_f64()?;
    let lng = Reflect::get(&latlng, &JsValue::from_str("lng")).ok()?.as_f64()?;
    Some(LngLat::new(lng, lat).wrapped())
}

pub(crate) struct MapOptions<'a> {
    pub(crate) tile_url: &'a str,
    pub(crate) attribution: &'a str,
    pub(crate) center: LngLat,
    pub(crate) zoom: f64,
    pub(crate) max_zoom: f64,
}

/// A live Leaflet map with its base tiles and the layer holding place pins.
/// Dropping it detaches the click handler and destroys the map.
pub(crate) struct MapHandle {
    map: LeafletMap,
    pins: LayerGroup,
    click: Option<Closure<dyn FnMut(JsValue)>>,
}

impl MapHandle {
    pub(crate) fn open(container: &HtmlElement, opts: &MapOptions<'_>) -> Result<Self, String> {
        if !leaflet_available() {
            return Err("leaflet is not loaded".to_string());
        }
        let map = create_map(
            container,
            &options(&[
                ("zoomControl", JsValue::TRUE),
                ("maxZoom", JsValue::from_f64(opts.max_zoom)),
            ]),
        );
        map.set_view(&lat_lng(opts.center), opts.zoom);
        create_tile_layer(
            opts.tile_url,
            &options(&[
                ("attribution", JsValue::from_str(opts.attribution)),
                ("maxZoom", JsValue::from_f64(opts.max_zoom)),
            ]),
        )
        .add_to(&map);
        let pins = create_layer_group().add_to(&map);
        Ok(Self {
            map,
            pins,
            click: None,
        })
    }

    /// Replaces the single click handler.
    pub(crate) fn on_click<F>(&mut self, handler: F)
    where
        F: FnMut(JsValue) + 'static,
    {
        if let Some(previous) = self.click.take() {
            self.map.off("click", previous.as_ref().unchecked_ref());
        }
        let closure = Closure::<dyn FnMut(JsValue)>::new(handler);
        self.map.on("click", closure.as_ref().unchecked_ref());
        self.click = Some(closure);
    }

    pub(crate) fn fly_to(&self, center: LngLat, zoom: f64) {
        self.map.fly_to(&lat_lng(center), zoom);
    }

    pub(crate) fn invalidate_size(&self) {
        self.map.invalidate_size();
    }

    pub(crate) fn surface(&self, on_edit: Callback<PlaceId>, on_delete: Callback<PlaceId>) -> PinLayer {
        PinLayer {
            layer: self.pins.clone(),
            on_edit,
            on_delete,
        }
    }
}

impl Drop for MapHandle {
    fn drop(&mut self) {
        if let Some(click) = self.click.take() {
            self.map.off("click", click.as_ref().unchecked_ref());
        }
        self.pins.clear_layers();
        self.map.remove();
    }
}

pub(crate) struct Pin {
    marker: LeafletMarker,
    _listeners: Vec<EventListener>,
}

impl Pin {
    pub(crate) fn open_popup(&self) {
        self.marker.open_popup();
    }
}

/// [`MarkerSurface`] over a Leaflet layer group.
pub(crate) struct PinLayer {
    layer: LayerGroup,
    on_edit: Callback<PlaceId>,
    on_delete: Callback<PlaceId>,
}

impl PinLayer {
    fn popup_node(&self, marker: &Marker, popup: &PopupContent) -> (JsValue, Vec<EventListener>) {
        match build_popup(marker, popup, &self.on_edit, &self.on_delete) {
            Ok((node, listeners)) => (node.into(), listeners),
            Err(err) => {
                #[cfg(target_arch = "wasm32")]
                gloo::console::warn!("map: popup build failed", err);
                #[cfg(not(target_arch = "wasm32"))]
                let _ = err;
                (JsValue::from_str(&popup.title), Vec::new())
            }
        }
    }
}

impl MarkerSurface for PinLayer {
    type Pin = Pin;

    fn create_pin(&mut self, marker: &Marker, popup: &PopupContent) -> Pin {
        let leaflet_marker = create_marker(
            &lat_lng(marker.coordinates),
            &options(&[
                ("title", JsValue::from_str(&marker.title)),
                ("riseOnHover", JsValue::TRUE),
            ]),
        );
        let (node, listeners) = self.popup_node(marker, popup);
        leaflet_marker.bind_popup(
            &node,
            &options(&[("maxWidth", JsValue::from_f64(POPUP_MAX_WIDTH))]),
        );
        self.layer.add_layer(&leaflet_marker);
        Pin {
            marker: leaflet_marker,
            _listeners: listeners,
        }
    }

    fn refresh_pin(&mut self, pin: &mut Pin, marker: &Marker, popup: &PopupContent) {
        let (node, listeners) = self.popup_node(marker, popup);
        pin.marker.set_popup_content(&node);
        pin._listeners = listeners;
    }

    fn remove_pin(&mut self, pin: Pin) {
        self.layer.remove_layer(&pin.marker);
    }
}

fn document() -> Result<Document, String> {
    web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| "document unavailable".to_string())
}

fn element(document: &Document, tag: &str, class: &str) -> Result<Element, String> {
    let node = document
        .create_element(tag)
        .map_err(|_| format!("failed to create <{tag}>"))?;
    node.set_class_name(class);
    Ok(node)
}

fn text(document: &Document, tag: &str, class: &str, value: &str) -> Result<Element, String> {
    let node = element(document, tag, class)?;
    node.set_text_content(Some(value));
    Ok(node)
}

fn image(document: &Document, class: &str, source: &PopupImage) -> Result<Element, String> {
    let node = element(document, "img", class)?;
    let img: HtmlImageElement = node
        .dyn_into()
        .map_err(|_| "failed to create image".to_string())?;
    img.set_src(&source.src);
    img.set_alt(&source.alt);
    Ok(img.into())
}

fn append(parent: &Element, child: &Element) -> Result<(), String> {
    parent
        .append_child(child)
        .map(|_| ())
        .map_err(|_| "failed to append popup node".to_string())
}

fn action_button(
    document: &Document,
    label: &str,
    class: &str,
    id: &PlaceId,
    callback: &Callback<PlaceId>,
) -> Result<(Element, EventListener), String> {
    let node = text(document, "button", class, label)?;
    if let Some(button) = node.dyn_ref::<HtmlButtonElement>() {
        button.set_type("button");
    }
    let id = id.clone();
    let callback = callback.clone();
    // Deferred: the resulting redraw may drop this listener.
    let listener = EventListener::new(&node, "click", move |_| {
        let id = id.clone();
        let callback = callback.clone();
        wasm_bindgen_futures::spawn_local(async move { callback.emit(id) });
    });
    Ok((node, listener))
}

fn build_popup(
    marker: &Marker,
    popup: &PopupContent,
    on_edit: &Callback<PlaceId>,
    on_delete: &Callback<PlaceId>,
) -> Result<(HtmlElement, Vec<EventListener>), String> {
    let document = document()?;
    let root = element(&document, "div", "popup")?;
    append(&root, &text(&document, "h3", "popup-title", &popup.title)?)?;
    if let Some(source) = popup.image.as_ref() {
        append(&root, &image(&document, "popup-image", source)?)?;
    }
    if let Some(line) = popup.rating_line.as_deref() {
        append(&root, &text(&document, "p", "popup-rating", line)?)?;
    }
    if let Some(line) = popup.category_line.as_deref() {
        append(&root, &text(&document, "p", "popup-category", line)?)?;
    }
    if let Some(line) = popup.recommender_line.as_deref() {
        let row = element(&document, "div", "popup-recommender")?;
        if let Some(avatar) = popup.recommender_avatar.as_ref() {
            append(&row, &image(&document, "popup-avatar", avatar)?)?;
        }
        append(&row, &text(&document, "span", "", line)?)?;
        append(&root, &row)?;
    }
    if let Some(review) = popup.review.as_deref() {
        append(&root, &text(&document, "p", "popup-review", review)?)?;
    }

    let mut listeners = Vec::new();
    if popup.has_actions() {
        let row = element(&document, "div", "popup-actions")?;
        if popup.actions.edit {
            let (button, listener) =
                action_button(&document, "Edit", "button button--ghost", &marker.id, on_edit)?;
            append(&row, &button)?;
            listeners.push(listener);
        }
        if popup.actions.delete {
            let (button, listener) = action_button(
                &document,
                "Delete",
                "button button--danger",
                &marker.id,
                on_delete,
            )?;
            append(&row, &button)?;
            listeners.push(listener);
        }
        append(&root, &row)?;
    }

    root.dyn_into::<HtmlElement>()
        .map(|node| (node, listeners))
        .map_err(|_| "popup root is not an element".to_string())
}
