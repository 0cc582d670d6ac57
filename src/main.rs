mod app_core;
mod leaflet;
mod map_view;
mod persisted;
mod place_form;
mod yew_app;

use yew_app::App;

fn main() {
    console_error_panic_hook::set_once();
    #[cfg(target_arch = "wasm32")]
    gloo::console::log!("city explorer: boot");
    yew::Renderer::<App>::new().render();
}

#[cfg(test)]
mod tests {
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn wasm_smoke() {
        console_error_panic_hook::set_once();
        assert_eq!(city_explorer_core::PLACE_ID_LEN, 12);
    }
}
