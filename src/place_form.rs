use std::rc::Rc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use city_explorer_core::{
    check_image_file, FormEdit, FormError, FormMode, FormSchema, FormVariant, PlaceDraft,
    PlaceFormState,
};
use wasm_bindgen_futures::spawn_local;
use web_sys::{File, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub(crate) struct PlaceFormProps {
    pub(crate) open: bool,
    pub(crate) mode: FormMode,
    #[prop_or_default]
    pub(crate) initial: Option<PlaceDraft>,
    #[prop_or_default]
    pub(crate) variant: FormVariant,
    pub(crate) schema: Rc<FormSchema>,
    pub(crate) on_submit: Callback<PlaceDraft>,
    pub(crate) on_close: Callback<()>,
}

#[derive(Clone, PartialEq)]
struct FormModel(PlaceFormState);

impl Reducible for FormModel {
    type Action = FormEdit;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        Rc::new(FormModel(self.0.apply(action)))
    }
}

async fn read_file_bytes(file: File) -> Result<Vec<u8>, String> {
    let buffer = wasm_bindgen_futures::JsFuture::from(file.array_buffer())
        .await
        .map_err(|_| "failed to read file".to_string())?;
    let array = js_sys::Uint8Array::new(&buffer);
    Ok(array.to_vec())
}

fn data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

async fn read_data_url(file: File) -> Result<String, FormError> {
    let mime = file.type_();
    let bytes = read_file_bytes(file).await.map_err(FormError::ImageRead)?;
    Ok(data_url(&mime, &bytes))
}

/// Create or edit form for one place. Remount it (via `key`) to start a new session.
#[function_component(PlaceForm)]
pub(crate) fn place_form(props: &PlaceFormProps) -> Html {
    let form = {
        let schema = props.schema.clone();
        let initial = props.initial.clone();
        use_reducer(move || {
            FormModel(match initial.as_ref() {
                Some(draft) => PlaceFormState::for_edit(draft),
                None => PlaceFormState::for_create(&schema),
            })
        })
    };
    let file_input = use_node_ref();

    if !props.open {
        return html! {};
    }
    let state = &form.0;

    let on_name = {
        let form = form.dispatcher();
        Callback::from(move |event: InputEvent| {
            let input: HtmlInputElement = event.target_unchecked_into();
            form.dispatch(FormEdit::Name(input.value()));
        })
    };
    let on_category = {
        let form = form.dispatcher();
        Callback::from(move |event: Event| {
            let select: HtmlSelectElement = event.target_unchecked_into();
            form.dispatch(FormEdit::Category(select.value()));
        })
    };
    let on_rating = {
        let form = form.dispatcher();
        Callback::from(move |event: Event| {
            let select: HtmlSelectElement = event.target_unchecked_into();
            form.dispatch(FormEdit::Rating(select.value().parse().ok()));
        })
    };
    let on_recommender = {
        let form = form.dispatcher();
        Callback::from(move |event: Event| {
            let select: HtmlSelectElement = event.target_unchecked_into();
            form.dispatch(FormEdit::RecommendedBy(select.value()));
        })
    };
    let on_review = {
        let form = form.dispatcher();
        Callback::from(move |event: InputEvent| {
            let input: HtmlTextAreaElement = event.target_unchecked_into();
            form.dispatch(FormEdit::Review(input.value()));
        })
    };
    let on_image = {
        let form = form.dispatcher();
        Callback::from(move |event: Event| {
            let input: HtmlInputElement = event.target_unchecked_into();
            let Some(file) = input.files().and_then(|files| files.get(0)) else {
                return;
            };
            input.set_value("");
            if let Err(err) = check_image_file(&file.type_(), file.size() as u64) {
                form.dispatch(FormEdit::Rejected(err));
                return;
            }
            form.dispatch(FormEdit::ImageReadStarted);
            let form = form.clone();
            spawn_local(async move {
                match read_data_url(file).await {
                    Ok(url) => form.dispatch(FormEdit::ImageLoaded(url)),
                    Err(err) => {
                        #[cfg(target_arch = "wasm32")]
                        gloo::console::warn!("form: image read failed", err.to_string());
                        form.dispatch(FormEdit::ImageFailed(err));
                    }
                }
            });
        })
    };
    let on_clear_image = {
        let form = form.dispatcher();
        let file_input = file_input.clone();
        Callback::from(move |_: MouseEvent| {
            if let Some(input) = file_input.cast::<HtmlInputElement>() {
                input.set_value("");
            }
            form.dispatch(FormEdit::ImageCleared);
        })
    };
    let on_submit = {
        let form = form.clone();
        let schema = props.schema.clone();
        let submit = props.on_submit.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            match form.0.validate(&schema) {
                Ok(draft) => submit.emit(draft),
                Err(err) => form.dispatch(FormEdit::Rejected(err)),
            }
        })
    };
    let on_cancel = {
        let close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| close.emit(()))
    };

    let schema = &props.schema;
    let category_options: Html = schema
        .categories
        .iter()
        .map(|category| {
            html! {
                <option value={category.clone()} selected={*category == state.category}>
                    {category.clone()}
                </option>
            }
        })
        .collect();
    let rating_options: Html = schema
        .rating_options()
        .map(|rating| {
            html! {
                <option value={rating.to_string()} selected={state.rating == Some(rating)}>
                    {rating.to_string()}
                </option>
            }
        })
        .collect();
    let blank_recommender = if schema.require_recommender {
        "Select a recommender"
    } else {
        "None"
    };
    let recommender_options: Html = schema
        .recommenders
        .iter()
        .map(|name| {
            html! {
                <option value={name.clone()} selected={*name == state.recommended_by}>
                    {name.clone()}
                </option>
            }
        })
        .collect();

    let coords_badge = props.mode.coords().map(|coords| {
        html! { <span class="coords-badge">{coords.to_string()}</span> }
    });
    let preview = state.image.as_ref().map(|src| {
        html! {
            <div class="image-preview">
                <img src={src.clone()} alt="Selected place" />
                <button type="button" class="button button--ghost" onclick={on_clear_image}>
                    {"Remove image"}
                </button>
            </div>
        }
    });
    let error = state
        .error
        .as_ref()
        .map(|err| html! { <p class="form-error" role="alert">{err.to_string()}</p> });
    let reading = state.reading_image();

    let body = html! {
        <form class="place-form" onsubmit={on_submit}>
            <header class="place-form__header">
                <h2>{props.mode.title(props.variant)}</h2>
                {coords_badge}
            </header>
            <label class="field">
                <span>{"Name"}</span>
                <input
                    type="text"
                    value={state.name.clone()}
                    oninput={on_name}
                    placeholder="Place name"
                    required=true
                />
            </label>
            <label class="field">
                <span>{"Category"}</span>
                <select onchange={on_category}>{category_options}</select>
            </label>
            <label class="field">
                <span>{"Rating"}</span>
                <select onchange={on_rating}>{rating_options}</select>
            </label>
            <label class="field">
                <span>{"Recommended by"}</span>
                <select onchange={on_recommender}>
                    <option value="" selected={state.recommended_by.is_empty()}>
                        {blank_recommender}
                    </option>
                    {recommender_options}
                </select>
            </label>
            <label class="field">
                <span>{"Review"}</span>
                <textarea
                    value={state.review.clone()}
                    oninput={on_review}
                    placeholder="What makes it worth a visit?"
                    rows="3"
                />
            </label>
            <label class="field">
                <span>{"Image"}</span>
                <input ref={file_input} type="file" accept="image/*" onchange={on_image} />
            </label>
            if reading {
                <p class="form-hint">{"Reading image..."}</p>
            }
            {preview}
            {error}
            <footer class="place-form__actions">
                <button type="button" class="button button--ghost" onclick={on_cancel}>
                    {"Cancel"}
                </button>
                <button type="submit" class="button button--primary" disabled={reading}>
                    {props.mode.submit_label()}
                </button>
            </footer>
        </form>
    };

    match props.variant {
        FormVariant::Sidebar => html! {
            <aside class="form-panel">{body}</aside>
        },
        FormVariant::Dialog => html! {
            <div class="form-dialog" role="dialog" aria-modal="true">{body}</div>
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn data_url_carries_mime_and_payload() {
        assert_eq!(data_url("image/png", b"abc"), "data:image/png;base64,YWJj");
        assert_eq!(data_url("image/gif", &[]), "data:image/gif;base64,");
    }
}
