use std::cell::RefCell;
use std::ops::Deref;
use std::rc::Rc;

use city_explorer_core::{ExplorerAction, ExplorerState, PlaceDraft, PlaceId};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use yew::prelude::*;

pub(crate) type ExplorerSubscriber = Rc<dyn Fn()>;

#[cfg(not(target_arch = "wasm32"))]
const NATIVE_SEED: u64 = 0x00C1_7E55_EED5;

/// Owns the shell state. Every change goes through [`ExplorerCore::dispatch`];
/// subscribers are told after the new state is in place.
pub(crate) struct ExplorerCore {
    state: RefCell<Rc<ExplorerState>>,
    rng: RefCell<SmallRng>,
    subscribers: Rc<RefCell<Vec<ExplorerSubscriber>>>,
}

impl ExplorerCore {
    pub(crate) fn new() -> Rc<Self> {
        Self::with_state(ExplorerState::new(), session_seed())
    }

    pub(crate) fn with_state(state: ExplorerState, seed: u64) -> Rc<Self> {
        Rc::new(Self {
            state: RefCell::new(Rc::new(state)),
            rng: RefCell::new(SmallRng::seed_from_u64(seed)),
            subscribers: Rc::new(RefCell::new(Vec::new())),
        })
    }

    pub(crate) fn subscribe(&self, subscriber: ExplorerSubscriber) -> ExplorerSubscription {
        self.subscribers.borrow_mut().push(subscriber.clone());
        ExplorerSubscription {
            subscriber,
            subscribers: Rc::clone(&self.subscribers),
        }
    }

    pub(crate) fn snapshot(&self) -> Rc<ExplorerState> {
        Rc::clone(&self.state.borrow())
    }

    pub(crate) fn dispatch(&self, action: ExplorerAction) {
        #[cfg(target_arch = "wasm32")]
        log_action(&action);
        let next = self.state.borrow().apply(action);
        if next == **self.state.borrow() {
            return;
        }
        *self.state.borrow_mut() = Rc::new(next);
        self.notify();
    }

    /// Submits the open form; a fresh id is drawn even for edits, where it is ignored.
    pub(crate) fn submit(&self, draft: PlaceDraft) {
        let new_id = PlaceId::generate(&mut *self.rng.borrow_mut());
        self.dispatch(ExplorerAction::SubmitForm { draft, new_id });
    }

    fn notify(&self) {
        let subscribers = self.subscribers.borrow().clone();
        for subscriber in subscribers {
            (subscriber)();
        }
    }
}

pub(crate) struct ExplorerSubscription {
    subscriber: ExplorerSubscriber,
    subscribers: Rc<RefCell<Vec<ExplorerSubscriber>>>,
}

impl Drop for ExplorerSubscription {
    fn drop(&mut self) {
        let mut subscribers = self.subscribers.borrow_mut();
        subscribers.retain(|item| !Rc::ptr_eq(item, &self.subscriber));
    }
}

/// Context value handed to every view. Equal when it points at the same store.
#[derive(Clone)]
pub(crate) struct ExplorerHandle(Rc<ExplorerCore>);

impl ExplorerHandle {
    pub(crate) fn new(core: Rc<ExplorerCore>) -> Self {
        Self(core)
    }
}

impl PartialEq for ExplorerHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for ExplorerHandle {
    type Target = ExplorerCore;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Store handle plus a snapshot that re-renders the caller on every change.
/// Returns `None` outside an explorer `ContextProvider`.
#[hook]
pub(crate) fn use_explorer() -> Option<(ExplorerHandle, Rc<ExplorerState>)> {
    let handle = use_context::<ExplorerHandle>();
    let snapshot = use_state(|| handle.as_ref().map(|handle| handle.snapshot()));
    {
        let snapshot = snapshot.clone();
        use_effect_with(handle.clone(), move |handle| {
            let subscription = handle.as_ref().map(|handle| {
                let core = handle.clone();
                snapshot.set(Some(core.snapshot()));
                handle.subscribe(Rc::new(move || {
                    snapshot.set(Some(core.snapshot()));
                }))
            });
            move || drop(subscription)
        });
    }
    match (handle, (*snapshot).clone()) {
        (Some(handle), Some(state)) => Some((handle, state)),
        (Some(handle), None) => {
            let state = handle.snapshot();
            Some((handle, state))
        }
        (None, _) => None,
    }
}

fn session_seed() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        let now = js_sys::Date::now() as u64;
        let noise = (js_sys::Math::random() * u32::MAX as f64) as u64;
        now.rotate_left(21) ^ noise
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        NATIVE_SEED
    }
}

#[cfg(target_arch = "wasm32")]
fn log_action(action: &ExplorerAction) {
    match action {
        ExplorerAction::MapClicked(coords) => {
            gloo::console::log!("explorer: map click", coords.to_string())
        }
        ExplorerAction::SubmitForm { draft, .. } => {
            gloo::console::log!("explorer: submit", draft.name.clone())
        }
        ExplorerAction::DeletePlace(id) => {
            gloo::console::log!("explorer: delete", id.to_string())
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use city_explorer_core::{FormMode, LngLat, DEFAULT_CITY_KEY};
    use std::cell::Cell;
    use wasm_bindgen_test::*;

    fn draft(name: &str) -> PlaceDraft {
        PlaceDraft {
            name: name.to_string(),
            category: "Brazilian".to_string(),
            rating: 4,
            review: String::new(),
            recommended_by: Some("Cadu".to_string()),
            image: None,
        }
    }

    #[wasm_bindgen_test]
    fn dispatch_notifies_until_unsubscribed() {
        let core = ExplorerCore::with_state(ExplorerState::new(), 7);
        let calls = Rc::new(Cell::new(0));
        let subscription = {
            let calls = calls.clone();
            core.subscribe(Rc::new(move || calls.set(calls.get() + 1)))
        };
        core.dispatch(ExplorerAction::SetAdminMode(true));
        assert_eq!(calls.get(), 1);
        core.dispatch(ExplorerAction::SetAdminMode(true));
        assert_eq!(calls.get(), 1, "unchanged state is not broadcast");
        drop(subscription);
        core.dispatch(ExplorerAction::SetAdminMode(false));
        assert_eq!(calls.get(), 1);
    }

    #[wasm_bindgen_test]
    fn submit_draws_distinct_ids() {
        let core = ExplorerCore::with_state(ExplorerState::new(), 11);
        core.dispatch(ExplorerAction::SetAdminMode(true));
        for name in ["First", "Second"] {
            core.dispatch(ExplorerAction::MapClicked(LngLat::new(-46.63, -23.55)));
            assert!(matches!(
                core.snapshot().form.as_ref().map(|session| &session.mode),
                Some(FormMode::Create { .. })
            ));
            core.submit(draft(name));
        }
        let state = core.snapshot();
        assert_eq!(state.places.len(), 2);
        assert_ne!(state.places[0].id, state.places[1].id);
        assert_eq!(state.places[0].name, "Second");
        assert_eq!(state.places[0].city, DEFAULT_CITY_KEY);
    }

    #[wasm_bindgen_test]
    fn handles_compare_by_store() {
        let core = ExplorerCore::with_state(ExplorerState::new(), 1);
        let a = ExplorerHandle::new(core.clone());
        let b = ExplorerHandle::new(core);
        let c = ExplorerHandle::new(ExplorerCore::with_state(ExplorerState::new(), 1));
        assert!(a == b);
        assert!(a != c);
    }
}
