//! Yew hooks binding components to the stores.
//!
//! Slices are read with yewdux `use_selector` from the context provided
//! above the component (`ContextProvider<yewdux::Context>` fed with
//! [`crate::StoreContext::yewdux`]), else from the global context.

use std::rc::Rc;

use gloo::events::EventListener;
use gloo::utils::window;
use serde::de::DeserializeOwned;
use yew::prelude::*;
use yewdux::prelude::use_selector;

use crate::breakpoints::{ViewportObserver, ViewportSnapshot};
use crate::core::auth::{AuthCheck, AuthOutcome};
use crate::core::host::BrowserHost;
use crate::core::notify::NotificationState;
use crate::core::store::Context;
use crate::core::theme::{ColorMode, HighContrast, ThemeLanguage, ThemeState};
use crate::web::browser::{WindowHost, browser_environment};

#[hook]
fn use_slice_context() -> Context {
    use_context::<Context>().unwrap_or_else(Context::global)
}

/// Combined theme view; re-renders when any field changes.
#[hook]
pub fn use_theme() -> ThemeState {
    let mode = use_selector(|slot: &ColorMode| slot.0);
    let high_contrast = use_selector(|slot: &HighContrast| slot.0);
    let language = use_selector(|slot: &ThemeLanguage| slot.0.clone());
    ThemeState {
        mode: *mode,
        high_contrast: *high_contrast,
        language: (*language).clone(),
    }
}

/// Current notification slot.
#[hook]
pub fn use_notification() -> Rc<NotificationState> {
    use_selector(|state: &NotificationState| state.clone())
}

/// Track the window width while the component is mounted.
#[hook]
pub fn use_viewport() -> ViewportSnapshot {
    let cx = use_slice_context();
    let observer = use_memo((), move |_| ViewportObserver::new(&cx, browser_environment()));
    let snapshot = use_selector(|snapshot: &ViewportSnapshot| *snapshot);
    use_effect_with((), move |_| {
        observer.activate();
        let listener = EventListener::new(&window(), "resize", {
            let observer = Rc::clone(&observer);
            move |_event| {
                observer.on_resize(WindowHost.inner_width());
            }
        });
        move || {
            drop(listener);
            observer.deactivate();
        }
    });
    *snapshot
}

/// Run the session check once on mount and follow its outcome. `check` must
/// live in the provided context (see [`crate::StoreContext::auth_check`]).
#[hook]
pub fn use_auth_check<U>(check: Rc<AuthCheck<U>>) -> Rc<AuthOutcome<U>>
where
    U: DeserializeOwned + Clone + PartialEq + 'static,
{
    let outcome = use_selector(|outcome: &AuthOutcome<U>| outcome.clone());
    use_effect_with((), move |_| {
        check.run();
    });
    outcome
}
