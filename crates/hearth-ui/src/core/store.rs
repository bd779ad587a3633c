//! yewdux state slices shared by every store in the crate.
//!
//! # Design
//! - Each concern is its own yewdux [`Store`] type held in a [`Context`]
//!   that the caller constructs and injects; nothing uses the global context,
//!   so every test builds an isolated set of stores.
//! - A slice type lives at most once per context; two handles on the same
//!   type in one context see the same state.
//! - Listeners are subscribed `Dispatch` handles kept by id; dropping the
//!   handle on `unsubscribe` ends the subscription.
//! - Listeners fire only when `Store::should_notify` reports a change.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

pub use yewdux::Context;
use yewdux::prelude::Dispatch;
pub use yewdux::store::Store;

/// Handle returned by [`Slice::subscribe`], used to unsubscribe.
pub type SubscriptionId = u64;

struct Subscriptions<S: Store> {
    next_id: SubscriptionId,
    active: BTreeMap<SubscriptionId, Dispatch<S>>,
}

/// Typed handle on one slice of a yewdux context.
pub struct Slice<S: Store> {
    cx: Context,
    dispatch: Dispatch<S>,
    subscriptions: Rc<RefCell<Subscriptions<S>>>,
}

impl<S: Store + Clone> Slice<S> {
    /// Handle on `S` in `cx`, initialising it with `Store::new` when absent.
    #[must_use]
    pub fn new(cx: &Context) -> Self {
        Self {
            cx: cx.clone(),
            dispatch: Dispatch::new(cx),
            subscriptions: Rc::new(RefCell::new(Subscriptions {
                next_id: 0,
                active: BTreeMap::new(),
            })),
        }
    }

    /// Handle on `S` in `cx`, replacing its state with `initial`.
    #[must_use]
    pub fn with_state(cx: &Context, initial: S) -> Self {
        let slice = Self::new(cx);
        slice.dispatch.set(initial);
        slice
    }

    /// Clone of the current state.
    #[must_use]
    pub fn get(&self) -> S {
        (*self.dispatch.get()).clone()
    }

    /// Read the state without cloning it.
    pub fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.dispatch.get())
    }

    /// Replace the state.
    pub fn set(&self, next: S) {
        self.dispatch.set(next);
    }

    /// Mutate the state in place.
    pub fn update(&self, f: impl FnOnce(&mut S)) {
        self.dispatch.reduce_mut(f);
    }

    /// Register a listener called after every change.
    pub fn subscribe(&self, listener: impl Fn(&S) + 'static) -> SubscriptionId {
        let dispatch =
            Dispatch::<S>::new(&self.cx).subscribe_silent(move |state: Rc<S>| listener(&state));
        let mut subscriptions = self.subscriptions.borrow_mut();
        let id = subscriptions.next_id;
        subscriptions.next_id += 1;
        subscriptions.active.insert(id, dispatch);
        id
    }

    /// Remove a listener. Returns `false` when the id was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let removed = self.subscriptions.borrow_mut().active.remove(&id);
        removed.is_some()
    }

    /// Number of listeners registered through this handle.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.subscriptions.borrow().active.len()
    }

    /// Context the slice lives in.
    #[must_use]
    pub const fn context(&self) -> &Context {
        &self.cx
    }
}

impl<S: Store> Clone for Slice<S> {
    fn clone(&self) -> Self {
        Self {
            cx: self.cx.clone(),
            dispatch: self.dispatch.clone(),
            subscriptions: Rc::clone(&self.subscriptions),
        }
    }
}

impl<S: Store + fmt::Debug> fmt::Debug for Slice<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slice")
            .field("state", &self.dispatch.get())
            .field("listeners", &self.subscriptions.borrow().active.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{Context, Slice};
    use std::cell::RefCell;
    use std::rc::Rc;
    use yewdux::store::Store;

    #[derive(Clone, Debug, Default, PartialEq, Store)]
    struct Counter(i32);

    #[derive(Clone, Debug, Default, PartialEq, Store)]
    struct Label(String);

    #[test]
    fn set_and_update_replace_state() {
        let slice = Slice::with_state(&Context::new(), Counter(1));
        slice.set(Counter(5));
        assert_eq!(slice.get(), Counter(5));
        slice.update(|value| value.0 += 2);
        assert_eq!(slice.get(), Counter(7));
        assert_eq!(slice.read(|value| value.0 * 2), 14);
    }

    #[test]
    fn listeners_see_post_update_snapshot() {
        let slice = Slice::with_state(&Context::new(), Label("a".into()));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        slice.subscribe(move |value: &Label| sink.borrow_mut().push(value.0.clone()));

        slice.set(Label("b".into()));
        slice.update(|value| value.0.push('c'));

        assert_eq!(*seen.borrow(), vec!["b".to_string(), "bc".to_string()]);
    }

    #[test]
    fn unchanged_state_does_not_notify() {
        let slice = Slice::with_state(&Context::new(), Counter(3));
        let hits = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&hits);
        slice.subscribe(move |_| *counter.borrow_mut() += 1);

        slice.set(Counter(3));
        slice.update(|_| {});
        assert_eq!(*hits.borrow(), 0);
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let slice = Slice::<Counter>::new(&Context::new());
        let hits = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&hits);
        let id = slice.subscribe(move |_| *counter.borrow_mut() += 1);

        slice.set(Counter(1));
        assert!(slice.unsubscribe(id));
        assert!(!slice.unsubscribe(id));
        slice.set(Counter(2));

        assert_eq!(*hits.borrow(), 1);
        assert_eq!(slice.listener_count(), 0);
    }

    #[test]
    fn listener_may_read_the_slice_it_observes() {
        let slice = Slice::<Counter>::new(&Context::new());
        let observed = Rc::new(RefCell::new(None));
        let handle = slice.clone();
        let sink = Rc::clone(&observed);
        slice.subscribe(move |_| *sink.borrow_mut() = Some(handle.get()));

        slice.set(Counter(9));
        assert_eq!(*observed.borrow(), Some(Counter(9)));
    }

    #[test]
    fn contexts_are_isolated_and_handles_share_state() {
        let cx = Context::new();
        let first = Slice::with_state(&cx, Counter(1));
        let second = Slice::<Counter>::new(&cx);
        let other = Slice::<Counter>::new(&Context::new());

        first.set(Counter(4));
        assert_eq!(second.get(), Counter(4));
        assert_eq!(other.get(), Counter(0));
    }
}
