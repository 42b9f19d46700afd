//! Single-threaded state container
//!
//! A [`Store`] owns one state value and a reducer bound for its lifetime.
//! The only way to change the state is [`Store::dispatch`], which runs the
//! reducer on a copy of the current state, commits the result, and then
//! notifies every subscriber in registration order.
//!
//! # Guarantees
//!
//! - Subscribers always observe the post-transition state.
//! - A failing reducer (error or panic) leaves the state untouched and
//!   notifies nobody; the failure reaches the caller of `dispatch`.
//! - A panicking subscriber is logged and skipped; the rest of the pass runs.
//! - Dispatching from inside a subscriber completes fully (commit and its own
//!   notification pass) before the outer pass resumes.
//! - Each notification pass works on a snapshot of the subscriber list, so
//!   subscribing or unsubscribing mid-pass only affects later passes.
//!
//! The handle is `Rc`-based and therefore neither `Send` nor `Sync`: a store
//! is confined to the thread that created it.
//!
//! # Examples
//!
//! ```
//! use libcrowdfund::store::Store;
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let store = Store::new(|count: u32, step: u32| count + step, 0);
//!
//! let seen = Rc::new(Cell::new(0));
//! let watcher = store.clone();
//! let sink = Rc::clone(&seen);
//! store.subscribe(move || sink.set(*watcher.get_state()));
//!
//! store.dispatch(5).unwrap();
//! assert_eq!(seen.get(), 5);
//! ```

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::convert::Infallible;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::{Rc, Weak};

use tracing::{debug, error};

type Transition<S, A, E> = dyn Fn(S, A) -> std::result::Result<S, E>;
type Callback = Rc<dyn Fn()>;

/// Identifies one registration in a store's subscriber list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(u64);

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

struct Inner<S, A, E> {
    state: RefCell<Rc<S>>,
    transition: Box<Transition<S, A, E>>,
    subscribers: RefCell<Vec<(SubscriberId, Callback)>>,
    next_id: Cell<u64>,
}

/// Lets a [`Subscription`] reach back into its store without knowing the
/// store's state and action types.
trait Registry {
    fn remove(&self, id: SubscriberId) -> bool;
}

impl<S, A, E> Registry for Inner<S, A, E> {
    fn remove(&self, id: SubscriberId) -> bool {
        let mut subscribers = self.subscribers.borrow_mut();
        match subscribers.iter().position(|(sid, _)| *sid == id) {
            Some(pos) => {
                subscribers.remove(pos);
                true
            }
            None => false,
        }
    }
}

/// Handle to a state container.
///
/// Cloning the handle is cheap and every clone refers to the same store,
/// which is how widgets share it without a global.
pub struct Store<S, A, E = Infallible> {
    inner: Rc<Inner<S, A, E>>,
}

impl<S, A, E> Clone for Store<S, A, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<S: 'static, A: 'static> Store<S, A, Infallible> {
    /// Create a store around a reducer that cannot fail.
    pub fn new<R>(reducer: R, initial: S) -> Self
    where
        R: Fn(S, A) -> S + 'static,
    {
        Self::fallible(move |state, action| Ok(reducer(state, action)), initial)
    }

    /// Create a store whose starting state is `S::default()`.
    pub fn from_default<R>(reducer: R) -> Self
    where
        S: Default,
        R: Fn(S, A) -> S + 'static,
    {
        Self::new(reducer, S::default())
    }
}

impl<S: 'static, A: 'static, E: 'static> Store<S, A, E> {
    /// Create a store around a reducer that may refuse an action.
    pub fn fallible<R>(reducer: R, initial: S) -> Self
    where
        R: Fn(S, A) -> std::result::Result<S, E> + 'static,
    {
        Self {
            inner: Rc::new(Inner {
                state: RefCell::new(Rc::new(initial)),
                transition: Box::new(reducer),
                subscribers: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
            }),
        }
    }

    /// Fallible variant of [`Store::from_default`].
    pub fn fallible_from_default<R>(reducer: R) -> Self
    where
        S: Default,
        R: Fn(S, A) -> std::result::Result<S, E> + 'static,
    {
        Self::fallible(reducer, S::default())
    }

    /// Current state, as left by the most recently committed transition.
    ///
    /// The snapshot is shared and read-only; later dispatches replace the
    /// store's state without touching snapshots already handed out.
    pub fn get_state(&self) -> Rc<S> {
        Rc::clone(&self.inner.state.borrow())
    }

    /// Apply `action` and notify every subscriber.
    ///
    /// Returns the reducer's error without changing anything if the reducer
    /// refuses the action.
    pub fn dispatch(&self, action: A) -> std::result::Result<(), E>
    where
        S: Clone,
    {
        // No borrow may be held while user code runs: the reducer may panic
        // and subscribers may re-enter the store.
        let current = self.get_state();
        let next = match (self.inner.transition)((*current).clone(), action) {
            Ok(next) => next,
            Err(err) => {
                debug!("Reducer refused action, state unchanged");
                return Err(err);
            }
        };
        drop(current);

        *self.inner.state.borrow_mut() = Rc::new(next);
        self.notify();
        Ok(())
    }

    /// Register `callback` to run after every dispatch.
    ///
    /// Registering the same closure twice runs it twice per dispatch.
    /// Dropping the returned [`Subscription`] keeps the callback registered;
    /// call [`Subscription::unsubscribe`] to remove it.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn() + 'static,
    {
        let id = SubscriberId(self.inner.next_id.get());
        self.inner.next_id.set(id.0 + 1);
        self.inner
            .subscribers
            .borrow_mut()
            .push((id, Rc::new(callback)));

        let registry: Weak<dyn Registry> = Rc::downgrade(&self.inner) as Weak<dyn Registry>;
        Subscription { id, registry }
    }

    /// Number of live registrations.
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.borrow().len()
    }

    fn notify(&self) {
        let pass: Vec<(SubscriberId, Callback)> = self.inner.subscribers.borrow().clone();
        debug!(subscribers = pass.len(), "State committed, notifying subscribers");

        for (id, callback) in pass {
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| callback())) {
                error!(
                    subscriber = %id,
                    reason = panic_message(&*payload),
                    "Subscriber panicked during notification"
                );
            }
        }
    }
}

impl<S: fmt::Debug, A, E> fmt::Debug for Store<S, A, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.inner.state.borrow())
            .field("subscribers", &self.inner.subscribers.borrow().len())
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "non-string panic payload"
    }
}

/// Disposer returned by [`Store::subscribe`].
pub struct Subscription {
    id: SubscriberId,
    registry: Weak<dyn Registry>,
}

impl Subscription {
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Remove this registration from its store.
    ///
    /// Other subscribers keep their order, and a notification pass already
    /// running still calls this subscriber. Returns `false` if the store is
    /// gone.
    pub fn unsubscribe(self) -> bool {
        match self.registry.upgrade() {
            Some(registry) => registry.remove(self.id),
            None => false,
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
