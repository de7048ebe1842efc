//! The store: owner of the current state, the reducer and the listeners.

use crate::core::listener::{Callback, ListenerSet, Subscription};
use crate::core::observable::StateStream;
use crate::core::{
    Action, ActionTypes, DispatchFn, DispatchResult, Outcome, Reducer, Request, StoreError,
};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::Arc;

/// Function that creates a store from a reducer and an optional preloaded state.
pub type StoreCreator<S> = Rc<dyn Fn(Reducer<S>, Option<Arc<S>>) -> Result<Store<S>, StoreError>>;

/// Wraps store construction to add capabilities, e.g. an augmented dispatch.
pub type Enhancer<S> = Box<dyn Fn(StoreCreator<S>) -> StoreCreator<S>>;

/// Where the store core is in handling a dispatch.
///
/// `Reducing` and `Notifying` together form the dispatching state: any
/// dispatch that reaches the core while not `Idle` is rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DispatchPhase {
    Idle,
    Reducing,
    Notifying,
}

impl DispatchPhase {
    pub fn is_dispatching(self) -> bool {
        self != DispatchPhase::Idle
    }
}

/// Returns the phase to `Idle` however the dispatch exits.
struct PhaseGuard<'a> {
    phase: &'a Cell<DispatchPhase>,
}

impl<'a> PhaseGuard<'a> {
    fn enter(phase: &'a Cell<DispatchPhase>) -> Self {
        phase.set(DispatchPhase::Reducing);
        PhaseGuard { phase }
    }

    fn advance(&self, next: DispatchPhase) {
        self.phase.set(next);
    }
}

impl Drop for PhaseGuard<'_> {
    fn drop(&mut self) {
        self.phase.set(DispatchPhase::Idle);
    }
}

pub(crate) struct StoreCore<S> {
    reducer: RefCell<Reducer<S>>,
    state: RefCell<Option<Arc<S>>>,
    phase: Cell<DispatchPhase>,
    listeners: Rc<RefCell<ListenerSet>>,
}

impl<S: 'static> StoreCore<S> {
    fn new(reducer: Reducer<S>, preloaded_state: Option<Arc<S>>) -> Self {
        StoreCore {
            reducer: RefCell::new(reducer),
            state: RefCell::new(preloaded_state),
            phase: Cell::new(DispatchPhase::Idle),
            listeners: Rc::new(RefCell::new(ListenerSet::default())),
        }
    }

    fn dispatch(&self, action: Action) -> Result<Action, StoreError> {
        action.validate()?;

        if self.phase.get().is_dispatching() {
            return Err(StoreError::ReentrantDispatch {
                action_type: action.action_type().to_string(),
            });
        }

        log::trace!("dispatch {}", action.action_type());

        let guard = PhaseGuard::enter(&self.phase);
        // Only listeners registered before the reducer runs hear about this dispatch.
        let listeners = self.listeners.borrow().snapshot();
        let reducer = self.reducer.borrow().clone();
        let current = self.state.borrow().clone();
        let next = reducer.reduce(current.as_ref(), &action)?;
        *self.state.borrow_mut() = Some(next);

        guard.advance(DispatchPhase::Notifying);
        for (active, listener) in listeners {
            if active.get() {
                listener();
            }
        }
        drop(guard);

        Ok(action)
    }

    fn state(&self) -> Result<Arc<S>, StoreError> {
        if self.phase.get() == DispatchPhase::Reducing {
            return Err(StoreError::NotReady);
        }
        self.peek_state().ok_or(StoreError::NotReady)
    }

    pub(crate) fn peek_state(&self) -> Option<Arc<S>> {
        self.state.borrow().clone()
    }

    pub(crate) fn subscribe(&self, listener: Callback) -> Subscription {
        let (id, active) = self.listeners.borrow_mut().insert(listener);
        Subscription::new(id, active, Rc::downgrade(&self.listeners))
    }

    fn replace_reducer(&self, reducer: Reducer<S>) -> Result<(), StoreError> {
        let replace = Action::new(ActionTypes::replace());
        if self.phase.get().is_dispatching() {
            return Err(StoreError::ReentrantDispatch {
                action_type: replace.action_type().to_string(),
            });
        }

        *self.reducer.borrow_mut() = reducer;
        log::debug!("reducer replaced");
        self.dispatch(replace).map(|_| ())
    }
}

/// A predictable state container.
///
/// A `Store` is a handle: clones share the same state, reducer and
/// listeners. Each handle carries its own dispatch link, which is how
/// enhancers hand out an augmented dispatch without touching handles
/// created before them.
///
/// Listeners are owned by the store, so a listener that captures a `Store`
/// clone keeps the store alive forever. Capture a [`WeakStore`] from
/// [`Store::downgrade`] instead.
///
/// # Example
///
/// ```rust
/// use statecraft::{create_store, Action, Reducer};
/// use std::sync::Arc;
///
/// let reducer = Reducer::with_initial(0i64, |state: &Arc<i64>, action: &Action| {
///     if action.is("inc") {
///         Arc::new(**state + 1)
///     } else {
///         Arc::clone(state)
///     }
/// });
///
/// let store = create_store(reducer, None, None).unwrap();
///
/// let weak = store.downgrade();
/// store.subscribe(move || {
///     if let Ok(state) = weak.get_state() {
///         println!("count is now {}", state);
///     }
/// });
///
/// store.dispatch(Action::new("inc")).unwrap();
///
/// assert_eq!(*store.get_state().unwrap(), 1);
/// ```
pub struct Store<S> {
    core: Rc<StoreCore<S>>,
    dispatch: DispatchFn<S>,
}

impl<S: 'static> Store<S> {
    /// Create a bare store and run the initialization dispatch.
    pub fn new(reducer: Reducer<S>, preloaded_state: Option<Arc<S>>) -> Result<Self, StoreError> {
        let core = Rc::new(StoreCore::new(reducer, preloaded_state));

        let raw = Rc::clone(&core);
        let dispatch: DispatchFn<S> = Rc::new(move |request: Request<S>| match request {
            Request::Action(action) => raw.dispatch(action).map(Outcome::Action),
            Request::Thunk(_) => Err(StoreError::InvalidAction(
                "function-shaped requests need an interceptor such as ThunkMiddleware".to_string(),
            )),
        });

        let init = Action::new(ActionTypes::init());
        log::debug!("initializing store with {}", init.action_type());
        core.dispatch(init)?;

        Ok(Store { core, dispatch })
    }

    /// Send a request through this handle's dispatch link.
    pub fn dispatch(&self, request: impl Into<Request<S>>) -> DispatchResult {
        (self.dispatch)(request.into())
    }

    /// The dispatch link of this handle, for handing to collaborators.
    pub fn dispatcher(&self) -> DispatchFn<S> {
        Rc::clone(&self.dispatch)
    }

    /// Current state. Fails with [`StoreError::NotReady`] while the reducer runs.
    pub fn get_state(&self) -> Result<Arc<S>, StoreError> {
        self.core.state()
    }

    /// Register a listener called after every completed dispatch.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn() + 'static,
    {
        self.core.subscribe(Rc::new(listener))
    }

    /// Swap the reducer and dispatch the internal replace action.
    pub fn replace_reducer(&self, reducer: Reducer<S>) -> Result<(), StoreError> {
        self.core.replace_reducer(reducer)
    }

    /// Push-based view of the state for stream libraries.
    pub fn observable(&self) -> StateStream<S> {
        StateStream::new(Rc::clone(&self.core))
    }

    /// A handle on the same store whose dispatch is `dispatch`.
    pub fn with_dispatch(&self, dispatch: DispatchFn<S>) -> Self {
        Store {
            core: Rc::clone(&self.core),
            dispatch,
        }
    }

    pub fn phase(&self) -> DispatchPhase {
        self.core.phase.get()
    }

    pub fn listener_count(&self) -> usize {
        self.core.listeners.borrow().len()
    }

    /// Whether both handles refer to the same store.
    pub fn same_store(&self, other: &Store<S>) -> bool {
        Rc::ptr_eq(&self.core, &other.core)
    }

    /// A handle that does not keep the store alive.
    pub fn downgrade(&self) -> WeakStore<S> {
        WeakStore {
            core: Rc::downgrade(&self.core),
            dispatch: Rc::downgrade(&self.dispatch),
        }
    }
}

/// Non-owning counterpart of [`Store`], for listeners and other callbacks
/// the store itself holds on to.
pub struct WeakStore<S> {
    core: Weak<StoreCore<S>>,
    dispatch: Weak<dyn Fn(Request<S>) -> DispatchResult>,
}

impl<S: 'static> WeakStore<S> {
    /// The full handle, while some `Store` for it still exists.
    pub fn upgrade(&self) -> Option<Store<S>> {
        Some(Store {
            core: self.core.upgrade()?,
            dispatch: self.dispatch.upgrade()?,
        })
    }

    /// Current state, or [`StoreError::StoreDropped`] once the store is gone.
    pub fn get_state(&self) -> Result<Arc<S>, StoreError> {
        self.core
            .upgrade()
            .ok_or(StoreError::StoreDropped)?
            .state()
    }

    /// Dispatch through the link of the handle this was downgraded from.
    pub fn dispatch(&self, request: impl Into<Request<S>>) -> DispatchResult {
        let dispatch = self.dispatch.upgrade().ok_or(StoreError::StoreDropped)?;
        dispatch(request.into())
    }
}

impl<S> Clone for WeakStore<S> {
    fn clone(&self) -> Self {
        WeakStore {
            core: Weak::clone(&self.core),
            dispatch: Weak::clone(&self.dispatch),
        }
    }
}

impl<S> fmt::Debug for WeakStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakStore")
            .field("alive", &(self.core.strong_count() > 0))
            .finish()
    }
}

impl<S> Clone for Store<S> {
    fn clone(&self) -> Self {
        Store {
            core: Rc::clone(&self.core),
            dispatch: Rc::clone(&self.dispatch),
        }
    }
}

impl<S> fmt::Debug for Store<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("phase", &self.core.phase.get())
            .field("listeners", &self.core.listeners.borrow().len())
            .finish()
    }
}

/// The creator used when no enhancer is supplied.
pub fn base_creator<S: 'static>() -> StoreCreator<S> {
    Rc::new(|reducer: Reducer<S>, preloaded_state: Option<Arc<S>>| {
        Store::new(reducer, preloaded_state)
    })
}

/// Create a store, optionally wrapping construction with `enhancer`.
pub fn create_store<S: 'static>(
    reducer: Reducer<S>,
    preloaded_state: Option<S>,
    enhancer: Option<Enhancer<S>>,
) -> Result<Store<S>, StoreError> {
    let create = match enhancer {
        Some(enhancer) => enhancer(base_creator()),
        None => base_creator(),
    };
    create(reducer, preloaded_state.map(Arc::new))
}
