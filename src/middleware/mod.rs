//! Dispatch middleware and the pipeline builder.
//!
//! Middleware sits between a `dispatch` call and the store core, allowing
//! logging, deferred work and other cross-cutting concerns to be layered
//! on without the core knowing about them.
//!
//! ```text
//! dispatch → m1 → m2 → … → mk → store core → reducer → listeners
//! ```
//!
//! Each middleware can:
//! - Inspect requests and read state through [`MiddlewareApi`]
//! - Dispatch new requests from the top of the chain
//! - Transform the result returned to the caller
//! - Swallow a request by not calling `next`

mod logger;
mod thunk;

pub use logger::{LoggerConfig, LoggerMiddleware};
pub use thunk::ThunkMiddleware;

use crate::compose::compose;
use crate::core::{
    DispatchFn, DispatchResult, Enhancer, Reducer, Request, Store, StoreApi, StoreCreator,
    StoreError,
};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::Arc;

type DispatchSlot<S> = Rc<RefCell<Option<Weak<dyn Fn(Request<S>) -> DispatchResult>>>>;

/// Capabilities handed to each middleware when the pipeline is built.
///
/// `dispatch` always enters the fully assembled chain from the top, even
/// though the middleware receives the api before the chain exists.
pub struct MiddlewareApi<S> {
    store: Store<S>,
    dispatch: DispatchSlot<S>,
}

impl<S: 'static> MiddlewareApi<S> {
    fn new(store: Store<S>, dispatch: DispatchSlot<S>) -> Self {
        MiddlewareApi { store, dispatch }
    }

    pub fn get_state(&self) -> Result<Arc<S>, StoreError> {
        self.store.get_state()
    }

    /// Dispatch through the whole pipeline.
    ///
    /// Fails with [`StoreError::DispatchDuringSetup`] until the pipeline
    /// has been assembled.
    pub fn dispatch(&self, request: impl Into<Request<S>>) -> DispatchResult {
        let dispatch = self
            .dispatch
            .borrow()
            .as_ref()
            .ok_or(StoreError::DispatchDuringSetup)?
            .upgrade()
            .ok_or(StoreError::StoreDropped)?;
        dispatch(request.into())
    }
}

impl<S: 'static> StoreApi<S> for MiddlewareApi<S> {
    fn state(&self) -> Result<Arc<S>, StoreError> {
        MiddlewareApi::get_state(self)
    }

    fn dispatch_request(&self, request: Request<S>) -> DispatchResult {
        MiddlewareApi::dispatch(self, request)
    }
}

impl<S> Clone for MiddlewareApi<S> {
    fn clone(&self) -> Self {
        MiddlewareApi {
            store: self.store.clone(),
            dispatch: Rc::clone(&self.dispatch),
        }
    }
}

/// Second stage of a middleware: wraps the next link into a new link.
pub type Link<S> = Box<dyn Fn(DispatchFn<S>) -> DispatchFn<S>>;

/// A dispatch interceptor.
///
/// `bind` runs once per store, when the pipeline is assembled; the returned
/// [`Link`] receives the next link and produces the per-request handler.
/// Any closure `Fn(MiddlewareApi<S>) -> Link<S>` is a middleware.
pub trait Middleware<S> {
    fn bind(&self, api: MiddlewareApi<S>) -> Link<S>;
}

impl<S, F> Middleware<S> for F
where
    F: Fn(MiddlewareApi<S>) -> Link<S>,
{
    fn bind(&self, api: MiddlewareApi<S>) -> Link<S> {
        self(api)
    }
}

/// Build a middleware from a per-request handler.
///
/// # Example
///
/// ```rust
/// use statecraft::middleware::from_handler;
/// use statecraft::{Action, Outcome, Reducer, Request, StoreBuilder};
/// use std::sync::Arc;
///
/// // Drops every action typed "ignored" before it reaches the reducer.
/// let filter = from_handler(|_api, next, request: Request<u32>| match request.as_action() {
///     Some(action) if action.is("ignored") => Ok(Outcome::Skipped),
///     _ => next(request),
/// });
///
/// let reducer = Reducer::with_initial(0u32, |state: &Arc<u32>, _: &Action| {
///     Arc::new(**state + 1)
/// });
/// let store = StoreBuilder::new(reducer).middleware(filter).build().unwrap();
///
/// assert_eq!(store.dispatch(Action::new("ignored")).unwrap(), Outcome::Skipped);
/// assert_eq!(*store.get_state().unwrap(), 1);
/// ```
pub fn from_handler<S, H>(handler: H) -> impl Middleware<S>
where
    S: 'static,
    H: Fn(&MiddlewareApi<S>, &DispatchFn<S>, Request<S>) -> DispatchResult + 'static,
{
    let handler = Rc::new(handler);
    move |api: MiddlewareApi<S>| -> Link<S> {
        let handler = Rc::clone(&handler);
        Box::new(move |next: DispatchFn<S>| -> DispatchFn<S> {
            let handler = Rc::clone(&handler);
            let api = api.clone();
            Rc::new(move |request: Request<S>| handler(&api, &next, request))
        })
    }
}

/// Turn an ordered list of middleware into a store enhancer.
///
/// The first middleware is outermost: it sees each request first and each
/// result last. The enhancer must be the outermost one applied; a handle
/// produced by an enhancer applied after it never sees the augmented
/// dispatch.
pub fn apply_middleware<S: 'static>(middleware: Vec<Box<dyn Middleware<S>>>) -> Enhancer<S> {
    let middleware = Rc::new(middleware);
    Box::new(move |create: StoreCreator<S>| -> StoreCreator<S> {
        let middleware = Rc::clone(&middleware);
        Rc::new(
            move |reducer: Reducer<S>,
                  preloaded_state: Option<Arc<S>>|
                  -> Result<Store<S>, StoreError> {
                let store = create(reducer, preloaded_state)?;
                let slot: DispatchSlot<S> = Rc::new(RefCell::new(None));
                let api = MiddlewareApi::new(store.clone(), Rc::clone(&slot));

                let chain: Vec<Link<S>> = middleware.iter().map(|m| m.bind(api.clone())).collect();
                log::debug!("assembled dispatch pipeline with {} middleware", chain.len());

                let dispatch = compose(chain)(store.dispatcher());
                *slot.borrow_mut() = Some(Rc::downgrade(&dispatch));

                Ok(store.with_dispatch(dispatch))
            },
        )
    })
}
