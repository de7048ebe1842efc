//! Runs function-shaped requests instead of forwarding them.

use crate::core::{DispatchFn, Request, StoreApi};
use crate::middleware::{Link, Middleware, MiddlewareApi};
use std::rc::Rc;

/// Middleware that executes [`Request::Thunk`] values with the pipeline's api.
///
/// A thunk never reaches the store core: its return value becomes the
/// result of `dispatch`. Plain actions pass through untouched.
///
/// # Example
///
/// ```rust
/// use statecraft::middleware::ThunkMiddleware;
/// use statecraft::{Action, Reducer, Request, StoreBuilder};
/// use std::sync::Arc;
///
/// let reducer = Reducer::with_initial(0i64, |state: &Arc<i64>, action: &Action| {
///     if action.is("inc") { Arc::new(**state + 1) } else { Arc::clone(state) }
/// });
/// let store = StoreBuilder::new(reducer).middleware(ThunkMiddleware).build().unwrap();
///
/// store
///     .dispatch(Request::<i64>::thunk(|api| {
///         if *api.get_state()? < 2 {
///             api.dispatch(Action::new("inc"))?;
///         }
///         api.dispatch(Action::new("inc"))
///     }))
///     .unwrap();
///
/// assert_eq!(*store.get_state().unwrap(), 2);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct ThunkMiddleware;

impl<S: 'static> Middleware<S> for ThunkMiddleware {
    fn bind(&self, api: MiddlewareApi<S>) -> Link<S> {
        Box::new(move |next: DispatchFn<S>| -> DispatchFn<S> {
            let api = api.clone();
            Rc::new(move |request: Request<S>| match request {
                Request::Thunk(thunk) => {
                    let api: &dyn StoreApi<S> = &api;
                    thunk(api)
                }
                action => next(action),
            })
        })
    }
}
