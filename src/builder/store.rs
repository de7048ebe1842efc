//! Builder for constructing stores.

use crate::compose::compose;
use crate::core::{create_store, Enhancer, Reducer, Store, StoreError};
use crate::middleware::{apply_middleware, Middleware};

/// Builder for constructing stores with a fluent API.
///
/// Middleware is applied as the outermost enhancer, ahead of any enhancer
/// added with [`StoreBuilder::enhancer`], so every handle the builder hands
/// out carries the middleware-augmented dispatch.
pub struct StoreBuilder<S: 'static> {
    reducer: Reducer<S>,
    preloaded_state: Option<S>,
    middleware: Vec<Box<dyn Middleware<S>>>,
    enhancers: Vec<Enhancer<S>>,
}

impl<S: 'static> StoreBuilder<S> {
    /// Create a new builder around the root reducer.
    pub fn new(reducer: Reducer<S>) -> Self {
        Self {
            reducer,
            preloaded_state: None,
            middleware: Vec::new(),
            enhancers: Vec::new(),
        }
    }

    /// Start from `state` instead of the reducer's initial state.
    pub fn preloaded_state(mut self, state: S) -> Self {
        self.preloaded_state = Some(state);
        self
    }

    /// Append a middleware; earlier middleware sees requests first.
    pub fn middleware<M>(mut self, middleware: M) -> Self
    where
        M: Middleware<S> + 'static,
    {
        self.middleware.push(Box::new(middleware));
        self
    }

    /// Append a store enhancer; earlier enhancers wrap later ones.
    pub fn enhancer(mut self, enhancer: Enhancer<S>) -> Self {
        self.enhancers.push(enhancer);
        self
    }

    /// Build the store.
    /// Returns an error if initialization fails.
    pub fn build(self) -> Result<Store<S>, StoreError> {
        let mut enhancers = Vec::with_capacity(self.enhancers.len() + 1);
        if !self.middleware.is_empty() {
            enhancers.push(apply_middleware(self.middleware));
        }
        enhancers.extend(self.enhancers);

        let enhancer = if enhancers.is_empty() {
            None
        } else {
            Some(compose(enhancers))
        };

        create_store(self.reducer, self.preloaded_state, enhancer)
    }
}
