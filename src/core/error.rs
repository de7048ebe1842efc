//! Errors raised by the store, its combinators and the binder.

use thiserror::Error;

/// Errors that can occur while building stores or dispatching actions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The request is not a plain action record or its `type` is unusable.
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    /// `dispatch` (or `replace_reducer`) reached the core while a dispatch was in progress.
    #[error("Reducers and listeners may not dispatch actions (dispatch of '{action_type}' rejected)")]
    ReentrantDispatch { action_type: String },

    /// `get_state` was called while the reducer is executing.
    #[error("State is not readable while the reducer is executing. Use the state passed to the reducer instead")]
    NotReady,

    /// The root reducer returned no state.
    #[error("Reducer returned no state for action '{action_type}'")]
    UndefinedState { action_type: String },

    /// A slice reducer returned no state, either for the initialization
    /// check run when the slices are combined or for a dispatched action.
    #[error("Slice reducer for key '{key}' returned no state for action '{action_type}'")]
    UndefinedSliceState { key: String, action_type: String },

    /// A slice reducer returned no state for an unknown action type.
    #[error("Slice reducer for key '{key}' {reason}")]
    SliceShape { key: String, reason: String },

    /// The middleware api was used to dispatch before the chain was assembled.
    #[error("Dispatching while constructing the middleware chain is not allowed")]
    DispatchDuringSetup,

    /// The store behind a middleware api no longer exists.
    #[error("The store backing this dispatch has been dropped")]
    StoreDropped,

    /// Malformed input handed to the action-creator binder.
    #[error("Invalid action creator binding: {0}")]
    InvalidBinding(String),
}
