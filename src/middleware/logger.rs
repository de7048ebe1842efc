//! Action logging middleware.

use crate::core::{ActionType, DispatchFn, Request};
use crate::middleware::{Link, Middleware, MiddlewareApi};
use chrono::{SecondsFormat, Utc};
use log::Level;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::rc::Rc;

/// Settings for [`LoggerMiddleware`].
///
/// Every field has a default, so partial documents deserialize:
///
/// ```rust
/// use statecraft::middleware::LoggerConfig;
///
/// let config: LoggerConfig =
///     serde_json::from_str(r#"{ "level": "INFO", "include_state": true }"#).unwrap();
///
/// assert_eq!(config.level, log::Level::Info);
/// assert!(config.include_state);
/// assert!(config.skip_internal);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Level the log lines are emitted at.
    pub level: Level,
    /// Log target.
    pub target: String,
    /// Also log the state before and after each action.
    pub include_state: bool,
    /// Prefix lines with an RFC 3339 timestamp.
    pub include_timestamp: bool,
    /// Action types that are never logged.
    pub ignored_types: Vec<ActionType>,
    /// Skip the store's own `@@statecraft/` actions.
    pub skip_internal: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: Level::Debug,
            target: "statecraft::logger".to_string(),
            include_state: false,
            include_timestamp: false,
            ignored_types: Vec::new(),
            skip_internal: true,
        }
    }
}

impl LoggerConfig {
    pub fn should_log(&self, action_type: &ActionType) -> bool {
        if self.skip_internal && action_type.is_internal() {
            return false;
        }
        !self.ignored_types.contains(action_type)
    }
}

/// Logs every action passing through, optionally with the surrounding states.
///
/// Thunks and other non-action requests are passed on without logging.
#[derive(Clone, Debug, Default)]
pub struct LoggerMiddleware {
    config: Rc<LoggerConfig>,
}

impl LoggerMiddleware {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: LoggerConfig) -> Self {
        Self {
            config: Rc::new(config),
        }
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }
}

fn stamp(config: &LoggerConfig) -> String {
    if config.include_timestamp {
        format!("{} ", Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true))
    } else {
        String::new()
    }
}

impl<S: Debug + 'static> Middleware<S> for LoggerMiddleware {
    fn bind(&self, api: MiddlewareApi<S>) -> Link<S> {
        let config = Rc::clone(&self.config);
        Box::new(move |next: DispatchFn<S>| -> DispatchFn<S> {
            let api = api.clone();
            let config = Rc::clone(&config);
            Rc::new(move |request: Request<S>| {
                let action_type = match request.as_action() {
                    Some(action) if config.should_log(action.action_type()) => {
                        action.action_type().clone()
                    }
                    _ => return next(request),
                };

                let target = config.target.as_str();
                let level = config.level;
                if config.include_state {
                    if let Ok(state) = api.get_state() {
                        log::log!(target: target, level, "{}prev state {:?}", stamp(&config), state);
                    }
                }
                if let Some(action) = request.as_action() {
                    log::log!(target: target, level, "{}action {:?}", stamp(&config), action);
                }

                let result = next(request);

                match &result {
                    Ok(_) if config.include_state => {
                        if let Ok(state) = api.get_state() {
                            log::log!(target: target, level, "{}next state {:?}", stamp(&config), state);
                        }
                    }
                    Ok(_) => {}
                    Err(e) => {
                        log::log!(target: target, level, "{}action {} failed: {}", stamp(&config), action_type, e);
                    }
                }

                result
            })
        })
    }
}
