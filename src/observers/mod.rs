//! Process-wide error observers
//!
//! Three sources of errors are observed for the lifetime of the process:
//! - application errors raised while serving a request
//! - spawned tasks that fail or panic without anyone awaiting them
//! - uncaught errors and panics
//!
//! Uncaught errors go through a [`PolicyTable`]; by default only a port
//! conflict terminates the process.

mod policy;

pub use policy::{Action, ErrorClass, PolicyTable};

use std::any::Any;
use std::error::Error;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};
use tokio::task::JoinHandle;

use crate::logger::{self, RequestLogger};

/// Exit code used when the policy terminates the process
pub const TERMINATE_EXIT_CODE: i32 = 1;

static OBSERVERS: OnceLock<ErrorObservers> = OnceLock::new();

tokio::task_local! {
    // Set while polling a task spawned by `spawn_observed`
    static OBSERVED_TASK: ();
}

/// Install the process-wide observers
///
/// The first call registers the panic hook and fixes the policy for the
/// rest of the process; later calls return the already installed observers
/// and ignore `policy`. Panics inside [`ErrorObservers::spawn_observed`]
/// tasks are left to that task's watcher and are not reported by the hook.
pub fn install(policy: PolicyTable) -> &'static ErrorObservers {
    let mut installed_now = false;
    let observers = OBSERVERS.get_or_init(|| {
        installed_now = true;
        ErrorObservers::new(policy)
    });

    if installed_now {
        std::panic::set_hook(Box::new(|info| {
            if in_observed_task() {
                return;
            }
            let location = info
                .location()
                .map(|l| format!("{}:{}", l.file(), l.line()));
            if let Some(observers) = OBSERVERS.get() {
                let action =
                    observers.report_panic(&panic_message(info.payload()), location.as_deref());
                enforce(action);
            }
        }));
    }

    observers
}

/// Installed observers, if [`install`] has run
pub fn installed() -> Option<&'static ErrorObservers> {
    OBSERVERS.get()
}

fn in_observed_task() -> bool {
    OBSERVED_TASK.try_with(|_| ()).is_ok()
}

/// How many errors each observer has reported
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObserverStats {
    pub app_errors: usize,
    /// Application errors that also went to a request logger
    pub request_errors: usize,
    pub unhandled: usize,
    pub uncaught: usize,
}

#[derive(Debug, Default)]
struct Counters {
    app_errors: AtomicUsize,
    request_errors: AtomicUsize,
    unhandled: AtomicUsize,
    uncaught: AtomicUsize,
}

/// Error observers with their uncaught-error policy
///
/// Clones share their counters.
#[derive(Debug, Clone, Default)]
pub struct ErrorObservers {
    policy: PolicyTable,
    counters: Arc<Counters>,
}

impl ErrorObservers {
    pub fn new(policy: PolicyTable) -> Self {
        Self {
            policy,
            counters: Arc::default(),
        }
    }

    pub const fn policy(&self) -> &PolicyTable {
        &self.policy
    }

    pub fn stats(&self) -> ObserverStats {
        let c = &self.counters;
        ObserverStats {
            app_errors: c.app_errors.load(Ordering::Relaxed),
            request_errors: c.request_errors.load(Ordering::Relaxed),
            unhandled: c.unhandled.load(Ordering::Relaxed),
            uncaught: c.uncaught.load(Ordering::Relaxed),
        }
    }

    /// Error raised by the application while serving a request
    ///
    /// Logged globally and, when the request carries a logger, through it.
    pub fn app_error(&self, err: &dyn fmt::Display, ctx: Option<&RequestLogger>) {
        self.counters.app_errors.fetch_add(1, Ordering::Relaxed);
        logger::log_app_error(err);
        if let Some(log) = ctx {
            self.counters.request_errors.fetch_add(1, Ordering::Relaxed);
            log.error(err);
        }
    }

    /// Background task that ended in an error nobody awaited
    pub fn unhandled_rejection(&self, origin: &str, reason: &dyn fmt::Display) {
        self.counters.unhandled.fetch_add(1, Ordering::Relaxed);
        logger::log_unhandled_rejection(origin, &reason.to_string());
    }

    /// Spawn a task whose failure, panic or cancellation is reported as
    /// unhandled
    pub fn spawn_observed<F, E>(&self, origin: impl Into<String>, fut: F) -> JoinHandle<()>
    where
        F: Future<Output = Result<(), E>> + Send + 'static,
        E: fmt::Display + Send + 'static,
    {
        let origin = origin.into();
        let observers = self.clone();
        let task = tokio::spawn(OBSERVED_TASK.scope((), fut));
        tokio::spawn(async move {
            match task.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => observers.unhandled_rejection(&origin, &e),
                Err(join_err) if join_err.is_panic() => {
                    let reason = panic_message(join_err.into_panic().as_ref());
                    observers.unhandled_rejection(&origin, &format!("task panicked: {reason}"));
                }
                Err(_) => observers.unhandled_rejection(&origin, &"task cancelled"),
            }
        })
    }

    /// Log an uncaught error and return what the policy says to do
    pub fn decide(&self, err: &(dyn Error + 'static)) -> Action {
        self.record_uncaught(&err.to_string(), ErrorClass::of_error(err))
    }

    /// Log an uncaught error and exit if the policy says so
    pub fn uncaught(&self, err: &(dyn Error + 'static)) -> Action {
        let action = self.decide(err);
        enforce(action);
        action
    }

    /// Log a panic that escaped every task and return the policy's action
    pub fn report_panic(&self, message: &str, location: Option<&str>) -> Action {
        let line = match location {
            Some(at) => format!("panic at {at}: {message}"),
            None => format!("panic: {message}"),
        };
        self.record_uncaught(&line, ErrorClass::of_message(message))
    }

    fn record_uncaught(&self, message: &str, class: ErrorClass) -> Action {
        self.counters.uncaught.fetch_add(1, Ordering::Relaxed);
        logger::log_uncaught(message);
        self.policy.action_for(class)
    }
}

fn enforce(action: Action) {
    if action == Action::LogAndTerminate {
        logger::write_error("[Uncaught] terminating process");
        std::process::exit(TERMINATE_EXIT_CODE);
    }
}

/// Best-effort text of a panic payload
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
