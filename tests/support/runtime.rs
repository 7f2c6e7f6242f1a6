//! Tokio runtime and mock server slots for behavioural tests.

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use prfetch::FetchError;
use rstest_bdd::Slot;
use tokio::runtime::{Builder, Runtime};
use wiremock::MockServer;

/// Current-thread runtime that steps can share through a `Slot`.
#[derive(Clone)]
pub struct SharedRuntime(Rc<RefCell<Runtime>>);

impl SharedRuntime {
    fn start() -> Result<Self, FetchError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|error| FetchError::Io {
                message: format!("failed to create Tokio runtime: {error}"),
            })?;
        Ok(Self(Rc::new(RefCell::new(runtime))))
    }

    /// Drives `future` to completion.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.0.borrow().block_on(future)
    }
}

/// Starts the runtime and the mock GraphQL server on first use.
///
/// # Errors
///
/// Returns [`FetchError::Io`] when the runtime cannot be created.
pub fn runtime_with_server(
    runtime: &Slot<SharedRuntime>,
    server: &Slot<MockServer>,
) -> Result<SharedRuntime, FetchError> {
    let shared = match runtime.get() {
        Some(existing) => existing,
        None => {
            let started = SharedRuntime::start()?;
            runtime.set(started.clone());
            started
        }
    };

    if server.with_ref(|_| ()).is_none() {
        server.set(shared.block_on(MockServer::start()));
    }

    Ok(shared)
}
