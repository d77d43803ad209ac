use crate::Setup;

use std::future::Future;

/// Owns the runtime a test runs on and makes sure the test's database
/// objects are cleaned up afterwards, even when the test panics.
pub struct QuarryTest<S: Setup> {
    runtime: tokio::runtime::Runtime,
    setup: S,
}

impl<S: Setup> QuarryTest<S> {
    /// Create a new QuarryTest with a current-thread runtime.
    pub fn new(setup: S) -> Self {
        let _ = env_logger::builder().is_test(true).try_init();

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("Failed to create Tokio runtime");

        Self { runtime, setup }
    }

    /// Run a test function with the setup, using our managed runtime.
    pub fn run_test<'a, F, Fut>(&'a self, test_fn: F)
    where
        F: FnOnce(&'a S) -> Fut,
        Fut: Future<Output = ()> + 'a,
    {
        self.runtime.block_on(test_fn(&self.setup));
    }
}

impl<S: Setup> Drop for QuarryTest<S> {
    fn drop(&mut self) {
        if let Err(err) = self.runtime.block_on(self.setup.cleanup()) {
            log::warn!("test cleanup failed: {err}");
        }
    }
}
