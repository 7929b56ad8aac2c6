//! Cooperative stop requests.
//!
//! The batch loop polls the flag once per record, so the record in progress
//! always finishes before the loop exits.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stop_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Routes SIGINT to this flag. Repeated SIGINTs only set it again; the
    /// process keeps running until the batch loop notices.
    pub fn install_sigint_handler(&self) -> std::io::Result<()> {
        signal_hook::flag::register(signal_hook::consts::SIGINT, Arc::clone(&self.0))?;
        Ok(())
    }
}
