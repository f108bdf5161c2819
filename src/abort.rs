use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::Fido2Error;

/// Caller-supplied cooperative cancellation signal.
///
/// Polled at defined checkpoints inside MakeCredential and GetAssertion;
/// once observed, the call terminates with [`Fido2Error::Aborted`] and
/// nothing is persisted.
#[derive(Debug, Clone, Default)]
pub struct AbortSignal {
    aborted: Arc<AtomicBool>,
}

impl AbortSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn abort(&self) {
        self.aborted.store(true, Ordering::SeqCst);
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted.load(Ordering::SeqCst)
    }
}

/// Abort checkpoint. No-op when no signal was supplied.
pub(crate) fn check_for_abort(signal: Option<&AbortSignal>) -> Result<(), Fido2Error> {
    match signal {
        Some(signal) if signal.is_aborted() => Err(Fido2Error::Aborted),
        _ => Ok(()),
    }
}
