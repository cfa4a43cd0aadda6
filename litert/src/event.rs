use std::marker::PhantomData;
use std::time::Duration;

use litert_sys::*;

use crate::error::{ErrorCause, Result};
use crate::util::check_status;

/// A synchronization event attached to a tensor buffer.
///
/// Signalled by the producer of the buffer's contents (for example an accelerator) once the
/// data is ready. The event is owned by its buffer.
pub struct Event<'b> {
    raw_event: LiteRtEvent,
    _buffer: PhantomData<&'b ()>,
}

impl Event<'_> {
    pub(crate) fn new(raw_event: LiteRtEvent) -> Self {
        Self {
            raw_event,
            _buffer: PhantomData,
        }
    }

    /// Blocks until the event is signalled or `timeout` elapses; `None` waits forever.
    pub fn wait(&self, timeout: Option<Duration>) -> Result<()> {
        check_status!(
            // SAFETY: raw_event is owned by a buffer that outlives self.
            unsafe { LiteRtWaitEvent(self.raw_event, timeout_millis(timeout)) },
            ErrorCause::WaitEvent
        );
        Ok(())
    }
}

/// Timeout in the runtime's convention, where -1 means no timeout.
fn timeout_millis(timeout: Option<Duration>) -> i64 {
    match timeout {
        None => -1,
        Some(timeout) => i64::try_from(timeout.as_millis()).unwrap_or(i64::MAX),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeouts() {
        assert_eq!(timeout_millis(None), -1);
        assert_eq!(timeout_millis(Some(Duration::ZERO)), 0);
        assert_eq!(timeout_millis(Some(Duration::from_millis(250))), 250);
        assert_eq!(timeout_millis(Some(Duration::MAX)), i64::MAX);
    }
}
