use tracing::{debug, trace, warn};

use crate::{
    engine::{Engine, EngineError, Step},
    error::InflateError,
    framing::Framing,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailReason {
    Malformed,
    OutOfMemory,
    Version,
    Io,
}

impl From<&InflateError> for FailReason {
    fn from(e: &InflateError) -> Self {
        match e {
            InflateError::MalformedInput(_) => FailReason::Malformed,
            InflateError::OutOfMemory => FailReason::OutOfMemory,
            InflateError::VersionMismatch => FailReason::Version,
            InflateError::Io(_) => FailReason::Io,
        }
    }
}

/*  Ready -> { Feeding <-> Draining } -> Finished
 *                                    -> Failed(reason)
 *
 *  Finished and Failed are terminal. The engine is ended on drop, whatever
 *  the state.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Ready,
    Feeding,
    Draining,
    Finished,
    Failed(FailReason),
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Finished | SessionState::Failed(_))
    }
}

/// Exclusive owner of one engine for the duration of a decompress call.
pub struct Session<E: Engine> {
    engine: E,
    framing: Framing,
    state: SessionState,
}

impl<E: Engine> Session<E> {
    /// Uninitialized -> Ready. On error nothing was created so there is
    /// nothing to end.
    pub fn open(framing: Framing) -> Result<Self, InflateError> {
        let engine = E::init(framing).map_err(|e| {
            debug!(%framing, error = %e, "engine init failed");
            InflateError::from(e)
        })?;
        trace!(%framing, "session ready");
        Ok(Session {
            engine,
            framing,
            state: SessionState::Ready,
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn framing(&self) -> Framing {
        self.framing
    }

    pub fn is_finished(&self) -> bool {
        self.state == SessionState::Finished
    }

    pub fn feed(&mut self) {
        self.transition(SessionState::Feeding);
    }

    pub fn step(
        &mut self,
        input: &[u8],
        output: &mut [u8],
    ) -> Result<Step, InflateError> {
        self.transition(SessionState::Draining);
        match self.engine.step(input, output) {
            Ok(step) => {
                if step.is_stream_end() {
                    self.transition(SessionState::Finished);
                }
                Ok(step)
            }
            Err(e) => {
                if e == EngineError::Stream {
                    warn!(framing = %self.framing, "inflate state corrupted");
                }
                debug_assert!(
                    e != EngineError::Stream,
                    "inflate state corrupted"
                );
                Err(self.fail(InflateError::from(e)))
            }
        }
    }

    /// Zero length source, nothing to inflate.
    pub fn finish_empty(&mut self) {
        self.transition(SessionState::Finished);
    }

    /// Moves to Failed and hands the error back for returning.
    pub fn fail(&mut self, error: InflateError) -> InflateError {
        self.transition(SessionState::Failed(FailReason::from(&error)));
        debug!(framing = %self.framing, %error, "session failed");
        error
    }

    fn transition(&mut self, next: SessionState) {
        if self.state.is_terminal() {
            return;
        }
        trace!(from = ?self.state, to = ?next, "session");
        self.state = next;
    }
}

impl<E: Engine> Drop for Session<E> {
    fn drop(&mut self) {
        self.engine.end();
        trace!(state = ?self.state, "session ended");
    }
}
