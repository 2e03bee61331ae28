//! Generic screen flow: one active screen, forward-only transitions, an
//! in-flight flag for outstanding requests and a single "back to start"
//! escape that clears the flow's storage keys.

use std::fmt::Debug;
use std::marker::PhantomData;

use super::storage::SessionStorage;
use super::SessionError;

/// Static description of one practice flow.
pub trait Flow {
    type Screen: Copy + Eq + Debug;

    const NAME: &'static str;
    const START: Self::Screen;
    /// Storage keys owned by the flow, removed by `back_to_start`.
    const STORAGE_KEYS: &'static [&'static str];

    /// Whether `from → to` is a legal forward transition.
    fn can_advance(from: Self::Screen, to: Self::Screen) -> bool;
}

/// Live state of one flow instance.
#[derive(Debug, Clone)]
pub struct FlowSession<F: Flow> {
    screen: F::Screen,
    in_flight: bool,
    storage: SessionStorage,
    _flow: PhantomData<F>,
}

impl<F: Flow> Default for FlowSession<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Flow> FlowSession<F> {
    pub fn new() -> Self {
        Self::with_storage(SessionStorage::new())
    }

    pub fn with_storage(storage: SessionStorage) -> Self {
        Self {
            screen: F::START,
            in_flight: false,
            storage,
            _flow: PhantomData,
        }
    }

    pub fn screen(&self) -> F::Screen {
        self.screen
    }

    /// `true` while a request is outstanding (controls are disabled).
    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn storage(&self) -> &SessionStorage {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut SessionStorage {
        &mut self.storage
    }

    /// Move to `to` if the flow allows it.
    pub fn advance(&mut self, to: F::Screen) -> Result<(), SessionError> {
        if !F::can_advance(self.screen, to) {
            return Err(SessionError::InvalidTransition {
                flow: F::NAME,
                from: format!("{:?}", self.screen),
                to: format!("{to:?}"),
            });
        }
        log::debug!("[{}] {:?} -> {:?}", F::NAME, self.screen, to);
        self.screen = to;
        Ok(())
    }

    /// Mark a request as outstanding; fails if one already is.
    pub fn begin_request(&mut self) -> Result<(), SessionError> {
        if self.in_flight {
            return Err(SessionError::RequestInFlight { flow: F::NAME });
        }
        self.in_flight = true;
        Ok(())
    }

    pub fn finish_request(&mut self) {
        self.in_flight = false;
    }

    /// Return to the start screen and clear the flow's storage keys.
    pub fn back_to_start(&mut self) {
        for key in F::STORAGE_KEYS {
            self.storage.remove(key);
        }
        self.screen = F::START;
        self.in_flight = false;
        log::debug!("[{}] back to start", F::NAME);
    }
}
