//! Per-request state shared by the views.

/// Where a view's most recent request stands.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestState<T> {
    /// Nothing has been requested yet.
    #[default]
    Idle,
    /// A request is in flight.
    Loading,
    /// The last request failed with the given user-facing message.
    Failed(String),
    /// The last request succeeded.
    Ready(T),
}

impl<T> RequestState<T> {
    /// True while a request is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading)
    }

    /// The data of the last successful request.
    pub fn data(&self) -> Option<&T> {
        match self {
            RequestState::Ready(data) => Some(data),
            _ => None,
        }
    }

    /// Mutable access to the data of the last successful request.
    pub fn data_mut(&mut self) -> Option<&mut T> {
        match self {
            RequestState::Ready(data) => Some(data),
            _ => None,
        }
    }

    /// The message of the last failure.
    pub fn error(&self) -> Option<&str> {
        match self {
            RequestState::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Mark a request as started.
    ///
    /// The state stays [`RequestState::Loading`] until the returned guard is
    /// resolved.  A guard dropped unresolved, as happens when the request
    /// future is cancelled, puts the state back to [`RequestState::Idle`].
    pub fn begin(&mut self) -> InFlight<'_, T> {
        *self = RequestState::Loading;
        InFlight { state: self }
    }
}

/// An outstanding request; see [`RequestState::begin`].
#[must_use = "dropping the guard abandons the request"]
pub struct InFlight<'a, T> {
    state: &'a mut RequestState<T>,
}

impl<T> InFlight<'_, T> {
    /// Record success.
    pub fn succeed(self, data: T) {
        *self.state = RequestState::Ready(data);
    }

    /// Record failure with a user-facing message.
    pub fn fail(self, message: &str) {
        *self.state = RequestState::Failed(message.to_string());
    }
}

impl<T> Drop for InFlight<'_, T> {
    fn drop(&mut self) {
        if self.state.is_loading() {
            *self.state = RequestState::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle() {
        let mut state: RequestState<u32> = RequestState::default();
        assert_eq!(state, RequestState::Idle);
        let request = state.begin();
        request.succeed(7);
        assert_eq!(state.data(), Some(&7));
        state
            .begin()
            .fail("Error fetching Q&A pairs. Please try again.");
        assert_eq!(
            state.error(),
            Some("Error fetching Q&A pairs. Please try again.")
        );
        assert_eq!(state.data(), None);
    }

    #[test]
    fn abandoned_request_returns_to_idle() {
        let mut state: RequestState<u32> = RequestState::Ready(1);
        {
            let _request = state.begin();
        }
        assert_eq!(state, RequestState::Idle);
        assert!(!state.is_loading());
    }
}
