//! Per-request caller context.

use crate::chat::domain::UserIdentity;
use uuid::Uuid;

/// Authenticated caller and correlation id for one request.
///
/// Transports build this after authentication and pass it to every
/// [`ChatHandler`](super::ChatHandler) call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    request_id: Uuid,
    caller: UserIdentity,
}

impl RequestContext {
    /// Creates a context with a fresh random request id.
    #[must_use]
    pub fn new(caller: UserIdentity) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            caller,
        }
    }

    /// Returns the correlation id.
    #[must_use]
    pub const fn request_id(&self) -> Uuid {
        self.request_id
    }

    /// Returns the authenticated caller.
    #[must_use]
    pub const fn caller(&self) -> &UserIdentity {
        &self.caller
    }
}
