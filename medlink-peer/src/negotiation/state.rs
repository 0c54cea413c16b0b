/// Why a session settled in `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// No offer/answer appeared on the relay before the configured
    /// deadline.
    Timeout,
    /// The underlying peer connection reported failure.
    Transport,
}

/// Lifecycle of one negotiation session. Both role walks are merged into
/// one enum: the caller goes Idle → OfferCreated → AwaitingAnswer →
/// AnswerApplied, the callee Idle → AwaitingOffer → OfferApplied →
/// AnswerPublished; from there both share the connection-level tail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallState {
    Idle,
    OfferCreated,
    AwaitingAnswer,
    AnswerApplied,
    AwaitingOffer,
    OfferApplied,
    AnswerPublished,
    Connected,
    Failed(FailureReason),
    Disconnected,
    Closed,
}

impl CallState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            CallState::Failed(_) | CallState::Disconnected | CallState::Closed
        )
    }

    /// Terminal states don't un-happen; `Closed` is the final word.
    /// `Connected` only moves forward: the handshake tasks race the
    /// connection callback, and a late `AnswerApplied`/`AnswerPublished`
    /// write must not regress a connection that is already up.
    pub(crate) fn may_become(&self, next: &CallState) -> bool {
        match self {
            CallState::Closed => false,
            CallState::Failed(_) | CallState::Disconnected => matches!(next, CallState::Closed),
            CallState::Connected => matches!(
                next,
                CallState::Failed(_) | CallState::Disconnected | CallState::Closed
            ),
            _ => true,
        }
    }
}
