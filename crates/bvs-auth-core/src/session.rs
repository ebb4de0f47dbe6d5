//! Session resolution from bearer tokens
//!
//! One inbound request walks `NoToken -> TokenPresent -> Resolved | Rejected`.
//! Every rejection surfaces to the caller as the same
//! [`AuthError::InvalidToken`]; the specific [`RejectReason`] is only logged.

use bvs_types::UserId;

use crate::access::Identity;
use crate::token::{AccessClaims, TokenCodec};
use crate::AuthError;

const BEARER_PREFIX: &str = "Bearer ";

/// Why a request was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// No authorization header at all
    MissingHeader,
    /// Header present but not `Bearer <token>`
    MalformedHeader,
    /// Signature, algorithm, expiry or structure check failed
    TokenRejected,
    /// Verified token whose subject is not a UUID
    InvalidSubject,
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::MissingHeader => "missing authorization header",
            Self::MalformedHeader => "malformed authorization header",
            Self::TokenRejected => "token rejected",
            Self::InvalidSubject => "invalid subject",
        };
        f.write_str(s)
    }
}

/// Resolution state for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    NoToken,
    TokenPresent(String),
    Resolved(Identity),
    Rejected(RejectReason),
}

impl SessionState {
    /// Initial state for an authorization header value
    pub fn from_header(header: Option<&str>) -> Self {
        match header {
            None => Self::NoToken,
            Some(value) => match extract_bearer(Some(value)) {
                Some(token) => Self::TokenPresent(token.to_string()),
                None => Self::Rejected(RejectReason::MalformedHeader),
            },
        }
    }

    /// Resolved and Rejected are final
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Resolved(_) | Self::Rejected(_))
    }
}

/// Extract the token from `Bearer <token>`.
///
/// The scheme is matched exactly and the token must be non-empty.
pub fn extract_bearer(header: Option<&str>) -> Option<&str> {
    let token = header?.strip_prefix(BEARER_PREFIX)?;
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Turns an authorization header into an [`Identity`]
#[derive(Debug, Clone)]
pub struct SessionResolver {
    codec: TokenCodec,
}

impl SessionResolver {
    pub fn new(codec: TokenCodec) -> Self {
        Self { codec }
    }

    /// Advance one state
    pub fn step(&self, state: SessionState) -> SessionState {
        match state {
            SessionState::NoToken => SessionState::Rejected(RejectReason::MissingHeader),
            SessionState::TokenPresent(token) => match self.codec.verify(&token) {
                Ok(claims) => match identity_from_claims(claims) {
                    Some(identity) => SessionState::Resolved(identity),
                    None => SessionState::Rejected(RejectReason::InvalidSubject),
                },
                Err(_) => SessionState::Rejected(RejectReason::TokenRejected),
            },
            terminal => terminal,
        }
    }

    /// Run the state machine to a terminal state
    pub fn run(&self, header: Option<&str>) -> SessionState {
        let mut state = SessionState::from_header(header);
        while !state.is_terminal() {
            state = self.step(state);
        }
        state
    }

    /// Resolve an authorization header value to an identity
    pub fn resolve(&self, header: Option<&str>) -> Result<Identity, AuthError> {
        match self.run(header) {
            SessionState::Resolved(identity) => Ok(identity),
            SessionState::Rejected(reason) => {
                tracing::debug!(%reason, "Rejected bearer token");
                Err(AuthError::InvalidToken)
            }
            // run() only returns terminal states
            SessionState::NoToken | SessionState::TokenPresent(_) => Err(AuthError::InvalidToken),
        }
    }
}

fn identity_from_claims(claims: AccessClaims) -> Option<Identity> {
    let user_id = UserId::parse(&claims.sub).ok()?;
    Some(Identity::new(user_id, claims.roles, claims.memberships))
}
