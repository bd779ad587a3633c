//! Session check: decode the persisted bearer token and derive the user.
//!
//! # Design
//! - Absence of a token (or a value without the `Bearer ` prefix) is not an
//!   error; the check simply reports no user.
//! - The payload is decoded without signature verification; the server stays
//!   the authority, the client only needs the user record and expiry.
//! - An expired token is cleared through the session store.
//! - `loading` flips to `false` exactly once, on every exit path.
//! - Claims are read as JSON numbers: fractional `exp`/`iat` are accepted and
//!   a token without `exp` never expires.
//! - The outcome is the [`AuthOutcome`] slice of the injected context.

use std::rc::Rc;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::core::host::HostEnvironment;
use crate::core::persistence::PersistencePort;
use crate::core::session::{AUTH_COOKIE, SessionStore};
use crate::core::store::{Context, Slice, Store, SubscriptionId};
use crate::error::AuthError;

/// Prefix of the persisted session value.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Opaque user record embedded in the token.
pub type UserRecord = Map<String, Value>;

/// Claims carried by the session token.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct DecodedIdentity<U = UserRecord> {
    /// Embedded user record.
    pub user: U,
    /// Issued-at, seconds since the epoch.
    #[serde(default)]
    pub iat: Option<f64>,
    /// Expiry, seconds since the epoch.
    #[serde(default)]
    pub exp: Option<f64>,
}

impl<U> DecodedIdentity<U> {
    /// Whether the token has expired at `now_ms` (milliseconds). A token
    /// without `exp` is never expired.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        self.exp.is_some_and(|exp| exp * 1000.0 < now_ms as f64)
    }
}

/// Decode the payload segment of a JWT.
///
/// # Errors
///
/// Returns an [`AuthError`] when the token has no payload segment, the segment
/// is not base64url, or the claims do not match `DecodedIdentity<U>`.
pub fn decode_token<U: DeserializeOwned>(token: &str) -> Result<DecodedIdentity<U>, AuthError> {
    let payload = token
        .split('.')
        .nth(1)
        .filter(|segment| !segment.is_empty())
        .ok_or(AuthError::MissingPayload)?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|err| AuthError::Base64 {
            detail: err.to_string(),
        })?;
    serde_json::from_slice(&bytes).map_err(|err| AuthError::Json {
        detail: err.to_string(),
    })
}

/// Observable result of the session check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthOutcome<U = UserRecord> {
    /// Authenticated user, if any.
    pub user: Option<U>,
    /// Whether the check is still running.
    pub loading: bool,
    /// Decode failure, distinct from "no token".
    pub error: Option<AuthError>,
}

impl<U> Default for AuthOutcome<U> {
    fn default() -> Self {
        Self {
            user: None,
            loading: true,
            error: None,
        }
    }
}

impl<U: Clone + PartialEq + 'static> Store for AuthOutcome<U> {
    fn new(_cx: &Context) -> Self {
        Self::default()
    }

    fn should_notify(&self, old: &Self) -> bool {
        self != old
    }
}

/// One-shot session check run when the UI mounts.
pub struct AuthCheck<U: Clone + PartialEq + 'static = UserRecord> {
    session: SessionStore,
    persistence: Rc<dyn PersistencePort>,
    host: HostEnvironment,
    outcome: Slice<AuthOutcome<U>>,
}

impl<U: DeserializeOwned + Clone + PartialEq + 'static> AuthCheck<U> {
    /// Build the check in `cx`; the outcome starts as `loading`.
    #[must_use]
    pub fn new(
        cx: &Context,
        session: SessionStore,
        persistence: Rc<dyn PersistencePort>,
        host: HostEnvironment,
    ) -> Self {
        Self {
            session,
            persistence,
            host,
            outcome: Slice::with_state(cx, AuthOutcome::default()),
        }
    }

    /// Run the check and return the settled outcome.
    pub fn run(&self) -> AuthOutcome<U> {
        let Some(now_ms) = self.host.now_ms() else {
            self.outcome.update(|outcome| outcome.loading = false);
            return self.outcome.get();
        };

        let result = self.evaluate(now_ms);
        self.outcome.update(|outcome| {
            match result {
                Ok(user) => outcome.user = user,
                Err(err) => {
                    tracing::warn!(error = %err, "session token could not be decoded");
                    outcome.error = Some(err);
                }
            }
            outcome.loading = false;
        });
        self.outcome.get()
    }

    /// Latest outcome.
    #[must_use]
    pub fn outcome(&self) -> AuthOutcome<U> {
        self.outcome.get()
    }

    /// Observe outcome changes.
    pub fn subscribe(&self, listener: impl Fn(&AuthOutcome<U>) + 'static) -> SubscriptionId {
        self.outcome.subscribe(listener)
    }

    /// Stop observing.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.outcome.unsubscribe(id)
    }

    fn evaluate(&self, now_ms: i64) -> Result<Option<U>, AuthError> {
        let Some(raw) = self.persistence.read(AUTH_COOKIE) else {
            return Ok(None);
        };
        let Some(token) = raw.strip_prefix(BEARER_PREFIX) else {
            return Ok(None);
        };
        let identity: DecodedIdentity<U> = decode_token(token)?;
        if identity.is_expired_at(now_ms) {
            tracing::info!(exp = ?identity.exp, "session token expired; clearing");
            self.session.remove();
            return Ok(None);
        }
        Ok(Some(identity.user))
    }
}
