//! Bearer-token authorization for the bridge API.
//!
//! Every API request must carry `Authorization: Bearer <token>`, where the
//! token is either the standing API token (honored while API access is
//! enabled) or the single-use provisioning token handed out during setup.
//! Some proxy and FCGI setups strip or rename the standard header, so the
//! credential is looked for in an ordered list of header sources and the
//! first non-empty value wins.
//!
//! Handlers opt in through the [`RequireApiAuth`] extractor; a rejection is
//! the JSON error response the support platform expects.

use std::sync::LazyLock;

use axum::{
    Json,
    extract::FromRequestParts,
    http::{HeaderMap, StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use regex::Regex;

use crate::config::ApiAccess;
use crate::error::ErrorBody;
use crate::state::AppState;

/// Header names checked for the credential, in priority order.
///
/// The standard header comes first; the rest cover transports that rename
/// it before the request reaches the service.
const CREDENTIAL_SOURCES: &[&str] = &[
    "authorization",
    "x-authorization",
    "http-authorization",
    "redirect-http-authorization",
];

/// Bearer tokens are lowercase alphanumeric as issued by the platform.
static BEARER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Bearer ([a-z0-9]+)").expect("bearer pattern is valid"));

/// How a request was authorized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthGrant {
    /// The single-use provisioning token matched (and was invalidated).
    Provision,
    /// The standing API token matched while API access was enabled.
    Api,
}

/// Authorization failures, each mapping to a fixed status and message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No header source yielded a credential at all.
    #[error("Unable to extract authorization header from request")]
    MissingCredential,
    /// API access is disabled and no provisioning token was presented.
    #[error("API access disabled")]
    ApiDisabled,
    /// API access is enabled but no bearer token could be parsed.
    #[error("No authorisation token provided")]
    NoToken,
    /// API access is enabled but the token does not match the API token.
    #[error("Not authorised")]
    NotAuthorized,
}

impl AuthError {
    /// The HTTP status for this failure.
    #[must_use]
    pub const fn status(self) -> StatusCode {
        match self {
            Self::MissingCredential | Self::ApiDisabled => StatusCode::FORBIDDEN,
            Self::NoToken | Self::NotAuthorized => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (self.status(), Json(ErrorBody::new(self.to_string()))).into_response()
    }
}

/// Check a request's headers against the authorization settings.
///
/// Order matters: a provisioning-token match overrides the enabled flag
/// (it is checked first and consumed on success), then the enabled flag is
/// enforced, then the token's presence, then its value.
///
/// # Errors
///
/// Returns the [`AuthError`] describing why the request was refused. Every
/// failure path logs the reason under the `zendesk` target before
/// returning.
pub fn authorize(headers: &HeaderMap, access: &ApiAccess) -> Result<AuthGrant, AuthError> {
    let Some(raw) = extract_credential(headers) else {
        tracing::warn!(target: "zendesk", "unable to extract authorization header from request");
        return Err(AuthError::MissingCredential);
    };

    // Transports that re-inject the header tend to backslash-escape it.
    let credential = strip_slashes(raw);
    let token = parse_bearer(&credential);

    // Provisioning tokens are always accepted, which lets the setup flow
    // call the API before access is switched on. A match invalidates the
    // stored token.
    if let Some(token) = token
        && access.consume_provision_token(token)
    {
        tracing::info!(target: "zendesk", "provisioning token accepted and invalidated");
        return Ok(AuthGrant::Provision);
    }

    if !access.enabled() {
        tracing::warn!(target: "zendesk", "API access disabled");
        return Err(AuthError::ApiDisabled);
    }

    let Some(token) = token else {
        tracing::warn!(target: "zendesk", "no authorisation token provided");
        return Err(AuthError::NoToken);
    };

    if !access.api_token_matches(token) {
        tracing::warn!(target: "zendesk", "not authorised");
        return Err(AuthError::NotAuthorized);
    }

    Ok(AuthGrant::Api)
}

/// Pull the credential string from the first header source that has one.
fn extract_credential(headers: &HeaderMap) -> Option<&str> {
    CREDENTIAL_SOURCES
        .iter()
        .filter_map(|name| headers.get(*name))
        .filter_map(|value| value.to_str().ok())
        .find(|value| !value.is_empty())
}

/// Remove backslash-escaping, keeping the escaped characters themselves.
fn strip_slashes(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Parse the token out of `Bearer <token>`.
///
/// A non-matching credential yields `None` rather than an error; whether
/// that is fatal depends on the provisioning/enabled checks above.
fn parse_bearer(credential: &str) -> Option<&str> {
    BEARER_RE
        .captures(credential)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Extractor that requires a valid bearer token.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(RequireApiAuth(grant): RequireApiAuth) -> impl IntoResponse {
///     // only reached when the request was authorized
/// }
/// ```
pub struct RequireApiAuth(pub AuthGrant);

impl FromRequestParts<AppState> for RequireApiAuth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let grant = authorize(&parts.headers, state.api_access())?;
        Ok(Self(grant))
    }
}
