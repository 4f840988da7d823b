//! Customer order report endpoint.
//!
//! The support platform sends the email address as the *key* of the single
//! request parameter (the value is unused), either in the query string or
//! in an urlencoded form body. Any other parameter shape is a 400.

use std::collections::HashMap;

use axum::{
    Form, Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};

use zendesk_bridge_core::Email;

use crate::error::{AppError, Result};
use crate::middleware::RequireApiAuth;
use crate::services::ReportService;
use crate::state::AppState;

/// GET /v1/customer-orders
///
/// # Errors
///
/// Returns `AppError::BadRequest` for a malformed parameter set and
/// `AppError::Database` when the store read model is unreachable.
pub async fn report_get(
    State(state): State<AppState>,
    RequireApiAuth(_grant): RequireApiAuth,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response> {
    report_response(&state, &params).await
}

/// POST /v1/customer-orders
///
/// # Errors
///
/// Returns `AppError::BadRequest` for a malformed parameter set and
/// `AppError::Database` when the store read model is unreachable.
pub async fn report_post(
    State(state): State<AppState>,
    RequireApiAuth(_grant): RequireApiAuth,
    Form(params): Form<HashMap<String, String>>,
) -> Result<Response> {
    report_response(&state, &params).await
}

async fn report_response(
    state: &AppState,
    params: &HashMap<String, String>,
) -> Result<Response> {
    let email = single_email_param(params)?;

    let config = state.config();
    let report = ReportService::new(state.pool(), config.currency, config.order_limit)
        .customer_report(&email)
        .await?;

    Ok(Json(report).into_response())
}

/// Extract the email from a parameter set that must contain exactly one
/// entry, keyed by the address.
fn single_email_param(params: &HashMap<String, String>) -> Result<Email> {
    if params.len() != 1 {
        return Err(AppError::BadRequest(
            "expected exactly one parameter keyed by the customer email".to_owned(),
        ));
    }

    let raw = params.keys().next().map(String::as_str).unwrap_or_default();
    Email::parse(raw).map_err(|e| AppError::BadRequest(format!("invalid email address: {e}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn params(keys: &[&str]) -> HashMap<String, String> {
        keys.iter()
            .map(|k| ((*k).to_owned(), String::new()))
            .collect()
    }

    #[test]
    fn test_single_email_param_ok() {
        let email = single_email_param(&params(&["jane@example.com"])).unwrap();
        assert_eq!(email.as_str(), "jane@example.com");
    }

    #[test]
    fn test_no_params_rejected() {
        assert!(matches!(
            single_email_param(&params(&[])),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_multiple_params_rejected() {
        assert!(matches!(
            single_email_param(&params(&["jane@example.com", "extra"])),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_malformed_email_key_rejected() {
        assert!(matches!(
            single_email_param(&params(&["not-an-email"])),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_parameter_value_is_ignored() {
        let mut map = HashMap::new();
        map.insert("jane@example.com".to_owned(), "whatever".to_owned());
        assert!(single_email_param(&map).is_ok());
    }
}
