//! Request guards and response envelopes for the mutating endpoints
//!
//! Sessions, permissions and anti-forgery tokens belong to the host. The host
//! verifies them and hands the outcome over in a [`RequestContext`]; this
//! module only decides whether that is enough for the requested action.

use reqwest::{Method, StatusCode};
use serde::Serialize;
use thiserror::Error;

/// Facts about the incoming request, as verified by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub method: Method,
    pub is_admin: bool,
    /// The anti-forgery token matched the session
    pub csrf_token_valid: bool,
    /// The referer points back at this site
    pub same_origin_referer: bool,
}

impl RequestContext {
    /// A POST from an administrator that passed every host check
    pub fn trusted_admin_post() -> Self {
        Self {
            method: Method::POST,
            is_admin: true,
            csrf_token_valid: true,
            same_origin_referer: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuardError {
    #[error("Invalid request token")]
    InvalidToken,

    #[error("Unauthorized")]
    NotAdmin,

    #[error("Method {0} not allowed")]
    MethodNotAllowed(Method),

    #[error("Request did not come from this site")]
    ForeignReferer,
}

impl GuardError {
    pub fn status(&self) -> StatusCode {
        match self {
            GuardError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            GuardError::InvalidToken | GuardError::NotAdmin | GuardError::ForeignReferer => {
                StatusCode::FORBIDDEN
            }
        }
    }
}

/// Checks for settings writes (sort order, preferences): valid token, then
/// administrator
pub fn guard_settings_update(ctx: &RequestContext) -> Result<(), GuardError> {
    if !ctx.csrf_token_valid {
        return Err(GuardError::InvalidToken);
    }
    if !ctx.is_admin {
        return Err(GuardError::NotAdmin);
    }
    Ok(())
}

/// Checks for activate/deactivate: POST, same-origin referer, valid token,
/// administrator
pub fn guard_lifecycle(ctx: &RequestContext) -> Result<(), GuardError> {
    if ctx.method != Method::POST {
        return Err(GuardError::MethodNotAllowed(ctx.method.clone()));
    }
    if !ctx.same_origin_referer {
        return Err(GuardError::ForeignReferer);
    }
    guard_settings_update(ctx)
}

/// JSON body returned by the sort-order and preferences endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Envelope {
    pub fn saved(sort_order: Vec<String>) -> Self {
        Self {
            success: true,
            sort_order: Some(sort_order),
            error: None,
        }
    }

    /// Success with nothing to report back
    pub fn done() -> Self {
        Self {
            success: true,
            sort_order: None,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            sort_order: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonResponse {
    pub status: StatusCode,
    pub body: Envelope,
}

impl JsonResponse {
    pub fn ok(body: Envelope) -> Self {
        Self {
            status: StatusCode::OK,
            body,
        }
    }

    pub fn error(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: Envelope::failed(message),
        }
    }
}

impl From<GuardError> for JsonResponse {
    fn from(e: GuardError) -> Self {
        JsonResponse::error(e.status(), e.to_string())
    }
}

/// Outcome of activate/deactivate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionResponse {
    /// Send the browser to this location
    Redirect(String),
    Rejected(JsonResponse),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn ctx(method: Method, admin: bool, token: bool, referer: bool) -> RequestContext {
        RequestContext {
            method,
            is_admin: admin,
            csrf_token_valid: token,
            same_origin_referer: referer,
        }
    }

    #[rstest]
    #[case(ctx(Method::POST, true, true, true), Ok(()))]
    #[case(ctx(Method::POST, true, false, true), Err(GuardError::InvalidToken))]
    #[case(ctx(Method::POST, false, true, true), Err(GuardError::NotAdmin))]
    #[case(ctx(Method::POST, false, false, true), Err(GuardError::InvalidToken))]
    #[case(ctx(Method::GET, true, true, false), Ok(()))] // method and referer not checked
    fn guard_settings_update_checks_token_then_admin(
        #[case] ctx: RequestContext,
        #[case] expected: Result<(), GuardError>,
    ) {
        assert_eq!(guard_settings_update(&ctx), expected);
    }

    #[rstest]
    #[case(ctx(Method::POST, true, true, true), Ok(()))]
    #[case(ctx(Method::GET, true, true, true), Err(GuardError::MethodNotAllowed(Method::GET)))]
    #[case(ctx(Method::POST, true, true, false), Err(GuardError::ForeignReferer))]
    #[case(ctx(Method::POST, true, false, true), Err(GuardError::InvalidToken))]
    #[case(ctx(Method::POST, false, true, true), Err(GuardError::NotAdmin))]
    fn guard_lifecycle_requires_post_referer_token_and_admin(
        #[case] ctx: RequestContext,
        #[case] expected: Result<(), GuardError>,
    ) {
        assert_eq!(guard_lifecycle(&ctx), expected);
    }

    #[test]
    fn guard_errors_map_to_status_codes() {
        assert_eq!(GuardError::NotAdmin.status(), StatusCode::FORBIDDEN);
        assert_eq!(GuardError::InvalidToken.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            GuardError::MethodNotAllowed(Method::GET).status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
    }

    #[test]
    fn envelope_serializes_success_and_failure_shapes() {
        assert_eq!(
            serde_json::to_value(Envelope::saved(vec!["a.php".to_string()])).unwrap(),
            json!({"success": true, "sortOrder": ["a.php"]})
        );
        assert_eq!(
            serde_json::to_value(Envelope::done()).unwrap(),
            json!({"success": true})
        );
        assert_eq!(
            serde_json::to_value(Envelope::failed("Unauthorized")).unwrap(),
            json!({"success": false, "error": "Unauthorized"})
        );
    }
}
