//! Result shapes returned by form actions

use axum::Json;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

/// Per-field validation messages for the invoice form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldErrors {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Vec<String>>,
}

impl FieldErrors {
    /// Record a message for a form field, keyed by its form name
    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        let slot = match field {
            "customerId" => &mut self.customer_id,
            "amount" => &mut self.amount,
            "status" => &mut self.status,
            _ => return,
        };
        slot.get_or_insert_with(Vec::new).push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.customer_id.is_none() && self.amount.is_none() && self.status.is_none()
    }
}

/// State handed back to the form after an action that did not redirect
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

impl FormState {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            errors: None,
        }
    }

    pub fn invalid(errors: FieldErrors, message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            errors: Some(errors),
        }
    }
}

/// What a form action produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Leave the form and navigate to `location`
    Redirect { location: String },
    /// Stay on the form and render this state
    State(FormState),
}

impl ActionOutcome {
    pub fn redirect(location: impl Into<String>) -> Self {
        ActionOutcome::Redirect {
            location: location.into(),
        }
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, ActionOutcome::Redirect { .. })
    }

    pub fn state(&self) -> Option<&FormState> {
        match self {
            ActionOutcome::State(state) => Some(state),
            ActionOutcome::Redirect { .. } => None,
        }
    }
}

impl IntoResponse for ActionOutcome {
    fn into_response(self) -> Response {
        match self {
            ActionOutcome::Redirect { location } => match HeaderValue::try_from(location) {
                Ok(value) => (StatusCode::SEE_OTHER, [(header::LOCATION, value)]).into_response(),
                Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
            },
            ActionOutcome::State(state) => (StatusCode::OK, Json(state)).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_state_serializes_camel_case_and_omits_empty() {
        let mut errors = FieldErrors::default();
        errors.push("customerId", "Please select a customer.");
        let state = FormState::invalid(errors, "Missing Fields. Failed to Create Invoice.");

        assert_eq!(
            serde_json::to_value(&state).unwrap(),
            json!({
                "message": "Missing Fields. Failed to Create Invoice.",
                "errors": { "customerId": ["Please select a customer."] }
            })
        );
    }

    #[test]
    fn test_push_ignores_unknown_fields() {
        let mut errors = FieldErrors::default();
        errors.push("date", "ignored");
        assert!(errors.is_empty());
    }

    #[test]
    fn test_redirect_response_is_see_other() {
        let response = ActionOutcome::redirect("/dashboard/invoices").into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/dashboard/invoices"
        );
    }
}
