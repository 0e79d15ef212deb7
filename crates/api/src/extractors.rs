//! Request extractors.

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::error::ApiError;

/// JSON body that has been deserialized and validated.
///
/// Malformed bodies and failed validations both answer 400 in the
/// standard error envelope.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| ApiError::validation(rejection.body_text()))?;
        value
            .validate()
            .map_err(|errors| ApiError::validation(describe(&errors)))?;
        Ok(Self(value))
    }
}

/// Flattens validation errors into one message, field by field.
fn describe(errors: &ValidationErrors) -> String {
    let mut fields: Vec<String> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let detail = errs
                .iter()
                .find_map(|e| e.message.as_ref().map(ToString::to_string))
                .unwrap_or_else(|| "is invalid".to_string());
            format!("{} {detail}", wire_name(&field))
        })
        .collect();
    fields.sort();
    fields.join(", ")
}

/// Field name as clients send it: `total_months` becomes `totalMonths`.
fn wire_name(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = !out.is_empty();
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Body {
        #[validate(range(min = 1, max = 10, message = "must be between 1 and 10"))]
        count: i32,
        #[validate(length(min = 1))]
        name: String,
    }

    #[test]
    fn test_describe_lists_every_field() {
        let body = Body {
            count: 0,
            name: String::new(),
        };
        let errors = body.validate().unwrap_err();
        assert_eq!(
            describe(&errors),
            "count must be between 1 and 10, name is invalid"
        );
    }

    #[derive(Debug, Deserialize, Validate)]
    #[serde(rename_all = "camelCase")]
    struct TermBody {
        #[validate(range(min = 1, message = "must be at least 1"))]
        total_months: i32,
        #[validate(length(min = 1, message = "is required"))]
        slip_url: String,
    }

    #[test]
    fn test_describe_uses_json_field_names() {
        let body: TermBody =
            serde_json::from_str(r#"{"totalMonths": 0, "slipUrl": ""}"#).unwrap();
        let errors = body.validate().unwrap_err();
        assert_eq!(
            describe(&errors),
            "slipUrl is required, totalMonths must be at least 1"
        );
    }

    #[test]
    fn test_wire_name() {
        assert_eq!(wire_name("total_months"), "totalMonths");
        assert_eq!(wire_name("amount"), "amount");
        assert_eq!(wire_name("loan_id"), "loanId");
    }
}
