//! Pure message rendering for taxonomy errors.
//!
//! `render` never fails: a missing placeholder value is left as written, which
//! is why [`crate::HubError::new`] validates required parameters first.

use crate::{ErrorKind, Params, Template};

/// Render the message for `kind` from `params`.
pub fn render(kind: ErrorKind, params: &Params) -> String {
    let spec = kind.spec();
    if spec.overridable {
        if let Some(message) = params.get("message") {
            return message.to_string();
        }
    }
    match spec.template {
        Template::Fixed(text) => text.to_string(),
        Template::Detailed(text) => match params.get("detail") {
            Some(detail) if !detail.is_empty() => format!("{text}: {detail}"),
            _ => text.to_string(),
        },
        Template::Interpolated(text) => interpolate(text, |name| params.get(name)),
        Template::ResponseMessage {
            extracted,
            fallback,
            raw_fallback,
        } => {
            let raw = params.get("response").unwrap_or_default();
            match response_message(raw) {
                Some(message) => interpolate(extracted, |name| {
                    (name == "message").then_some(message.as_str())
                }),
                None => match raw_fallback {
                    Some(template) if !raw.trim().is_empty() => {
                        interpolate(template, |name| (name == "raw").then_some(raw))
                    }
                    _ => fallback.to_string(),
                },
            }
        }
        Template::Reason { choices, otherwise } => {
            let reason = params.get("reason").unwrap_or_default();
            choices
                .iter()
                .find(|(key, _)| *key == reason)
                .map(|(_, text)| *text)
                .unwrap_or(otherwise)
                .to_string()
        }
    }
}

/// Extract a string `message` field from a JSON response body.
///
/// Returns `None` for empty or malformed bodies, non-object payloads, a missing
/// field, or a field that is not a string.
pub fn response_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .and_then(serde_json::Value::as_str)
        .map(str::to_string)
}

/// Single pass over `template`; substituted values are never re-scanned.
fn interpolate<'a>(template: &str, lookup: impl Fn(&str) -> Option<&'a str>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) if is_placeholder_name(&after[..close]) => {
                let name = &after[..close];
                match lookup(name) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push('{');
                        out.push_str(name);
                        out.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            _ => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn is_placeholder_name(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Names of `{placeholder}` tokens left in a template-shaped string.
pub fn unresolved_placeholders(text: &str) -> Vec<&str> {
    let mut found = Vec::new();
    let mut rest = text;
    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) if is_placeholder_name(&after[..close]) => {
                found.push(&after[..close]);
                rest = &after[close + 1..];
            }
            _ => rest = after,
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolates_every_occurrence() {
        let params = Params::new().with("module", "zarr");
        let msg = render(ErrorKind::ModuleNotInstalled, &params);
        assert_eq!(
            msg,
            "Module 'zarr' should be installed to convert the Dataset to the zarr format"
        );
    }

    #[test]
    fn substituted_values_are_not_rescanned() {
        let params = Params::new().with("tag", "{tag}");
        let msg = render(ErrorKind::DatasetNotFound, &params);
        assert_eq!(msg, "The dataset with tag {tag} was not found");
    }

    #[test]
    fn detail_is_appended_only_when_present() {
        assert_eq!(
            render(ErrorKind::Alignment, &Params::new()),
            "Arrays are not aligned"
        );
        assert_eq!(
            render(ErrorKind::Alignment, &Params::new().with("detail", "axis 0")),
            "Arrays are not aligned: axis 0"
        );
    }

    #[test]
    fn overridable_kinds_accept_a_message() {
        let params = Params::new().with("message", "token expired");
        assert_eq!(render(ErrorKind::Authentication, &params), "token expired");
        // non-overridable kinds ignore it
        assert_eq!(
            render(ErrorKind::ShapeLength, &params),
            "Parameter 'shape' should be a tuple of length 1"
        );
    }

    #[test]
    fn authorization_reads_message_field() {
        let params = Params::new().with("response", r#"{"message": "token revoked"}"#);
        assert_eq!(render(ErrorKind::Authorization, &params), "token revoked");
    }

    #[test]
    fn authorization_falls_back_on_bad_payloads() {
        for body in ["", "not json", "[1, 2]", r#"{"error": "x"}"#, r#"{"message": 42}"#] {
            let params = Params::new().with("response", body);
            assert_eq!(
                render(ErrorKind::Authorization, &params),
                "You are not authorized to access this resource.",
                "body: {body:?}"
            );
        }
    }

    #[test]
    fn bad_request_variants() {
        let json = Params::new().with("response", r#"{"message": "name is required"}"#);
        assert_eq!(
            render(ErrorKind::BadRequest, &json),
            "One or more request parameters is incorrect\nname is required"
        );

        let raw = Params::new().with("response", "<html>oops</html>");
        assert_eq!(
            render(ErrorKind::BadRequest, &raw),
            "One or more request parameters is incorrect, <html>oops</html>"
        );

        let empty = Params::new().with("response", "  ");
        assert_eq!(
            render(ErrorKind::BadRequest, &empty),
            "One or more request parameters is incorrect"
        );
    }

    #[test]
    fn dynamic_shape_reason_selects_message() {
        let cases = [
            ("none", "Parameter 'max_shape' shouldn't contain any 'None' value"),
            ("length", "Lengths of 'shape' and 'max_shape' should be equal"),
            (
                "not_equal",
                "All not-None values from 'shape' should be equal to the corresponding values in 'max_shape'",
            ),
            ("other", "Wrong 'shape' or 'max_shape' values"),
        ];
        for (reason, expected) in cases {
            let params = Params::new().with("reason", reason);
            assert_eq!(render(ErrorKind::DynamicTensorShape, &params), expected);
        }
    }

    #[test]
    fn unresolved_placeholder_scan() {
        assert_eq!(unresolved_placeholders("a {b} c {d_1}"), vec!["b", "d_1"]);
        assert!(unresolved_placeholders("json {\"k\": 1} and { }").is_empty());
    }
}
