// Login flow: send the login request, then look for the table that carries
// the issued token.
//
// The server answers `{ "<Table>": [ { "jwt": "...", "reservedId": 7 } ] }`.
// Tables are scanned in the order they appear in the response and the first
// one whose first record has a non-blank string `jwt` wins.

use serde_json::Value;

use crate::api::ApiClient;
use crate::error::CliError;

pub const CREDENTIAL_FIELD: &str = "jwt";
pub const IDENTIFIER_FIELD: &str = "reservedId";

/// Result of scanning a login response.
#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    LoggedIn {
        table: String,
        credential: String,
        identifier: Value,
    },
    TableNotFound {
        raw: Value,
    },
}

/// What a successful login reports back to the prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginSuccess {
    pub table: String,
    pub identifier: Value,
}

/// Find the login table in `response`.
pub fn scan(response: &Value) -> LoginOutcome {
    let found = response.as_object().and_then(|tables| {
        tables.iter().find_map(|(table, rows)| {
            let first = rows.as_array()?.first()?;
            let credential = first
                .get(CREDENTIAL_FIELD)?
                .as_str()
                .filter(|s| !s.trim().is_empty())?;
            let identifier = first.get(IDENTIFIER_FIELD).cloned().unwrap_or(Value::Null);
            Some((table.clone(), credential.to_string(), identifier))
        })
    });
    match found {
        Some((table, credential, identifier)) => LoginOutcome::LoggedIn {
            table,
            credential,
            identifier,
        },
        None => LoginOutcome::TableNotFound {
            raw: response.clone(),
        },
    }
}

/// Post `body`, and adopt the issued credential if the response has one.
///
/// When no table carries a credential the session is left untouched and a
/// [`CliError::CredentialNotFound`] with the raw response is returned.
pub fn login(api: &mut ApiClient, body: &Value) -> Result<LoginSuccess, CliError> {
    let response = api.post(body)?;
    adopt(api, &response)
}

/// Apply an already received login response to the client's session.
pub fn adopt(api: &mut ApiClient, response: &Value) -> Result<LoginSuccess, CliError> {
    match scan(response) {
        LoginOutcome::LoggedIn {
            table,
            credential,
            identifier,
        } => {
            api.session_mut().set(&credential)?;
            log::debug!("logged in through table {}", table);
            Ok(LoginSuccess { table, identifier })
        }
        LoginOutcome::TableNotFound { raw } => Err(CliError::CredentialNotFound {
            raw: serde_json::to_string_pretty(&raw).unwrap_or_else(|_| raw.to_string()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client() -> ApiClient {
        ApiClient::with_endpoint("http://127.0.0.1:1/").unwrap()
    }

    #[test]
    fn finds_token_in_first_record() {
        let outcome = scan(&json!({"User": [{"jwt": "T", "reservedId": 7}]}));
        assert_eq!(
            outcome,
            LoginOutcome::LoggedIn {
                table: "User".into(),
                credential: "T".into(),
                identifier: json!(7),
            }
        );
    }

    #[test]
    fn first_matching_table_in_response_order_wins() {
        let outcome = scan(&json!({
            "Log": [],
            "Admin": [{"jwt": "A", "reservedId": 1}],
            "User": [{"jwt": "U", "reservedId": 2}],
        }));
        match outcome {
            LoginOutcome::LoggedIn { table, credential, .. } => {
                assert_eq!(table, "Admin");
                assert_eq!(credential, "A");
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn only_the_first_record_is_inspected() {
        let outcome = scan(&json!({"User": [{"reservedId": 1}, {"jwt": "late"}]}));
        assert!(matches!(outcome, LoginOutcome::TableNotFound { .. }));
    }

    #[test]
    fn single_record_shape_is_not_accepted() {
        let outcome = scan(&json!({"User": {"jwt": "T", "reservedId": 7}}));
        assert!(matches!(outcome, LoginOutcome::TableNotFound { .. }));
    }

    #[test]
    fn blank_token_is_not_a_match() {
        let outcome = scan(&json!({
            "Session": [{"jwt": "  ", "reservedId": 1}],
            "User": [{"jwt": "T", "reservedId": 2}],
        }));
        match outcome {
            LoginOutcome::LoggedIn { table, credential, .. } => {
                assert_eq!(table, "User");
                assert_eq!(credential, "T");
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn blank_token_reports_credential_not_found() {
        let mut api = client();
        let err = adopt(&mut api, &json!({"User": [{"jwt": "", "reservedId": 7}]})).unwrap_err();
        assert!(matches!(err, CliError::CredentialNotFound { .. }));
        assert!(!api.session().is_set());
    }

    #[test]
    fn missing_identifier_is_null() {
        match scan(&json!({"User": [{"jwt": "T"}]})) {
            LoginOutcome::LoggedIn { identifier, .. } => assert_eq!(identifier, Value::Null),
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn adopt_sets_session_and_reports_identifier() {
        let mut api = client();
        let success = adopt(&mut api, &json!({"User": [{"jwt": "T", "reservedId": 7}]})).unwrap();
        assert_eq!(success.identifier, json!(7));
        assert_eq!(api.session().credential(), Some("T"));
    }

    #[test]
    fn adopt_without_table_leaves_session_unchanged() {
        let mut api = client();
        api.session_mut().set("previous").unwrap();
        let err = adopt(&mut api, &json!({"User": [{"name": "bob"}]})).unwrap_err();
        match err {
            CliError::CredentialNotFound { raw } => assert!(raw.contains("bob")),
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(api.session().credential(), Some("previous"));
    }

    #[test]
    fn non_object_response_is_not_found() {
        assert!(matches!(scan(&json!("ok")), LoginOutcome::TableNotFound { .. }));
    }
}
