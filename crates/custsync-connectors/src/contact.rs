use log::debug;
use serde::Deserialize;
use serde_json::Value;

use custsync_core::error::{ContactError, SyncResult};
use custsync_core::types::{Customer, CustomerProperties, CustomerSyncPayload};

use crate::zoho::CrmClient;

/// One `{val, content}` entry of a contact record's field list
#[derive(Debug, Deserialize, Clone)]
pub struct ContactField {
    pub val: String,
    pub content: String,
}

/// Extract the `response.result.Contacts.row.FL` field list from a raw CRM
/// search response.
///
/// The CRM reports zero matches as a `response.nodata` object, which maps to
/// [`ContactError::NotFound`]. Exactly one contact row is required; a row
/// array or any other shape maps to [`ContactError::MalformedResponse`].
pub fn parse_contact_fields(body: &str) -> Result<Vec<ContactField>, ContactError> {
    let root: Value = serde_json::from_str(body)
        .map_err(|e| ContactError::MalformedResponse(format!("invalid JSON: {}", e)))?;

    let response = root
        .get("response")
        .ok_or_else(|| ContactError::MalformedResponse("missing 'response' object".to_string()))?;

    if let Some(nodata) = response.get("nodata") {
        let message = nodata
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("no matching contact");
        return Err(ContactError::NotFound(message.to_string()));
    }

    let row = response.pointer("/result/Contacts/row").ok_or_else(|| {
        ContactError::MalformedResponse("missing 'result.Contacts.row'".to_string())
    })?;

    if let Some(rows) = row.as_array() {
        return Err(ContactError::MalformedResponse(format!(
            "expected exactly one contact row, got {}",
            rows.len()
        )));
    }

    let field_list = row
        .get("FL")
        .ok_or_else(|| ContactError::MalformedResponse("missing 'FL' field list".to_string()))?;

    serde_json::from_value(field_list.clone())
        .map_err(|e| ContactError::MalformedResponse(format!("unexpected field list: {}", e)))
}

/// Content of the LAST entry matching `name`.
///
/// The whole list is scanned rather than stopping at the first match, so a
/// later duplicate shadows an earlier one.
fn field_content<'a>(fields: &'a [ContactField], name: &str) -> Option<&'a str> {
    fields
        .iter()
        .filter(|field| field.val == name)
        .last()
        .map(|field| field.content.as_str())
}

/// Assemble a customer from a parsed field list.
///
/// All six fields must be present; any absence is a
/// [`ContactError::PartialContact`] naming the missing fields, never a
/// half-filled customer.
pub fn build_customer(fields: &[ContactField]) -> Result<Customer, ContactError> {
    let mut missing = Vec::new();
    let mut required = |name: &str| match field_content(fields, name) {
        Some(content) => content.to_string(),
        None => {
            missing.push(name.to_string());
            String::new()
        }
    };

    let id = required("CONTACTID");
    let email = required("Email");
    let first_name = required("First Name");
    let last_name = required("Last Name");
    let salutation = required("Salutation");
    let title = required("Title");

    if !missing.is_empty() {
        return Err(ContactError::PartialContact { id, missing });
    }

    Ok(Customer {
        id,
        idfa: None,
        first_name,
        last_name,
        email,
        properties: CustomerProperties { salutation, title },
    })
}

/// Look a contact up and build the single-customer sync payload for it.
///
/// The search value is treated as a contact id first; when the CRM reports no
/// match it is retried as an email address. Only after both searches miss is
/// the not-found error returned.
pub async fn build_contact(crm: &CrmClient, id: &str) -> SyncResult<CustomerSyncPayload> {
    let body = crm.fetch_by_id(id).await?;

    let fields = match parse_contact_fields(&body) {
        Ok(fields) => fields,
        Err(ContactError::NotFound(_)) => {
            debug!("no contact for id {}, retrying as email", id);
            let body = crm.search_by_email(id).await?;
            parse_contact_fields(&body)?
        }
        Err(e) => return Err(e.into()),
    };

    let customer = build_customer(&fields)?;
    Ok(CustomerSyncPayload {
        customers: vec![customer],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact_body() -> String {
        r#"{
            "response": {
                "uri": "/crm/private/json/Contacts/getSearchRecordsByPDC",
                "result": {
                    "Contacts": {
                        "row": {
                            "no": "1",
                            "FL": [
                                {"val": "CONTACTID", "content": "123"},
                                {"val": "Email", "content": "a@b.com"},
                                {"val": "First Name", "content": "Jane"},
                                {"val": "Last Name", "content": "Doe"},
                                {"val": "Salutation", "content": "Ms"},
                                {"val": "Title", "content": "CEO"}
                            ]
                        }
                    }
                }
            }
        }"#
        .to_string()
    }

    #[test]
    fn test_build_customer_from_well_formed_record() {
        let fields = parse_contact_fields(&contact_body()).unwrap();
        let customer = build_customer(&fields).unwrap();

        assert_eq!(customer.id, "123");
        assert_eq!(customer.idfa, None);
        assert_eq!(customer.first_name, "Jane");
        assert_eq!(customer.last_name, "Doe");
        assert_eq!(customer.email, "a@b.com");
        assert_eq!(customer.properties.salutation, "Ms");
        assert_eq!(customer.properties.title, "CEO");
    }

    #[test]
    fn test_nodata_maps_to_not_found() {
        let body = r#"{
            "response": {
                "nodata": {"code": "4422", "message": "There is no data to show"}
            }
        }"#;

        match parse_contact_fields(body) {
            Err(ContactError::NotFound(message)) => {
                assert_eq!(message, "There is no data to show")
            }
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_multiple_rows_are_malformed() {
        let body = r#"{
            "response": {
                "result": {
                    "Contacts": {
                        "row": [
                            {"no": "1", "FL": []},
                            {"no": "2", "FL": []}
                        ]
                    }
                }
            }
        }"#;

        match parse_contact_fields(body) {
            Err(ContactError::MalformedResponse(message)) => {
                assert!(message.contains("exactly one contact row"))
            }
            other => panic!("expected MalformedResponse, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        assert!(matches!(
            parse_contact_fields("<html>login required</html>"),
            Err(ContactError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_last_matching_field_wins() {
        let fields = vec![
            ContactField {
                val: "Title".to_string(),
                content: "Intern".to_string(),
            },
            ContactField {
                val: "Title".to_string(),
                content: "CEO".to_string(),
            },
        ];

        assert_eq!(field_content(&fields, "Title"), Some("CEO"));
    }

    #[test]
    fn test_missing_fields_are_reported_together() {
        let fields = vec![
            ContactField {
                val: "CONTACTID".to_string(),
                content: "123".to_string(),
            },
            ContactField {
                val: "Email".to_string(),
                content: "a@b.com".to_string(),
            },
            ContactField {
                val: "First Name".to_string(),
                content: "Jane".to_string(),
            },
            ContactField {
                val: "Last Name".to_string(),
                content: "Doe".to_string(),
            },
        ];

        match build_customer(&fields) {
            Err(ContactError::PartialContact { id, missing }) => {
                assert_eq!(id, "123");
                assert_eq!(missing, vec!["Salutation", "Title"]);
            }
            other => panic!("expected PartialContact, got {:?}", other),
        }
    }
}
