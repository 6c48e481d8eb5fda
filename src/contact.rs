use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Wire representation of a contact.
///
/// `name` is always emitted, even when empty; `id` and `phone` are dropped
/// from the output when absent/empty. Unknown or missing body fields
/// deserialize to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub phone: String,
}

/// Stored representation of a contact.
///
/// Unlike the wire form, an empty `name` is omitted from the document
/// entirely, and the identifier lives under `_id` as a native ObjectId.
/// `_id` is left out on insert so the store assigns it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactDocument {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub phone: String,
}

impl From<ContactDocument> for Contact {
    fn from(doc: ContactDocument) -> Self {
        Self {
            id: doc.id.map(|id| id.to_hex()),
            name: doc.name,
            phone: doc.phone,
        }
    }
}

impl From<Contact> for ContactDocument {
    fn from(contact: Contact) -> Self {
        Self {
            // Identifiers are assigned by the store; a client-supplied id
            // is ignored.
            id: None,
            name: contact.name,
            phone: contact.phone,
        }
    }
}

/// Response body for a successful insert.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOutcome {
    pub inserted_id: String,
}

/// Response body for an update, mirroring the driver's result counts.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOutcome {
    pub matched_count: u64,
    pub modified_count: u64,
}

/// Response body for a delete.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOutcome {
    pub deleted_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{doc, to_document};
    use serde_json::json;

    #[test]
    fn wire_json_always_carries_name() {
        let contact = Contact::default();
        let value = serde_json::to_value(&contact).unwrap();
        assert_eq!(value, json!({ "name": "" }));
    }

    #[test]
    fn wire_json_omits_empty_phone_and_missing_id() {
        let contact = Contact {
            id: None,
            name: "Alice".to_string(),
            phone: String::new(),
        };
        let value = serde_json::to_value(&contact).unwrap();
        assert_eq!(value, json!({ "name": "Alice" }));
    }

    #[test]
    fn wire_json_renders_id_as_hex() {
        let id = ObjectId::new();
        let contact = Contact {
            id: Some(id.to_hex()),
            name: "Alice".to_string(),
            phone: "123".to_string(),
        };
        let value = serde_json::to_value(&contact).unwrap();
        assert_eq!(
            value,
            json!({ "id": id.to_hex(), "name": "Alice", "phone": "123" })
        );
    }

    #[test]
    fn wire_json_missing_fields_default() {
        let contact: Contact = serde_json::from_value(json!({})).unwrap();
        assert_eq!(contact, Contact::default());

        let contact: Contact = serde_json::from_value(json!({ "phone": "456" })).unwrap();
        assert_eq!(contact.name, "");
        assert_eq!(contact.phone, "456");
    }

    #[test]
    fn document_omits_empty_name() {
        let document = ContactDocument {
            id: None,
            name: String::new(),
            phone: "123".to_string(),
        };
        let bson = to_document(&document).unwrap();
        assert_eq!(bson, doc! { "phone": "123" });
    }

    #[test]
    fn document_stores_id_under_underscore_id() {
        let id = ObjectId::new();
        let document = ContactDocument {
            id: Some(id),
            name: "Alice".to_string(),
            phone: String::new(),
        };
        let bson = to_document(&document).unwrap();
        assert_eq!(bson, doc! { "_id": id, "name": "Alice" });
    }

    #[test]
    fn document_to_wire_renders_hex_id() {
        let id = ObjectId::new();
        let document = ContactDocument {
            id: Some(id),
            name: "Alice".to_string(),
            phone: "123".to_string(),
        };
        let contact = Contact::from(document);
        assert_eq!(contact.id.as_deref(), Some(id.to_hex().as_str()));
        assert_eq!(contact.name, "Alice");
        assert_eq!(contact.phone, "123");
    }

    #[test]
    fn wire_to_document_drops_supplied_id() {
        let contact = Contact {
            id: Some(ObjectId::new().to_hex()),
            name: "Alice".to_string(),
            phone: "123".to_string(),
        };
        let document = ContactDocument::from(contact);
        assert_eq!(document.id, None);
        assert_eq!(document.name, "Alice");
    }

    #[test]
    fn outcomes_serialize_camel_case() {
        let update = UpdateOutcome {
            matched_count: 1,
            modified_count: 0,
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({ "matchedCount": 1, "modifiedCount": 0 })
        );

        let delete = DeleteOutcome { deleted_count: 1 };
        assert_eq!(
            serde_json::to_value(&delete).unwrap(),
            json!({ "deletedCount": 1 })
        );
    }
}
