//! Remote student records.

use serde::{Deserialize, Deserializer, Serialize};

/// A student as listed by the remote collection.
///
/// Every field is optional on the wire. Keys the remote adds later are
/// ignored, so older clients keep decoding newer payloads.
///
/// # Wire format
///
/// ```json
/// {
///   "name": "John",
///   "email": "john@example.com",
///   "age": 20,
///   "gender": "Male",
///   "phone_number": "1234567890",
///   "address": "Address 1",
///   "subjects": [{ "name": "Math", "credits": 3, "description": "Mathematics" }]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    /// Full name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Contact email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Age in years.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    /// Gender as reported by the remote.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    /// Phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    /// Postal address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Enrolled subjects, in remote order.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub subjects: Vec<SubjectRecord>,
}

impl StudentRecord {
    /// Creates a record with the fields the store requires.
    pub fn new(name: impl Into<String>, email: impl Into<String>, age: u32) -> Self {
        Self {
            name: Some(name.into()),
            email: Some(email.into()),
            age: Some(age),
            ..Self::default()
        }
    }

    /// Sets the gender.
    pub fn with_gender(mut self, gender: impl Into<String>) -> Self {
        self.gender = Some(gender.into());
        self
    }

    /// Sets the phone number.
    pub fn with_phone_number(mut self, phone_number: impl Into<String>) -> Self {
        self.phone_number = Some(phone_number.into());
        self
    }

    /// Sets the address.
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Appends a subject.
    pub fn with_subject(mut self, subject: SubjectRecord) -> Self {
        self.subjects.push(subject);
        self
    }
}

/// A subject nested inside a [`StudentRecord`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectRecord {
    /// Subject name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Credit count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credits: Option<u32>,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SubjectRecord {
    /// Creates a subject with a name and credit count.
    pub fn new(name: impl Into<String>, credits: u32) -> Self {
        Self {
            name: Some(name.into()),
            credits: Some(credits),
            description: None,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// `"subjects": null` decodes the same as a missing key.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<SubjectRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<SubjectRecord>>::deserialize(deserializer)?.unwrap_or_default())
}
