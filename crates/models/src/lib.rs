//! Shared data model for shelfsync
//!
//! This crate provides the wire-format types used by both the client SDK
//! and the state server: the book catalog, the collection-needs wishlist,
//! donation requests, and the page-state document wrapper.
//!
//! All types serialize to camelCase JSON, matching the layout the
//! original application persisted (`publishYear`, `lastModifiedBy`, …).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generate a collision-resistant item id.
///
/// Ids are opaque strings on the wire; existing data with other id
/// schemes stays readable.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// The acting user stamped onto writes.
///
/// Pure attribution: nothing verifies it against any identity system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub name: String,
    pub email: String,
}

impl UserInfo {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// The full persisted value for one page identifier, wrapped with write
/// metadata. Every save overwrites the whole document; there are no
/// partial updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateDocument<T> {
    pub state: T,
    pub last_modified_by: UserInfo,
    pub last_modified_at: DateTime<Utc>,
}

impl<T> StateDocument<T> {
    /// Wrap `state` with attribution, stamped with the current UTC time.
    pub fn new(state: T, user: UserInfo) -> Self {
        Self {
            state,
            last_modified_by: user,
            last_modified_at: Utc::now(),
        }
    }
}

/// Request body for `POST /api/state/:page`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveStateRequest {
    pub state: serde_json::Value,
    pub user: UserInfo,
}

/// Acknowledgement body for a successful state save.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveStateResponse {
    pub success: bool,
}

impl SaveStateResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// Error body returned by the server on any failed request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: String,
    pub title: String,
    pub authors: Vec<String>,
    pub publisher: String,
    pub publish_year: i32,
    pub quantity: u32,
    /// Cover image as a data URI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields accepted when creating a book; id and creation time are
/// assigned server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookDraft {
    pub title: String,
    pub authors: Vec<String>,
    pub publisher: String,
    pub publish_year: i32,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
}

/// Partial update for a book. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authors: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
}

impl Book {
    /// Materialize a draft into a stored book with a fresh id.
    pub fn from_draft(draft: BookDraft) -> Self {
        Self {
            id: new_id(),
            title: draft.title,
            authors: draft.authors,
            publisher: draft.publisher,
            publish_year: draft.publish_year,
            quantity: draft.quantity,
            cover_image: draft.cover_image,
            created_at: Utc::now(),
        }
    }

    /// Merge a patch into this book, field by field.
    pub fn apply(&mut self, patch: BookPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(authors) = patch.authors {
            self.authors = authors;
        }
        if let Some(publisher) = patch.publisher {
            self.publisher = publisher;
        }
        if let Some(publish_year) = patch.publish_year {
            self.publish_year = publish_year;
        }
        if let Some(quantity) = patch.quantity {
            self.quantity = quantity;
        }
        if let Some(cover_image) = patch.cover_image {
            self.cover_image = Some(cover_image);
        }
    }
}

/// Urgency of a collection need.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// A wishlist entry: a title the collection is missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionNeed {
    pub id: String,
    pub title: String,
    pub authors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_year: Option<i32>,
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields accepted when creating a collection need.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NeedDraft {
    pub title: String,
    pub authors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_year: Option<i32>,
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Partial update for a collection need. Absent fields are left
/// unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NeedPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authors: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl CollectionNeed {
    pub fn from_draft(draft: NeedDraft) -> Self {
        Self {
            id: new_id(),
            title: draft.title,
            authors: draft.authors,
            publisher: draft.publisher,
            publish_year: draft.publish_year,
            priority: draft.priority,
            notes: draft.notes,
            created_at: Utc::now(),
        }
    }

    pub fn apply(&mut self, patch: NeedPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(authors) = patch.authors {
            self.authors = authors;
        }
        if let Some(publisher) = patch.publisher {
            self.publisher = Some(publisher);
        }
        if let Some(publish_year) = patch.publish_year {
            self.publish_year = Some(publish_year);
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(notes) = patch.notes {
            self.notes = Some(notes);
        }
    }
}

/// Review state of a donation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DonationStatus {
    Pending,
    Approved,
    Rejected,
}

/// A guest's offer to donate a book, reviewed by a librarian.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationRequest {
    pub id: String,
    pub title: String,
    pub author: String,
    pub description: String,
    pub contact: String,
    pub status: DonationStatus,
    pub created_at: DateTime<Utc>,
}

/// Fields a guest submits when offering a donation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationDraft {
    pub title: String,
    pub author: String,
    pub description: String,
    pub contact: String,
}

impl DonationRequest {
    /// New requests always start out pending review.
    pub fn from_draft(draft: DonationDraft) -> Self {
        Self {
            id: new_id(),
            title: draft.title,
            author: draft.author,
            description: draft.description,
            contact: draft.contact,
            status: DonationStatus::Pending,
            created_at: Utc::now(),
        }
    }

    /// Record a librarian's decision.
    ///
    /// Re-deciding an already-decided request silently overwrites the
    /// previous decision; whether that should be refused is an open
    /// product question.
    pub fn decide(&mut self, decision: DonationStatus) {
        self.status = decision;
    }

    pub fn is_pending(&self) -> bool {
        self.status == DonationStatus::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_draft() -> BookDraft {
        BookDraft {
            title: "The Blind Owl".to_string(),
            authors: vec!["Sadegh Hedayat".to_string()],
            publisher: "Amir Kabir".to_string(),
            publish_year: 1937,
            quantity: 2,
            cover_image: None,
        }
    }

    #[test]
    fn book_wire_format_is_camel_case() {
        let mut book = Book::from_draft(sample_draft());
        book.cover_image = Some("data:image/png;base64,AAAA".to_string());

        let value = serde_json::to_value(&book).unwrap();
        let obj = value.as_object().unwrap();
        assert!(obj.contains_key("publishYear"));
        assert!(obj.contains_key("coverImage"));
        assert!(obj.contains_key("createdAt"));
        assert!(!obj.contains_key("publish_year"));
    }

    #[test]
    fn absent_cover_image_is_omitted() {
        let book = Book::from_draft(sample_draft());
        let value = serde_json::to_value(&book).unwrap();
        assert!(value.as_object().unwrap().get("coverImage").is_none());
    }

    #[test]
    fn draft_ids_are_unique() {
        let a = Book::from_draft(sample_draft());
        let b = Book::from_draft(sample_draft());
        assert!(!a.id.is_empty());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn patch_merges_only_present_fields() {
        let mut book = Book::from_draft(sample_draft());
        let original_publisher = book.publisher.clone();

        book.apply(BookPatch {
            quantity: Some(7),
            title: Some("Buf-e Kur".to_string()),
            ..Default::default()
        });

        assert_eq!(book.quantity, 7);
        assert_eq!(book.title, "Buf-e Kur");
        assert_eq!(book.publisher, original_publisher);
    }

    #[test]
    fn priority_and_status_serialize_lowercase() {
        assert_eq!(serde_json::to_value(Priority::High).unwrap(), json!("high"));
        assert_eq!(
            serde_json::to_value(DonationStatus::Rejected).unwrap(),
            json!("rejected")
        );
        let parsed: Priority = serde_json::from_value(json!("medium")).unwrap();
        assert_eq!(parsed, Priority::Medium);
    }

    #[test]
    fn donation_lifecycle_starts_pending_and_overwrites_on_decide() {
        let mut request = DonationRequest::from_draft(DonationDraft {
            title: "Savushun".to_string(),
            author: "Simin Daneshvar".to_string(),
            description: "Hardcover, good condition".to_string(),
            contact: "guest@example.com".to_string(),
        });
        assert!(request.is_pending());

        request.decide(DonationStatus::Approved);
        assert_eq!(request.status, DonationStatus::Approved);

        // Current behavior: a second decision silently replaces the first.
        request.decide(DonationStatus::Rejected);
        assert_eq!(request.status, DonationStatus::Rejected);
    }

    #[test]
    fn state_document_wraps_state_with_attribution() {
        let doc = StateDocument::new(
            json!([{"id": "1"}]),
            UserInfo::new("ketab", "ketab@example.com"),
        );
        let value = serde_json::to_value(&doc).unwrap();
        let obj = value.as_object().unwrap();
        assert!(obj.contains_key("state"));
        assert!(obj.contains_key("lastModifiedBy"));
        assert!(obj.contains_key("lastModifiedAt"));
        assert_eq!(obj["lastModifiedBy"]["name"], "ketab");
    }

    #[test]
    fn need_patch_can_fill_optional_fields() {
        let mut need = CollectionNeed::from_draft(NeedDraft {
            title: "One Hundred Years of Solitude".to_string(),
            authors: vec!["Gabriel Garcia Marquez".to_string()],
            publisher: None,
            publish_year: None,
            priority: Priority::Low,
            notes: None,
        });
        assert!(need.publisher.is_none());

        need.apply(NeedPatch {
            publisher: Some("Harper".to_string()),
            priority: Some(Priority::High),
            ..Default::default()
        });

        assert_eq!(need.publisher.as_deref(), Some("Harper"));
        assert_eq!(need.priority, Priority::High);
    }
}
