use std::fmt::Display;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use stockroom_core::{Cursor, DeleteResult};

/// `?last_id=&page_size=` on list endpoints. Values stay raw strings so a
/// malformed number falls back to its default instead of rejecting the call.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub last_id: Option<String>,
    pub page_size: Option<String>,
}

impl PageQuery {
    pub fn cursor(&self) -> Option<Cursor> {
        Cursor::from_query(self.last_id.as_deref(), self.page_size.as_deref())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct InvoiceQuery {
    #[serde(rename = "withItems")]
    pub with_items: Option<String>,
}

impl InvoiceQuery {
    /// Only the literal `true` selects the join fetch.
    pub fn with_items(&self) -> bool {
        self.with_items.as_deref() == Some("true")
    }
}

/// Response body of every `DELETE /:id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct DeleteResponse {
    pub id: String,
    pub deleted: bool,
}

impl<I: Display> From<DeleteResult<I>> for DeleteResponse {
    fn from(result: DeleteResult<I>) -> Self {
        Self {
            id: result.id.to_string(),
            deleted: result.deleted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_core::InvoiceId;

    #[test]
    fn delete_response_carries_id_as_text() {
        let id = InvoiceId::new();
        let resp = DeleteResponse::from(DeleteResult::from_affected(id, 0));
        assert_eq!(resp.id, id.to_string());
        assert!(!resp.deleted);
    }

    #[test]
    fn page_query_without_params_is_unpaginated() {
        assert_eq!(PageQuery::default().cursor(), None);
    }

    #[test]
    fn page_query_falls_back_per_field() {
        let q = PageQuery {
            last_id: Some("abc".to_string()),
            page_size: Some("3".to_string()),
        };
        assert_eq!(q.cursor(), Some(Cursor::new(0, 3)));
    }

    #[test]
    fn with_items_requires_literal_true() {
        let yes = InvoiceQuery {
            with_items: Some("true".to_string()),
        };
        let no = InvoiceQuery {
            with_items: Some("1".to_string()),
        };
        assert!(yes.with_items());
        assert!(!no.with_items());
        assert!(!InvoiceQuery::default().with_items());
    }
}
