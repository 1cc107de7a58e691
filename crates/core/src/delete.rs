use serde::{Deserialize, Serialize};

/// Outcome of a delete-by-id.
///
/// `deleted` is derived from the affected-row count of the mutation, so a
/// delete that matched nothing is `deleted: false`, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResult<I> {
    pub id: I,
    pub deleted: bool,
}

impl<I> DeleteResult<I> {
    pub fn from_affected(id: I, rows_affected: u64) -> Self {
        Self {
            id,
            deleted: rows_affected > 0,
        }
    }
}
