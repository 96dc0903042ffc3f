//! Translation of `sqlx` errors into store errors.

use crate::domain::repositories::StoreError;

/// Name of the primary-key constraint that guards short code uniqueness.
pub const SHORT_CODE_CONSTRAINT: &str = "shortened_urls_pkey";

/// Returns true only for a unique violation on the short code constraint.
///
/// Other unique or foreign-key violations are not collisions and must not be
/// retried as such.
pub fn is_unique_violation_on_code(e: &sqlx::Error) -> bool {
    let Some(db_err) = e.as_database_error() else {
        return false;
    };

    if !db_err.is_unique_violation() {
        return false;
    }

    matches!(db_err.constraint(), Some(SHORT_CODE_CONSTRAINT))
}

/// Maps an error from an insert of `code` into a [`StoreError`].
pub fn map_insert_error(e: sqlx::Error, code: &str) -> StoreError {
    if is_unique_violation_on_code(&e) {
        return StoreError::Conflict {
            code: code.to_string(),
        };
    }
    map_sqlx_error(e)
}

/// Maps any other `sqlx` error into [`StoreError::Backend`].
pub fn map_sqlx_error(e: sqlx::Error) -> StoreError {
    StoreError::Backend(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_is_not_a_conflict() {
        let err = sqlx::Error::RowNotFound;
        assert!(!is_unique_violation_on_code(&err));
        assert!(matches!(
            map_insert_error(err, "abc1234"),
            StoreError::Backend(_)
        ));
    }

    #[test]
    fn test_pool_timeout_maps_to_backend() {
        let err = map_sqlx_error(sqlx::Error::PoolTimedOut);
        assert!(!err.is_conflict());
    }
}
