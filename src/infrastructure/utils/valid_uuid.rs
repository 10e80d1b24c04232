use uuid::Uuid;

use crate::errors::AppError;

/// Parses a client-supplied identifier, rejecting malformed input as a validation error.
pub fn valid_uuid(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id.trim()).map_err(|_| AppError::Validation(format!("invalid id {:?}", id)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_ids_are_validation_errors() {
        assert!(matches!(valid_uuid("not-a-uuid"), Err(AppError::Validation(_))));
        assert!(valid_uuid(" 67e55044-10b1-426f-9247-bb680e5fe0c8 ").is_ok());
    }
}
