use validator::ValidationError;

/// Rejects empty and whitespace-only strings.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_is_blank() {
        assert!(not_blank("   ").is_err());
        assert!(not_blank("").is_err());
        assert!(not_blank(" ai ").is_ok());
    }
}
