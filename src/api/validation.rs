use super::ApiError;

pub fn validate_username(username: &str) -> Result<&str, ApiError> {
    if !(3..=32).contains(&username.len()) {
        return Err(ApiError::validation(
            "Username must be between 3 and 32 characters",
        ));
    }

    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(ApiError::validation(
            "Username can only contain letters, numbers, and underscores",
        ));
    }

    Ok(username)
}

pub fn validate_email(email: &str) -> Result<&str, ApiError> {
    let trimmed = email.trim();
    let valid = trimmed.split_once('@').is_some_and(|(local, domain)| {
        !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
    });

    if !valid {
        return Err(ApiError::validation(format!(
            "Invalid email address: {}",
            trimmed
        )));
    }

    Ok(trimmed)
}

pub fn validate_record_id(id: i32) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid ID: {}. ID must be a positive integer",
            id
        )));
    }
    Ok(id)
}
