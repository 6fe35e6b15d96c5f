const MIN_USERNAME_LEN: usize = 3;
const MAX_USERNAME_LEN: usize = 20;
pub const MIN_PASSWORD_LEN: usize = 6;
pub const MAX_COMMENT_LEN: usize = 1000;

fn is_valid_username_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'
}

/// Trims and lowercases a username as typed by an applicant.
#[must_use]
pub fn normalize_username(username: &str) -> String {
    username.trim().to_lowercase()
}

pub fn validate_username(username: &str) -> Result<(), String> {
    let len = username.chars().count();
    if !(MIN_USERNAME_LEN..=MAX_USERNAME_LEN).contains(&len)
        || !username.chars().all(is_valid_username_char)
    {
        return Err(format!(
            "Username must be {MIN_USERNAME_LEN}-{MAX_USERNAME_LEN} characters: lowercase letters, numbers, and underscores"
        ));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), String> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        ));
    }
    Ok(())
}

pub fn validate_comment(body: &str) -> Result<(), String> {
    if body.is_empty() {
        return Err("Comment cannot be empty".to_string());
    }
    if body.chars().count() > MAX_COMMENT_LEN {
        return Err(format!(
            "Comment cannot exceed {MAX_COMMENT_LEN} characters"
        ));
    }
    Ok(())
}

pub fn validate_https_url(url: &str) -> Result<(), String> {
    match url.strip_prefix("https://") {
        Some(rest) if !rest.is_empty() && !rest.contains(char::is_whitespace) => Ok(()),
        _ => Err("URL must start with https://".to_string()),
    }
}

/// Trims an optional text field, treating blank input as absent.
#[must_use]
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
