use crate::database::models::EMAIL_MAX_CHARS;

/// Escape the five HTML-significant characters.
///
/// Applied to every stored string and to passwords before hashing, so
/// registration and login must both go through it.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Validate email format
pub fn validate_email_format(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email cannot be empty".to_string());
    }

    if email.chars().count() > EMAIL_MAX_CHARS {
        return Err(format!("Email must be at most {} characters", EMAIL_MAX_CHARS));
    }

    if email.chars().any(char::is_whitespace) {
        return Err("Email is not correct".to_string());
    }

    let (local, domain) = match email.split_once('@') {
        Some(parts) => parts,
        None => return Err("Email is not correct".to_string()),
    };

    if local.is_empty() || domain.contains('@') {
        return Err("Email is not correct".to_string());
    }

    // Domain needs at least two labels and no empty ones
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|label| label.is_empty()) {
        return Err("Email is not correct".to_string());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_html("<b>\"hi\" & 'yo'</b>"), "&lt;b&gt;&quot;hi&quot; &amp; &#x27;yo&#x27;&lt;/b&gt;");
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn accepts_ordinary_addresses() {
        assert!(validate_email_format("test@test.ru").is_ok());
        assert!(validate_email_format("first.last+tag@mail.example.com").is_ok());
    }

    #[test]
    fn rejects_malformed_addresses() {
        for bad in ["", "plain", "@test.ru", "a@b", "a@@b.ru", "a@b..ru", "a@.ru", "a b@c.ru", "a@b.ru."] {
            assert!(validate_email_format(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn rejects_overlong_addresses() {
        let email = format!("{}@example.com", "a".repeat(250));
        assert!(validate_email_format(&email).is_err());
    }
}
