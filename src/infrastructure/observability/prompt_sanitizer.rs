const MAX_VISIBLE_LENGTH: usize = 80;

/// Sanitizes user prompt text for logging: trims, truncates, and redacts
/// anything that looks like an inline credential.
pub fn sanitize_prompt(prompt: &str) -> String {
    let trimmed = prompt.trim();

    if trimmed.is_empty() {
        return String::from("[EMPTY]");
    }

    let visible = if trimmed.chars().count() > MAX_VISIBLE_LENGTH {
        let head: String = trimmed.chars().take(MAX_VISIBLE_LENGTH).collect();
        format!("{}... ({} chars total)", head, trimmed.chars().count())
    } else {
        trimmed.to_string()
    };

    redact_credentials(&visible)
}

fn redact_credentials(text: &str) -> String {
    let markers = ["key=", "token=", "Bearer "];

    let mut result = text.to_string();
    for marker in markers {
        if let Some(idx) = result.find(marker) {
            let start = idx + marker.len();
            let end = result[start..]
                .find(|c: char| c.is_whitespace() || c == '&' || c == '"')
                .map(|i| start + i)
                .unwrap_or(result.len());
            result.replace_range(start..end, "[REDACTED]");
        }
    }

    result
}
