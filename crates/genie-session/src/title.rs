//! Chat title derivation.

use chrono::Local;

const MAX_TITLE_CHARS: usize = 30;
const TRUNCATED_CHARS: usize = 27;

/// Derive a chat title from the first user message: the message itself,
/// truncated to 30 characters with an ellipsis.
pub fn derive_title(first_message: &str) -> String {
    let trimmed = first_message.trim();
    if trimmed.chars().count() <= MAX_TITLE_CHARS {
        trimmed.to_string()
    } else {
        let mut title: String = trimmed.chars().take(TRUNCATED_CHARS).collect();
        title.push_str("...");
        title
    }
}

/// Default title for a chat with no messages yet.
pub fn default_title() -> String {
    format!("Chat {}", Local::now().format("%m/%d %H:%M"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_message_used_verbatim() {
        assert_eq!(derive_title("Hello there"), "Hello there");
    }

    #[test]
    fn test_long_message_truncated_with_ellipsis() {
        let msg = "Write me a viral post about sustainable gardening tips";
        let title = derive_title(msg);
        assert_eq!(title.chars().count(), 30);
        assert!(title.ends_with("..."));
    }

    #[test]
    fn test_whitespace_trimmed_before_truncation() {
        assert_eq!(derive_title("  hi  "), "hi");
    }

    #[test]
    fn test_multibyte_input_truncates_on_chars() {
        let msg = "日本語のとても長いメッセージをここに書いてみます、文字数が多いですね";
        let title = derive_title(msg);
        assert!(title.ends_with("..."));
        assert_eq!(title.chars().count(), 30);
    }
}
