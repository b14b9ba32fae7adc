//! Identifier helpers for generated code.
//!
//! Schema names arrive as plain strings. Before they can be spliced into a
//! template they have to become valid Rust identifiers: method names are
//! converted to `snake_case` and names that collide with keywords are escaped
//! as raw identifiers (`type` becomes `r#type`).

use proc_macro2::Ident;

/// Converts a schema identifier into a Rust identifier.
///
/// Keywords are escaped as raw identifiers. Returns `None` for names that
/// cannot be identifiers at all (empty, leading digit, punctuation, or the
/// path keywords `self`, `Self`, `super`, `crate`).
///
/// ## Examples
///
/// ```
/// use schemagen_gen::naming::to_ident;
///
/// assert_eq!(to_ident("user_id").unwrap().to_string(), "user_id");
/// assert_eq!(to_ident("type").unwrap().to_string(), "r#type");
/// assert!(to_ident("9lives").is_none());
/// assert!(to_ident("self").is_none());
/// ```
pub fn to_ident(name: &str) -> Option<Ident> {
    if let Ok(ident) = syn::parse_str::<Ident>(name) {
        return Some(ident);
    }
    syn::parse_str::<Ident>(&format!("r#{name}")).ok()
}

/// Converts a CamelCase name to `snake_case`.
///
/// ## Examples
///
/// ```
/// use schemagen_gen::naming::to_snake_case;
///
/// assert_eq!(to_snake_case("SayHello"), "say_hello");
/// assert_eq!(to_snake_case("GetHTTPStatus"), "get_http_status");
/// assert_eq!(to_snake_case("already_snake"), "already_snake");
/// ```
pub fn to_snake_case(name: &str) -> String {
    split_camel_case(name)
        .into_iter()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}

/// Splits a CamelCase string into its component words.
///
/// Handles various CamelCase patterns:
/// - "SayHello" -> ["Say", "Hello"]
/// - "OpenAI" -> ["Open", "AI"]
/// - "HTTPClient" -> ["HTTP", "Client"]
/// - "ping" -> ["ping"]
fn split_camel_case(s: &str) -> Vec<&str> {
    let mut words = Vec::new();
    let mut word_start = 0;
    let chars: Vec<(usize, char)> = s.char_indices().collect();

    for i in 1..chars.len() {
        let (offset, current) = chars[i];
        let prev = chars[i - 1].1;

        // Split before uppercase that follows lowercase: "sayHello" -> "say", "Hello"
        // Split before uppercase followed by lowercase when preceded by uppercase: "HTTPClient" -> "HTTP", "Client"
        let is_new_word = current.is_uppercase()
            && (prev.is_lowercase()
                || prev.is_ascii_digit()
                || (i + 1 < chars.len() && chars[i + 1].1.is_lowercase() && prev.is_uppercase()));

        if is_new_word {
            if offset > word_start {
                words.push(&s[word_start..offset]);
            }
            word_start = offset;
        }
    }

    // Add the final word
    if word_start < s.len() {
        words.push(&s[word_start..]);
    }

    words
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_camel_case_multi_word() {
        assert_eq!(split_camel_case("SayHello"), vec!["Say", "Hello"]);
    }

    #[test]
    fn split_camel_case_with_acronym() {
        assert_eq!(split_camel_case("OpenAI"), vec!["Open", "AI"]);
        assert_eq!(split_camel_case("HTTPClient"), vec!["HTTP", "Client"]);
    }

    #[test]
    fn split_camel_case_after_digit() {
        assert_eq!(split_camel_case("V2Ping"), vec!["V2", "Ping"]);
    }

    #[test]
    fn split_camel_case_empty() {
        assert!(split_camel_case("").is_empty());
    }

    #[test]
    fn snake_case_keeps_existing_underscores() {
        assert_eq!(to_snake_case("list_items"), "list_items");
        assert_eq!(to_snake_case("ListItems"), "list_items");
    }

    #[test]
    fn to_ident_escapes_keywords() {
        assert_eq!(to_ident("match").unwrap().to_string(), "r#match");
        assert_eq!(to_ident("async").unwrap().to_string(), "r#async");
    }

    #[test]
    fn to_ident_rejects_non_identifiers() {
        assert!(to_ident("").is_none());
        assert!(to_ident("has space").is_none());
        assert!(to_ident("a-b").is_none());
        assert!(to_ident("crate").is_none());
        assert!(to_ident("Self").is_none());
    }
}
