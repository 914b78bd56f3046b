//! Search token derivation
//!
//! The directory search matches whole uppercase tokens against a
//! precomputed `searchableFields` array instead of scanning substrings.
//! Tokens are the name parts, the registry id and the phone number.

/// Build the search token set for an employee
pub fn build_searchable_fields(full_name: &str, employee_id: &str, phone: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();

    for part in full_name.split_whitespace() {
        let token = part.to_uppercase();
        if !token.is_empty() && !tokens.contains(&token) {
            tokens.push(token);
        }
    }

    let id_token = employee_id.trim().to_uppercase();
    if !id_token.is_empty() && !tokens.contains(&id_token) {
        tokens.push(id_token);
    }

    let phone_token = phone.trim().to_string();
    if !phone_token.is_empty() && !tokens.contains(&phone_token) {
        tokens.push(phone_token);
    }

    tokens
}

/// Normalize a user-supplied search term for token matching
///
/// Returns `None` for blank input, which callers treat as "no search".
pub fn normalize_search_term(term: &str) -> Option<String> {
    let normalized = term.trim().to_uppercase();
    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_for_jane_doe() {
        let tokens =
            build_searchable_fields("Jane Doe", "CISS/ABC/2024-25/042", "9876543210");
        assert!(tokens.contains(&"JANE".to_string()));
        assert!(tokens.contains(&"DOE".to_string()));
        assert!(tokens.contains(&"CISS/ABC/2024-25/042".to_string()));
        assert!(tokens.contains(&"9876543210".to_string()));
    }

    #[test]
    fn test_whole_token_matching_semantics() {
        let tokens = build_searchable_fields("Jane Doe", "CISS/ABC/2024-25/042", "9876543210");
        // Case-insensitive input matches after normalization
        assert!(tokens.contains(&normalize_search_term("JANE").unwrap()));
        assert!(tokens.contains(&normalize_search_term("doe").unwrap()));
        // A partial token does not match; tokens are whole words
        assert!(!tokens.contains(&normalize_search_term("Jan").unwrap()));
    }

    #[test]
    fn test_duplicate_name_parts_deduped() {
        let tokens = build_searchable_fields("Ram Ram", "CISS/X/2024-25/001", "9000000000");
        assert_eq!(tokens.iter().filter(|t| *t == "RAM").count(), 1);
    }

    #[test]
    fn test_normalize_blank_is_none() {
        assert_eq!(normalize_search_term("   "), None);
        assert_eq!(normalize_search_term(""), None);
        assert_eq!(normalize_search_term(" doe "), Some("DOE".to_string()));
    }
}
