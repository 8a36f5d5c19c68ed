//! DOMTokenList (classList)
//!
//! Space-separated class tokens of an element.

/// DOMTokenList for managing space-separated tokens
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DOMTokenList {
    tokens: Vec<String>,
}

impl DOMTokenList {
    /// Create empty token list
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from space-separated string
    pub fn from_string(s: &str) -> Self {
        let mut list = Self::new();
        list.set_value(s);
        list
    }

    /// Get number of tokens
    pub fn length(&self) -> usize {
        self.tokens.len()
    }

    /// Check if there are no tokens
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Check if token exists
    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    /// Add a token, ignoring duplicates and empty strings
    pub fn add(&mut self, token: &str) {
        if !token.is_empty() && !self.contains(token) {
            self.tokens.push(token.to_string());
        }
    }

    /// Remove a token, returns whether it was present
    pub fn remove(&mut self, token: &str) -> bool {
        let before = self.tokens.len();
        self.tokens.retain(|t| t != token);
        self.tokens.len() != before
    }

    /// Toggle token, returns new state
    pub fn toggle(&mut self, token: &str, force: Option<bool>) -> bool {
        let wanted = force.unwrap_or(!self.contains(token));
        if wanted {
            self.add(token);
        } else {
            self.remove(token);
        }
        wanted
    }

    /// Get value as string
    pub fn value(&self) -> String {
        self.tokens.join(" ")
    }

    /// Replace all tokens from a class attribute value
    pub fn set_value(&mut self, value: &str) {
        self.tokens.clear();
        for token in value.split_whitespace() {
            self.add(token);
        }
    }

    /// Iterate over tokens
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(|s| s.as_str())
    }
}

impl std::fmt::Display for DOMTokenList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value())
    }
}
