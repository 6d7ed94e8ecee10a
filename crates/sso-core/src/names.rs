//! Display-name splitting.

/// First and last name derived from a provider display name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonName {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl PersonName {
    /// Split on whitespace: first token is the first name, second token the
    /// last name, anything after is dropped. Missing tokens stay `None`.
    #[must_use]
    pub fn split(display_name: Option<&str>) -> Self {
        let mut tokens = display_name.unwrap_or_default().split_whitespace();
        Self {
            first_name: tokens.next().map(str::to_string),
            last_name: tokens.next().map(str::to_string),
        }
    }
}
