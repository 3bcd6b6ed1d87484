use std::sync::Arc;

use inquire::{
    CustomUserError, Text,
    autocompletion::{Autocomplete, Replacement},
};
use weather_core::Catalog;

/// Offers catalog places containing the typed text.
#[derive(Debug, Clone)]
pub struct CatalogAutocomplete {
    catalog: Arc<Catalog>,
}

impl CatalogAutocomplete {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }
}

impl Autocomplete for CatalogAutocomplete {
    fn get_suggestions(&mut self, input: &str) -> Result<Vec<String>, CustomUserError> {
        Ok(self.catalog.suggest(input))
    }

    fn get_completion(
        &mut self,
        _input: &str,
        highlighted_suggestion: Option<String>,
    ) -> Result<Replacement, CustomUserError> {
        Ok(highlighted_suggestion)
    }
}

/// What the user did at the location prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// Text that is exactly a catalog entry, i.e. a picked suggestion.
    Suggestion(String),
    /// Free text to search as typed.
    Query(String),
    Quit,
}

impl Answer {
    pub fn classify(input: String, catalog: &Catalog) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            Answer::Quit
        } else if catalog.places().iter().any(|p| p == trimmed) {
            Answer::Suggestion(trimmed.to_string())
        } else {
            Answer::Query(trimmed.to_string())
        }
    }
}

/// Blocking prompt; run it off the async workers.
pub fn ask_location(catalog: Arc<Catalog>) -> anyhow::Result<Answer> {
    let result = Text::new("Location:")
        .with_placeholder("e.g., New York")
        .with_help_message("Tab/arrows to pick a suggestion, Enter to search, empty or Esc to quit")
        .with_autocomplete(CatalogAutocomplete::new(Arc::clone(&catalog)))
        .prompt();

    match result {
        Ok(input) => Ok(Answer::classify(input, &catalog)),
        Err(inquire::InquireError::OperationCanceled)
        | Err(inquire::InquireError::OperationInterrupted) => Ok(Answer::Quit),
        Err(err) => Err(err.into()),
    }
}
