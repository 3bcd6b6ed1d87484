//! Place-name catalog and the substring filter behind autocomplete.

const DEFAULT_PLACES: &[&str] = &[
    "New York",
    "Los Angeles",
    "Chicago",
    "Houston",
    "Phoenix",
    "Philadelphia",
    "San Antonio",
    "San Diego",
    "Dallas",
    "San Jose",
    "Delhi",
    "Mumbai",
    "Bangalore",
    "Dharamshala",
    "Mexico",
    "Shahpur",
    "Chennai",
    "Jaipur",
    "Kangra",
];

/// Ordered, read-only list of known place names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    places: Vec<String>,
}

impl Catalog {
    pub fn new<I, S>(places: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { places: places.into_iter().map(Into::into).collect() }
    }

    pub fn places(&self) -> &[String] {
        &self.places
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    /// Entries containing `query` case-insensitively, in catalog order.
    /// An empty query matches nothing.
    pub fn suggest(&self, query: &str) -> Vec<String> {
        if query.is_empty() {
            return Vec::new();
        }

        let needle = query.to_lowercase();
        self.places
            .iter()
            .filter(|place| place.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(DEFAULT_PLACES.iter().copied())
    }
}
