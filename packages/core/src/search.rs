// ABOUTME: Free-text search over in-memory records
// ABOUTME: Case-insensitive substring match against each record's text fields

use crate::types::{Customer, Deal, Task};

/// A record with text fields that free-text search looks at
pub trait Searchable {
    fn search_fields(&self) -> Vec<&str>;
}

impl Searchable for Deal {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str()];
        fields.extend(self.customer_name.as_deref());
        fields
    }
}

impl Searchable for Customer {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        fields.extend(self.email.as_deref());
        fields.extend(self.company.as_deref());
        fields
    }
}

impl Searchable for Task {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str()];
        fields.extend(self.description.as_deref());
        fields
    }
}

/// True when any search field contains `query`, ignoring case.
/// An empty query matches every record.
pub fn matches_query<T: Searchable + ?Sized>(record: &T, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }

    record
        .search_fields()
        .into_iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Records matching `query`, in their original order
pub fn filter_records<'a, T: Searchable>(records: &'a [T], query: &str) -> Vec<&'a T> {
    records
        .iter()
        .filter(|record| matches_query(*record, query))
        .collect()
}
