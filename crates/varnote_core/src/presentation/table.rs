//! Client-side table view: filter, baseline order and column sorting.
//!
//! # Invariants
//! - Filter is applied before sorting.
//! - Baseline order is name-ascending under `locale_compare`; a user sort is
//!   applied stably on top of it.

use crate::model::record::DisplayRecord;
use crate::presentation::cell::{value_cell, ValueCell};
use std::cmp::Ordering;

/// Sortable columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Collection,
    Name,
    Type,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Rendered cells of one table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub variable_id: String,
    pub collection: String,
    pub name: String,
    pub type_label: &'static str,
    pub value: ValueCell,
    pub description: String,
}

impl RowView {
    pub fn from_record(record: &DisplayRecord) -> Self {
        Self {
            variable_id: record.id.clone(),
            collection: record.collection_label().to_string(),
            name: record.name.clone(),
            type_label: record.resolved_type.as_str(),
            value: value_cell(record.value_info.as_ref(), record.resolved_type),
            description: record.description.clone(),
        }
    }
}

/// Filter and sort state of the variables table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableTable {
    name_filter: String,
    sort: Option<(SortColumn, SortDirection)>,
}

impl VariableTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name_filter(&self) -> &str {
        &self.name_filter
    }

    pub fn set_name_filter(&mut self, filter: impl Into<String>) {
        self.name_filter = filter.into();
    }

    pub fn sort(&self) -> Option<(SortColumn, SortDirection)> {
        self.sort
    }

    /// Cycles `column` through ascending, descending and unsorted.
    ///
    /// Switching to another column starts it at ascending.
    pub fn toggle_sort(&mut self, column: SortColumn) {
        self.sort = match self.sort {
            Some((current, SortDirection::Ascending)) if current == column => {
                Some((column, SortDirection::Descending))
            }
            Some((current, SortDirection::Descending)) if current == column => None,
            _ => Some((column, SortDirection::Ascending)),
        };
    }

    /// Visible records in display order.
    pub fn rows<'a>(&self, records: &'a [DisplayRecord]) -> Vec<&'a DisplayRecord> {
        let needle = self.name_filter.to_lowercase();
        let mut rows = records
            .iter()
            .filter(|record| needle.is_empty() || record.name.to_lowercase().contains(&needle))
            .collect::<Vec<_>>();

        rows.sort_by(|a, b| locale_compare(&a.name, &b.name));
        if let Some((column, direction)) = self.sort {
            rows.sort_by(|a, b| {
                let ordering = compare_column(column, a, b);
                match direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            });
        }
        rows
    }

    /// Visible rows rendered into cells.
    pub fn view_rows(&self, records: &[DisplayRecord]) -> Vec<RowView> {
        self.rows(records)
            .into_iter()
            .map(RowView::from_record)
            .collect()
    }
}

fn compare_column(column: SortColumn, a: &DisplayRecord, b: &DisplayRecord) -> Ordering {
    match column {
        SortColumn::Collection => locale_compare(a.collection_label(), b.collection_label()),
        SortColumn::Name => locale_compare(&a.name, &b.name),
        SortColumn::Type => a.resolved_type.as_str().cmp(b.resolved_type.as_str()),
    }
}

/// Approximation of locale-aware string collation.
///
/// Case-insensitive first; on ties lowercase sorts before uppercase, then
/// raw code points decide. Punctuation and accents are compared by code
/// point, so names differing only there (`color-x` vs `color/x`) may order
/// differently from a full Unicode collator.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| case_pattern(a).cmp(case_pattern(b)))
        .then_with(|| a.cmp(b))
}

fn case_pattern(value: &str) -> impl Iterator<Item = bool> + '_ {
    value.chars().map(char::is_uppercase)
}

#[cfg(test)]
mod tests {
    use super::{locale_compare, SortColumn, SortDirection, VariableTable};
    use std::cmp::Ordering;

    #[test]
    fn locale_compare_is_case_insensitive_first() {
        assert_eq!(locale_compare("apple", "Banana"), Ordering::Less);
        assert_eq!(locale_compare("a", "A"), Ordering::Less);
        assert_eq!(locale_compare("Zeta", "alpha"), Ordering::Greater);
        assert_eq!(locale_compare("same", "same"), Ordering::Equal);
    }

    #[test]
    fn locale_compare_orders_punctuation_by_code_point() {
        assert_eq!(locale_compare("color-x", "color/x"), Ordering::Less);
        assert_eq!(locale_compare("Color/x", "color-x"), Ordering::Greater);
    }

    #[test]
    fn toggle_sort_cycles_per_column() {
        let mut table = VariableTable::new();
        table.toggle_sort(SortColumn::Name);
        assert_eq!(table.sort(), Some((SortColumn::Name, SortDirection::Ascending)));
        table.toggle_sort(SortColumn::Name);
        assert_eq!(table.sort(), Some((SortColumn::Name, SortDirection::Descending)));
        table.toggle_sort(SortColumn::Name);
        assert_eq!(table.sort(), None);

        table.toggle_sort(SortColumn::Type);
        table.toggle_sort(SortColumn::Collection);
        assert_eq!(
            table.sort(),
            Some((SortColumn::Collection, SortDirection::Ascending))
        );
    }
}
