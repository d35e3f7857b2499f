use prettytable::{row, Table};

use crate::model::{Workout, DATE_FORMAT};

const PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Sport,
    Description,
    Date,
    EndDate,
    LocationName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Derived projection over the workout list.
///
/// The widget wraps a snapshot of the rows; sort, page, and filter state
/// belong to the widget and never touch the underlying list. A structural
/// change to the list means building a fresh `TableView`, which resets that
/// state.
#[derive(Debug, Clone)]
pub struct TableView {
    rows: Vec<Workout>,
    filter: String,
    sort: Option<(SortColumn, SortOrder)>,
    page: usize,
    page_size: usize,
}

impl TableView {
    pub fn new(rows: Vec<Workout>) -> Self {
        TableView {
            rows,
            filter: String::new(),
            sort: None,
            page: 0,
            page_size: PAGE_SIZE,
        }
    }

    /// Substring filter over the displayed fields. The needle is normalized
    /// the way the widget matches: trimmed and lowercased.
    pub fn set_filter(&mut self, text: &str) {
        self.filter = text.trim().to_lowercase();
        self.page = 0;
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Repeated clicks on the same column header flip the direction.
    pub fn toggle_sort(&mut self, column: SortColumn) {
        self.sort = match self.sort {
            Some((current, SortOrder::Ascending)) if current == column => {
                Some((column, SortOrder::Descending))
            }
            _ => Some((column, SortOrder::Ascending)),
        };
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    pub fn page_count(&self) -> usize {
        let matching = self
            .rows
            .iter()
            .filter(|workout| self.matches(workout))
            .count();
        matching.div_ceil(self.page_size).max(1)
    }

    fn matches(&self, workout: &Workout) -> bool {
        if self.filter.is_empty() {
            return true;
        }

        let fields = [
            workout.sport.to_lowercase(),
            workout.description.to_lowercase(),
            workout.date.format(DATE_FORMAT).to_string(),
            workout.end_date.format(DATE_FORMAT).to_string(),
            workout.location_name.to_lowercase(),
        ];

        fields.iter().any(|field| field.contains(&self.filter))
    }

    /// Filter, then sort, then the current page slice.
    pub fn visible_rows(&self) -> Vec<&Workout> {
        let mut rows: Vec<&Workout> = self
            .rows
            .iter()
            .filter(|workout| self.matches(workout))
            .collect();

        if let Some((column, order)) = self.sort {
            rows.sort_by(|a, b| {
                let ordering = match column {
                    SortColumn::Sport => a.sport.to_lowercase().cmp(&b.sport.to_lowercase()),
                    SortColumn::Description => {
                        a.description.to_lowercase().cmp(&b.description.to_lowercase())
                    }
                    SortColumn::Date => a.date.cmp(&b.date),
                    SortColumn::EndDate => a.end_date.cmp(&b.end_date),
                    SortColumn::LocationName => a
                        .location_name
                        .to_lowercase()
                        .cmp(&b.location_name.to_lowercase()),
                };
                match order {
                    SortOrder::Ascending => ordering,
                    SortOrder::Descending => ordering.reverse(),
                }
            });
        }

        rows.into_iter()
            .skip(self.page * self.page_size)
            .take(self.page_size)
            .collect()
    }

    pub fn render(&self) -> Table {
        let mut table = Table::new();
        table.add_row(row![Fb => "Id", "Sport", "Description", "Date", "End Date", "Location"]);

        for workout in self.visible_rows() {
            table.add_row(row![
                workout.id.map_or_else(String::new, |id| id.to_string()),
                workout.sport,
                workout.description,
                workout.date.format(DATE_FORMAT),
                workout.end_date.format(DATE_FORMAT),
                workout.location_name
            ]);
        }

        table
    }
}
