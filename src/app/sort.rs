use std::cmp::Ordering;

use strum_macros::{Display, EnumIter};

use crate::models::QuoteSnapshot;

#[derive(Clone, Copy, Debug, Display, EnumIter, Eq, PartialEq)]
pub enum SortColumn {
    #[strum(serialize = "Name")]
    Name,
    #[strum(serialize = "Score")]
    Score,
    #[strum(serialize = "Price")]
    Price,
    #[strum(serialize = "L")]
    Long,
    #[strum(serialize = "M")]
    Medium,
    #[strum(serialize = "B")]
    Short,
}

impl SortColumn {
    fn compare(&self, a: &QuoteSnapshot, b: &QuoteSnapshot) -> Ordering {
        match self {
            SortColumn::Name => a.name().cmp(b.name()),
            SortColumn::Score => a.score().cmp(b.score()),
            SortColumn::Price => a.price().total_cmp(b.price()),
            SortColumn::Long => a.flags().long.cmp(&b.flags().long),
            SortColumn::Medium => a.flags().medium.cmp(&b.flags().medium),
            SortColumn::Short => a.flags().short.cmp(&b.flags().short),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SortState {
    column: SortColumn,
    ascending: bool,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            column: SortColumn::Score,
            ascending: false,
        }
    }
}

impl SortState {
    pub fn column(&self) -> SortColumn {
        self.column
    }

    pub fn ascending(&self) -> bool {
        self.ascending
    }

    /// Selecting a header makes it the key and flips the direction, even when
    /// the column changes.
    pub fn select(&mut self, column: SortColumn) {
        self.column = column;
        self.ascending = !self.ascending;
    }

    /// Stable sort, so ties keep watchlist order.
    pub fn apply(&self, snapshots: &mut [QuoteSnapshot]) {
        snapshots.sort_by(|a, b| {
            let ordering = self.column.compare(a, b);
            if self.ascending {
                ordering
            } else {
                ordering.reverse()
            }
        });
    }
}
