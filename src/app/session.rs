use crate::app::{Portfolio, sort::SortState};

/// State owned by one interactive session and handed to whoever needs it.
#[derive(Clone, Debug, Default)]
pub struct Session {
    portfolio: Portfolio,
    sort: SortState,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    pub fn portfolio_mut(&mut self) -> &mut Portfolio {
        &mut self.portfolio
    }

    pub fn sort(&self) -> &SortState {
        &self.sort
    }

    pub fn sort_mut(&mut self) -> &mut SortState {
        &mut self.sort
    }
}
