use std::{
    io,
    time::{Duration, Instant},
};
use strum::IntoEnumIterator;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
    widgets::TableState,
};
use rust_decimal::Decimal;

use crate::{
    api::MarketDataProvider,
    app::{Session, market::MarketService, sort::SortColumn, ui},
    models::{FetchOutcome, PacAllocation, QuoteSnapshot, Watchlist},
};

const POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum InputMode {
    #[default]
    Normal,
    Quantity,
    Pac,
    Lookup,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Action {
    Continue,
    Quit,
    Refresh,
    Lookup(String),
}

/// Everything the renderer needs besides the watchlist and the session.
#[derive(Debug, Default)]
pub struct ViewState {
    pub tables: Vec<Vec<QuoteSnapshot>>,
    pub spotlight: Vec<QuoteSnapshot>,
    pub selected_tab: usize,
    pub table_state: TableState,
    pub popup_message: Option<String>,
    pub error_popup: Option<String>,
    pub detail: Option<QuoteSnapshot>,
    pub pending: Option<QuoteSnapshot>,
    pub pac_plan: Option<Vec<PacAllocation>>,
    pub input_mode: InputMode,
    pub input: String,
    pub currency: String,
}

pub struct App<P: MarketDataProvider> {
    market: MarketService<P>,
    watchlist: Watchlist,
    session: Session,
    view: ViewState,
    last_refresh: Option<Instant>,
}

impl<P: MarketDataProvider> App<P> {
    pub fn new(market: MarketService<P>, watchlist: Watchlist, session: Session, currency: &str) -> Self {
        let view = ViewState {
            tables: vec![Vec::new(); watchlist.categories().len()],
            currency: currency.to_string(),
            ..ViewState::default()
        };

        Self {
            market,
            watchlist,
            session,
            view,
            last_refresh: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    fn show_popup(&mut self, message: &str) {
        self.view.popup_message = Some(message.to_string());
    }

    fn clear_popup(&mut self) {
        self.view.popup_message = None;
    }

    fn show_error_popup(&mut self, message: &str) {
        self.view.error_popup = Some(message.to_string());
    }

    fn clear_error_popup(&mut self) {
        self.view.error_popup = None;
    }

    fn portfolio_tab(&self) -> usize {
        self.watchlist.categories().len()
    }

    fn on_portfolio_tab(&self) -> bool {
        self.view.selected_tab == self.portfolio_tab()
    }

    fn visible_rows(&self) -> usize {
        if self.on_portfolio_tab() {
            self.session.portfolio().len()
        } else {
            self.view
                .tables
                .get(self.view.selected_tab)
                .map_or(0, Vec::len)
        }
    }

    fn selected_snapshot(&self) -> Option<&QuoteSnapshot> {
        let row = self.view.table_state.selected()?;
        self.view.tables.get(self.view.selected_tab)?.get(row)
    }

    fn sort_tables(&mut self) {
        let sort = *self.session.sort();
        for table in self.view.tables.iter_mut() {
            sort.apply(table);
        }
    }

    /// Re-reads every category and any held symbol outside the watchlist.
    /// Unexpired symbols come from the cache.
    pub async fn refresh(&mut self) {
        let purged = self.market.purge_expired();
        if purged > 0 {
            log::debug!("Purged {} expired cache entries", purged);
        }

        let categories = self.watchlist.categories().clone();
        let mut tables = Vec::with_capacity(categories.len());

        for category in &categories {
            tables.push(self.market.analyze_category(category).await);
        }

        let spotlight = self
            .market
            .analyze_symbols(self.watchlist.spotlight())
            .await;

        // Holdings added through lookup are not on any tab.
        let watched = self.watchlist.all_symbols();
        let mut held = Vec::new();
        for symbol in self.session.portfolio().symbols() {
            if watched.contains(&symbol) {
                continue;
            }
            if let Some(snapshot) = self.market.analyze(&symbol).await.ready() {
                held.push(snapshot);
            }
        }

        let fresh: Vec<QuoteSnapshot> = tables
            .iter()
            .flatten()
            .chain(spotlight.iter())
            .chain(held.iter())
            .cloned()
            .collect();
        let updated = self.session.portfolio_mut().refresh_prices(&fresh);
        log::debug!(
            "Refreshed {} portfolio prices, {} symbols cached",
            updated,
            self.market.cached_symbols()
        );

        self.view.tables = tables;
        self.view.spotlight = spotlight;
        self.sort_tables();
        self.clamp_selection();
        self.last_refresh = Some(Instant::now());
    }

    pub async fn lookup(&mut self, input: &str) {
        match self.market.lookup(input).await {
            FetchOutcome::Ready(snapshot) => self.view.detail = Some(snapshot),
            FetchOutcome::Empty => {
                self.show_error_popup(&format!("No data for '{}'", input.trim()))
            }
            FetchOutcome::Failed(err) => self.show_error_popup(&format!("{}", err)),
        }
    }

    fn refresh_due(&self) -> bool {
        self.last_refresh
            .is_none_or(|at| at.elapsed() >= self.market.ttl())
    }

    fn clamp_selection(&mut self) {
        let rows = self.visible_rows();
        match self.view.table_state.selected() {
            Some(_) if rows == 0 => self.view.table_state.select(None),
            Some(i) if i >= rows => self.view.table_state.select(Some(rows - 1)),
            _ => {}
        }
    }

    fn switch_tab(&mut self, forward: bool) {
        let tabs = self.portfolio_tab() + 1;
        self.view.selected_tab = if forward {
            (self.view.selected_tab + 1) % tabs
        } else {
            (self.view.selected_tab + tabs - 1) % tabs
        };
        self.view.table_state.select(None);
    }

    fn move_selection(&mut self, down: bool) {
        let rows = self.visible_rows();
        if rows == 0 {
            return;
        }

        let i = match self.view.table_state.selected() {
            Some(i) if down => {
                if i >= rows - 1 {
                    0
                } else {
                    i + 1
                }
            }
            Some(i) => {
                if i == 0 {
                    rows - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.view.table_state.select(Some(i));
    }

    fn start_input(&mut self, mode: InputMode) {
        self.view.input_mode = mode;
        self.view.input.clear();
    }

    fn confirm_input(&mut self) -> Action {
        let mode = self.view.input_mode;
        let input = std::mem::take(&mut self.view.input);
        self.view.input_mode = InputMode::Normal;

        match mode {
            InputMode::Normal => Action::Continue,
            InputMode::Lookup => Action::Lookup(input),
            InputMode::Quantity => {
                let Some(snapshot) = self.view.pending.take() else {
                    return Action::Continue;
                };
                let result = parse_amount(&input)
                    .and_then(|q| self.session.portfolio_mut().add_snapshot(&snapshot, q));
                match result {
                    Ok(()) => self.show_popup(&format!("Added {}!", snapshot.symbol())),
                    Err(e) => self.show_error_popup(&format!("{}", e)),
                }
                Action::Continue
            }
            InputMode::Pac => {
                let result = parse_amount(&input)
                    .and_then(|amount| self.session.portfolio().pac_plan(amount));
                match result {
                    Ok(plan) => self.view.pac_plan = Some(plan),
                    Err(e) => self.show_error_popup(&format!("{}", e)),
                }
                Action::Continue
            }
        }
    }

    fn handle_input_key(&mut self, code: KeyCode) -> Action {
        match code {
            KeyCode::Esc => {
                self.view.input_mode = InputMode::Normal;
                self.view.input.clear();
                self.view.pending = None;
            }
            KeyCode::Enter => return self.confirm_input(),
            KeyCode::Backspace => {
                self.view.input.pop();
            }
            KeyCode::Char(c) => {
                let accepted = match self.view.input_mode {
                    InputMode::Lookup => !c.is_whitespace(),
                    _ => c.is_ascii_digit() || c == '.',
                };
                if accepted {
                    self.view.input.push(c);
                }
            }
            _ => {}
        }
        Action::Continue
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Action {
        self.clear_popup();

        if self.view.error_popup.is_some() {
            if matches!(code, KeyCode::Enter | KeyCode::Esc) {
                self.clear_error_popup();
            }
            return Action::Continue;
        }

        if self.view.input_mode != InputMode::Normal {
            return self.handle_input_key(code);
        }

        if self.view.pac_plan.is_some() {
            if matches!(code, KeyCode::Enter | KeyCode::Esc) {
                self.view.pac_plan = None;
            }
            return Action::Continue;
        }

        if let Some(detail) = &self.view.detail {
            match code {
                KeyCode::Enter | KeyCode::Esc => self.view.detail = None,
                KeyCode::Char('a') => {
                    self.view.pending = Some(detail.clone());
                    self.view.detail = None;
                    self.start_input(InputMode::Quantity);
                }
                _ => {}
            }
            return Action::Continue;
        }

        match code {
            KeyCode::Char('q') => return Action::Quit,
            KeyCode::F(5) => return Action::Refresh,
            KeyCode::Tab | KeyCode::Right => self.switch_tab(true),
            KeyCode::BackTab | KeyCode::Left => self.switch_tab(false),
            KeyCode::Down => self.move_selection(true),
            KeyCode::Up => self.move_selection(false),
            KeyCode::Esc => self.view.table_state.select(None),
            KeyCode::Char(c @ '1'..='6') => {
                let idx = c as usize - '1' as usize;
                if let Some(column) = SortColumn::iter().nth(idx) {
                    self.session.sort_mut().select(column);
                    self.sort_tables();
                }
            }
            KeyCode::Enter => {
                if let Some(snapshot) = self.selected_snapshot() {
                    self.view.detail = Some(snapshot.clone());
                }
            }
            KeyCode::Char('a') => {
                if let Some(snapshot) = self.selected_snapshot() {
                    self.view.pending = Some(snapshot.clone());
                    self.start_input(InputMode::Quantity);
                }
            }
            KeyCode::Char('d') if self.on_portfolio_tab() => {
                if let Some(row) = self.view.table_state.selected() {
                    if let Some(symbol) = self.session.portfolio().symbols().get(row).cloned() {
                        self.session.portfolio_mut().remove(&symbol);
                        self.show_popup(&format!("Removed {}", symbol));
                        self.clamp_selection();
                    }
                }
            }
            KeyCode::Char('p') if self.on_portfolio_tab() => {
                if self.session.portfolio().is_empty() {
                    self.show_error_popup("Portfolio is empty. Add positions with 'a' first.");
                } else {
                    self.start_input(InputMode::Pac);
                }
            }
            KeyCode::Char('/') => self.start_input(InputMode::Lookup),
            _ => {}
        }

        Action::Continue
    }

    pub async fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.run_app(&mut terminal).await;

        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        result
    }

    fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        terminal.draw(|frame| ui::render(frame, &self.watchlist, &self.session, &mut self.view))?;
        Ok(())
    }

    async fn refresh_with_popup<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        self.show_popup("Updating prices...");
        self.draw(terminal)?;

        self.refresh().await;

        self.clear_popup();
        Ok(())
    }

    async fn run_app<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        loop {
            if self.refresh_due() {
                self.refresh_with_popup(terminal).await?;
            }

            self.draw(terminal)?;

            if !event::poll(POLL_INTERVAL)? {
                continue;
            }

            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                match self.handle_key(key.code) {
                    Action::Quit => return Ok(()),
                    Action::Refresh => self.refresh_with_popup(terminal).await?,
                    Action::Lookup(input) => {
                        self.show_popup(&format!("Looking up {}...", input.trim()));
                        self.draw(terminal)?;
                        self.lookup(&input).await;
                        self.clear_popup();
                    }
                    Action::Continue => {}
                }
            }
        }
    }
}

fn parse_amount(input: &str) -> Result<Decimal> {
    input
        .trim()
        .parse::<Decimal>()
        .map_err(|e| anyhow::anyhow!("Failed to parse amount '{}': {}", input.trim(), e))
}
