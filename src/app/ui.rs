use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs, Wrap},
};
use rust_decimal::Decimal;
use strum::IntoEnumIterator;

use crate::{
    app::{
        Session,
        app::{InputMode, ViewState},
        sort::{SortColumn, SortState},
    },
    models::{QuoteSnapshot, Watchlist},
};

const PORTFOLIO_TAB: &str = "Portfolio";

pub fn render(frame: &mut Frame, watchlist: &Watchlist, session: &Session, view: &mut ViewState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let title = Paragraph::new("Quant Terminal")
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, chunks[0]);

    render_spotlight(frame, chunks[1], &view.spotlight);

    let mut titles: Vec<String> = watchlist.labels().iter().map(|l| l.to_string()).collect();
    titles.push(PORTFOLIO_TAB.to_string());
    let tabs = Tabs::new(titles)
        .select(view.selected_tab)
        .block(Block::default().borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, chunks[2]);

    if view.selected_tab < watchlist.categories().len() {
        let label = watchlist.labels()[view.selected_tab].to_string();
        render_category(frame, chunks[3], &label, session.sort(), view);
    } else {
        render_portfolio(frame, chunks[3], session, view);
    }

    let help = Paragraph::new(
        "q quit | Tab switch | 1-6 sort | Enter details | a add | / lookup | d remove | p PAC | F5 refresh",
    )
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[4]);

    render_popups(frame, view);
}

fn render_spotlight(frame: &mut Frame, area: Rect, spotlight: &[QuoteSnapshot]) {
    if spotlight.is_empty() {
        let empty = Paragraph::new("Top opportunities unavailable")
            .style(Style::default().fg(Color::Yellow))
            .block(Block::default().title("Top 5").borders(Borders::ALL));
        frame.render_widget(empty, area);
        return;
    }

    let count = spotlight.len() as u32;
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, count); spotlight.len()])
        .split(area);

    for (snapshot, cell) in spotlight.iter().zip(cells.iter()) {
        let color = snapshot.color().to_color();
        let card = Paragraph::new(vec![
            Line::from(Span::styled(
                snapshot.score().to_string(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                snapshot.symbol().clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
        ])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        );
        frame.render_widget(card, *cell);
    }
}

fn header_label(column: SortColumn, sort: &SortState) -> String {
    if sort.column() != column {
        return column.to_string();
    }
    let arrow = if sort.ascending() { "^" } else { "v" };
    format!("{} {}", column, arrow)
}

fn flag_cell(label: &str, on: bool) -> Cell<'static> {
    let color = if on { Color::Green } else { Color::Red };
    Cell::from(label.to_string()).style(Style::default().fg(Color::White).bg(color))
}

fn render_category(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    sort: &SortState,
    view: &mut ViewState,
) {
    let snapshots = view
        .tables
        .get(view.selected_tab)
        .map(Vec::as_slice)
        .unwrap_or_default();

    if snapshots.is_empty() {
        let empty_message = Paragraph::new("No data available for this market.")
            .style(Style::default().fg(Color::Yellow))
            .block(Block::default().title(label.to_string()).borders(Borders::ALL));
        frame.render_widget(empty_message, area);
        return;
    }

    let header_cells = SortColumn::iter()
        .enumerate()
        .map(|(i, column)| format!("{} {}", i + 1, header_label(column, sort)))
        .chain(std::iter::once(String::from("Div.")))
        .map(|h| Cell::from(h).style(Style::default().fg(Color::Yellow)));
    let header = Row::new(header_cells).style(Style::default()).height(1);

    let rows: Vec<Row> = snapshots
        .iter()
        .map(|snapshot| {
            let score_style = Style::default()
                .fg(snapshot.color().to_color())
                .add_modifier(Modifier::BOLD);
            let flags = snapshot.flags();

            let cells = [
                Cell::from(snapshot.name().clone()),
                Cell::from(snapshot.score().to_string()).style(score_style),
                Cell::from(format_price(
                    *snapshot.price(),
                    snapshot.currency().as_deref(),
                    &view.currency,
                )),
                flag_cell("L", flags.long),
                flag_cell("M", flags.medium),
                flag_cell("B", flags.short),
                Cell::from(format_percent(*snapshot.dividend_yield())),
            ];

            Row::new(cells).height(1)
        })
        .collect();

    let widths = [
        Constraint::Length(32),
        Constraint::Length(12),
        Constraint::Length(14),
        Constraint::Length(6),
        Constraint::Length(6),
        Constraint::Length(6),
        Constraint::Length(10),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().title(label.to_string()).borders(Borders::ALL))
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    frame.render_stateful_widget(table, area, &mut view.table_state);
}

fn render_portfolio(frame: &mut Frame, area: Rect, session: &Session, view: &mut ViewState) {
    let portfolio = session.portfolio();

    if portfolio.is_empty() {
        let empty_message = Paragraph::new("Portfolio is empty. Add positions with 'a' on a market tab.")
            .style(Style::default().fg(Color::Yellow))
            .block(Block::default().title(PORTFOLIO_TAB).borders(Borders::ALL));
        frame.render_widget(empty_message, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(area);

    let header_cells = ["Name", "Symbol", "Quantity", "Price", "Value", "Weight"]
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow)));
    let header = Row::new(header_cells).style(Style::default()).height(1);

    let rows: Vec<Row> = portfolio
        .rows()
        .into_iter()
        .map(|row| {
            let cells = [
                Cell::from(row.name().clone()),
                Cell::from(row.symbol().clone()),
                Cell::from(format!("{:.2}", row.quantity())),
                Cell::from(format_money(&view.currency, *row.price())),
                Cell::from(format_money(&view.currency, *row.market_value())),
                Cell::from(format!("{:.2}%", row.weight_percent())),
            ];
            Row::new(cells).height(1)
        })
        .collect();

    let widths = [
        Constraint::Length(32),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Length(14),
        Constraint::Length(16),
        Constraint::Length(10),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().title(PORTFOLIO_TAB).borders(Borders::ALL))
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    frame.render_stateful_widget(table, chunks[0], &mut view.table_state);

    let total = Paragraph::new(format!(
        "Total capital: {}",
        format_money(&view.currency, portfolio.total_value())
    ))
    .style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(total, chunks[1]);
}

fn render_popups(frame: &mut Frame, view: &ViewState) {
    if let Some(detail) = &view.detail {
        render_detail(frame, detail, &view.currency);
    }

    if let Some(plan) = &view.pac_plan {
        let mut lines = vec![Line::from("Monthly contribution split:")];
        for allocation in plan {
            lines.push(Line::from(format!(
                "{:<12} {:>14}  {} units",
                allocation.symbol(),
                format_money(&view.currency, *allocation.amount()),
                allocation.units()
            )));
        }
        render_box(frame, "PAC", lines, Color::Cyan, 60, 40);
    }

    let prompt = match view.input_mode {
        InputMode::Normal => None,
        InputMode::Quantity => Some(format!(
            "Quantity for {}",
            view.pending.as_ref().map_or("", |s| s.symbol().as_str())
        )),
        InputMode::Pac => Some(String::from("Monthly amount")),
        InputMode::Lookup => Some(String::from("Symbol")),
    };
    if let Some(prompt) = prompt {
        let lines = vec![
            Line::from(prompt),
            Line::from(Span::styled(
                format!("> {}_", view.input),
                Style::default().fg(Color::Yellow),
            )),
        ];
        render_box(frame, "Input", lines, Color::Yellow, 40, 20);
    }

    if let Some(message) = &view.popup_message {
        render_box(frame, "Info", vec![Line::from(message.clone())], Color::Cyan, 40, 20);
    }

    if let Some(message) = &view.error_popup {
        render_box(
            frame,
            "Error (Enter to close)",
            vec![Line::from(message.clone())],
            Color::Red,
            60,
            25,
        );
    }
}

fn render_detail(frame: &mut Frame, snapshot: &QuoteSnapshot, currency: &str) {
    let indicators = snapshot.indicators();
    let mut lines = vec![
        Line::from(Span::styled(
            format!("{} ({})", snapshot.name(), snapshot.symbol()),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::raw("Score: "),
            Span::styled(
                snapshot.score().to_string(),
                Style::default()
                    .fg(snapshot.color().to_color())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("  {}", snapshot.color().hex())),
        ]),
        Line::from(format!(
            "Price: {}",
            format_price(*snapshot.price(), snapshot.currency().as_deref(), currency)
        )),
        Line::from(format!(
            "SMA 20/50/200: {} / {} / {}",
            format_opt(indicators.sma20),
            format_opt(indicators.sma50),
            format_opt(indicators.sma200)
        )),
        Line::from(format!("Dividends: {}", format_percent(*snapshot.dividend_yield()))),
        Line::from(format!("P/E: {}", format_opt(*snapshot.pe_ratio()))),
        Line::from(format!("Market cap: {}", format_market_cap(*snapshot.market_cap()))),
    ];

    if let Some(levels) = snapshot.levels() {
        lines.push(Line::from(format!("Entry: {:.2}", levels.entry)));
        lines.push(Line::from(Span::styled(
            format!("Take profit: {:.2}", levels.take_profit),
            Style::default().fg(Color::Green),
        )));
        lines.push(Line::from(Span::styled(
            format!("Stop loss: {:.2}", levels.stop_loss),
            Style::default().fg(Color::Red),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from("a add to portfolio | Esc close"));

    render_box(frame, "Details", lines, snapshot.color().to_color(), 50, 50);
}

fn render_box(
    frame: &mut Frame,
    title: &str,
    lines: Vec<Line>,
    color: Color,
    percent_x: u16,
    percent_y: u16,
) {
    let area = centered_rect(percent_x, percent_y, frame.area());
    let popup = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(title.to_string())
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        );
    frame.render_widget(Clear, area);
    frame.render_widget(popup, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

pub fn format_money(currency: &str, amount: Decimal) -> String {
    let sign = if amount < Decimal::ZERO { "-" } else { "" };
    let fixed = format!("{:.2}", amount.abs().round_dp(2));
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::new();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}{}{}.{}", sign, currency, grouped, frac_part)
}

/// Quote price in its listing currency, or with the configured symbol when
/// the provider did not report one.
pub fn format_price(price: f64, quote_currency: Option<&str>, fallback: &str) -> String {
    match quote_currency {
        Some(code) => format!("{:.2} {}", price, code),
        None => format!("{}{:.2}", fallback, price),
    }
}

pub fn format_percent(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}%", v),
        None => String::from("-"),
    }
}

/// Compact magnitude such as `2.94T` or `812.50M`.
pub fn format_market_cap(value: Option<u64>) -> String {
    let Some(cap) = value else {
        return String::from("-");
    };

    let cap = cap as f64;
    match cap {
        c if c >= 1e12 => format!("{:.2}T", c / 1e12),
        c if c >= 1e9 => format!("{:.2}B", c / 1e9),
        c if c >= 1e6 => format!("{:.2}M", c / 1e6),
        c => format!("{:.0}", c),
    }
}

fn format_opt(value: Option<f64>) -> String {
    value.map_or_else(|| String::from("-"), |v| format!("{:.2}", v))
}
