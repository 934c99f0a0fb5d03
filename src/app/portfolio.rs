use std::collections::BTreeMap;

use anyhow::{Error, Result};
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rust_decimal_macros::dec;

use crate::models::{PacAllocation, PortfolioEntry, PortfolioRow, QuoteSnapshot};

const CENT: Decimal = dec!(0.01);

/// Holdings keyed by ticker symbol for the lifetime of one session.
#[derive(Clone, Debug, Default)]
pub struct Portfolio {
    entries: BTreeMap<String, PortfolioEntry>,
}

impl Portfolio {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Inserts or overwrites the entry for `symbol`. A zero quantity removes it.
    pub fn add(&mut self, symbol: &str, name: &str, quantity: Decimal, price: Decimal) -> Result<()> {
        if quantity < Decimal::ZERO {
            return Err(Error::msg(format!(
                "Quantity for {} must not be negative, got {}",
                symbol, quantity
            )));
        }

        if quantity.is_zero() {
            self.entries.remove(symbol);
            return Ok(());
        }

        self.entries.insert(
            symbol.to_string(),
            PortfolioEntry::new(name.to_string(), quantity, price),
        );

        Ok(())
    }

    /// Same as [`Portfolio::add`] but takes the price straight from a snapshot.
    pub fn add_snapshot(&mut self, snapshot: &QuoteSnapshot, quantity: Decimal) -> Result<()> {
        let price = Decimal::from_f64(*snapshot.price())
            .ok_or_else(|| Error::msg(format!("Invalid price for {}", snapshot.symbol())))?
            .round_dp(2);

        self.add(snapshot.symbol(), snapshot.name(), quantity, price)
    }

    pub fn remove(&mut self, symbol: &str) -> Option<PortfolioEntry> {
        self.entries.remove(symbol)
    }

    pub fn get(&self, symbol: &str) -> Option<&PortfolioEntry> {
        self.entries.get(symbol)
    }

    pub fn symbols(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Updates the last known price of held symbols. Returns how many changed.
    pub fn refresh_prices(&mut self, snapshots: &[QuoteSnapshot]) -> usize {
        let mut updated = 0;

        for snapshot in snapshots {
            let Some(entry) = self.entries.get_mut(snapshot.symbol()) else {
                continue;
            };
            let Some(price) = Decimal::from_f64(*snapshot.price()) else {
                log::warn!("Ignoring non-finite price for {}", snapshot.symbol());
                continue;
            };

            let price = price.round_dp(2);
            if *entry.price() != price {
                entry.update_price(price);
                updated += 1;
            }
        }

        updated
    }

    pub fn total_value(&self) -> Decimal {
        self.entries
            .values()
            .fold(Decimal::ZERO, |sum, entry| sum + entry.market_value())
    }

    pub fn rows(&self) -> Vec<PortfolioRow> {
        let total = self.total_value();

        self.entries
            .iter()
            .map(|(symbol, entry)| {
                let value = entry.market_value();
                let weight = if total > Decimal::ZERO {
                    (value / total * Decimal::from(100)).round_dp(2)
                } else {
                    Decimal::ZERO
                };

                PortfolioRow::new(
                    symbol.clone(),
                    entry.name().clone(),
                    *entry.quantity(),
                    *entry.price(),
                    value,
                    weight,
                )
            })
            .collect()
    }

    /// Splits a monthly contribution across holdings by current value weight
    /// (equally when nothing has value). Shares are floored to cents and the
    /// leftover cents go to the largest remainders, so every amount is
    /// non-negative and the total equals `monthly_amount` rounded to cents.
    pub fn pac_plan(&self, monthly_amount: Decimal) -> Result<Vec<PacAllocation>> {
        let monthly_amount = monthly_amount.round_dp(2);
        if monthly_amount <= Decimal::ZERO {
            return Err(Error::msg("Monthly contribution must be positive"));
        }
        if self.entries.is_empty() {
            return Err(Error::msg("Portfolio is empty"));
        }

        let total = self.total_value();
        let count = Decimal::from(self.entries.len());

        let mut amounts: Vec<Decimal> = Vec::with_capacity(self.entries.len());
        let mut remainders: Vec<(usize, Decimal)> = Vec::with_capacity(self.entries.len());
        for (idx, entry) in self.entries.values().enumerate() {
            let share = if total > Decimal::ZERO {
                monthly_amount * entry.market_value() / total
            } else {
                monthly_amount / count
            };
            let floored = share.round_dp_with_strategy(2, RoundingStrategy::ToZero);
            amounts.push(floored);
            remainders.push((idx, share - floored));
        }

        let allotted: Decimal = amounts.iter().sum();
        let leftover_cents = ((monthly_amount - allotted) / CENT)
            .round()
            .to_usize()
            .unwrap_or(0);
        remainders.sort_by(|a, b| b.1.cmp(&a.1));
        for (idx, _) in remainders.iter().take(leftover_cents) {
            amounts[*idx] += CENT;
        }

        let plan = self
            .entries
            .iter()
            .zip(amounts)
            .map(|((symbol, entry), amount)| {
                let units = if *entry.price() > Decimal::ZERO {
                    (amount / *entry.price()).round_dp(4)
                } else {
                    Decimal::ZERO
                };
                PacAllocation::new(symbol.clone(), amount, units)
            })
            .collect();

        Ok(plan)
    }
}
