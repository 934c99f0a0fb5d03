use derive_getters::Getters;
use derive_new::new;
use rust_decimal::Decimal;

#[derive(Clone, Debug, Eq, Getters, PartialEq, new)]
pub struct PortfolioEntry {
    name: String,
    quantity: Decimal,
    price: Decimal,
}

impl PortfolioEntry {
    pub fn market_value(&self) -> Decimal {
        self.quantity * self.price
    }

    pub fn update_price(&mut self, price: Decimal) {
        self.price = price;
    }
}

/// One line of the portfolio table.
#[derive(Clone, Debug, Eq, Getters, PartialEq, new)]
pub struct PortfolioRow {
    symbol: String,
    name: String,
    quantity: Decimal,
    price: Decimal,
    market_value: Decimal,
    weight_percent: Decimal,
}

/// Share of a monthly contribution assigned to one holding.
#[derive(Clone, Debug, Eq, Getters, PartialEq, new)]
pub struct PacAllocation {
    symbol: String,
    amount: Decimal,
    units: Decimal,
}
