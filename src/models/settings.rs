use clap::ValueEnum;
use strum_macros::{Display, EnumIter, EnumString};

#[derive(Clone, Copy, Debug, Default, Display, EnumIter, EnumString, Eq, PartialEq, ValueEnum)]
pub enum HistoryRange {
    #[default]
    #[strum(serialize = "1y")]
    #[value(name = "1y")]
    OneYear,
    #[strum(serialize = "2y")]
    #[value(name = "2y")]
    TwoYears,
}

impl HistoryRange {
    pub fn as_query(&self) -> &str {
        match self {
            HistoryRange::OneYear => "1y",
            HistoryRange::TwoYears => "2y",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Display, EnumIter, EnumString, Eq, PartialEq, ValueEnum)]
#[strum(serialize_all = "lowercase")]
pub enum ScoringMethod {
    /// Weighted sum of the three trend flags.
    #[default]
    Linear,
    /// Logistic transform of the 20-bar z-score blended with the long trend.
    Logistic,
}

#[derive(Clone, Copy, Debug, Default, Display, EnumIter, EnumString, Eq, PartialEq, ValueEnum)]
#[strum(serialize_all = "lowercase")]
pub enum LevelsMethod {
    #[default]
    Std,
    Atr,
}

/// Knobs that change how a snapshot is derived from bars.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct AnalysisSettings {
    pub range: HistoryRange,
    pub scoring: ScoringMethod,
    pub levels: LevelsMethod,
}
