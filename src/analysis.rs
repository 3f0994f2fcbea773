//! Downstream figures for the compiled tables: yearly pivots, inflation
//! adjustment, execution ratios and GDP shares.

use std::{collections::BTreeMap, path::Path};

use chrono::{Datelike, NaiveDate};
use csv::ReaderBuilder;
use serde::Deserialize;

use crate::error::{PipelineError, Result};
use crate::schema::{BudgetKind, Column, NormalizedRow};

/// Figures are published in pesos; summaries are in millions.
pub const MILLIONS: f64 = 1_000_000.0;

/// Marker shown when a ratio has no meaningful denominator.
pub const NOT_APPLICABLE: &str = "---";

/// `executed / approved` as a percentage, `None` when `approved` is
/// missing or zero.
pub fn execution_ratio(executed: Option<f64>, approved: Option<f64>) -> Option<f64> {
    let approved = approved.filter(|a| *a != 0.0)?;
    Some(executed? / approved * 100.0)
}

pub fn format_ratio(ratio: Option<f64>) -> String {
    match ratio {
        Some(r) => format!("{}%", group_thousands(r, 2)),
        None => NOT_APPLICABLE.to_string(),
    }
}

/// Short label for a figure in millions so it fits above a bar.
pub fn abbreviate(x: f64) -> String {
    if x >= 100_000.0 {
        format!("{}k", group_thousands(x / 1000.0, 0))
    } else if x >= 10_000.0 {
        format!("{}k", group_thousands(x / 1000.0, 1))
    } else {
        group_thousands(x, 0)
    }
}

/// `{:,.N}` style formatting: fixed decimals, comma thousands separator.
pub fn group_thousands(x: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, x.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if x < 0.0 && formatted.chars().any(|c| c != '0' && c != '.') {
        "-"
    } else {
        ""
    };
    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Which rows of a compiled table to aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Exact department name (after renaming).
    Department(String),
    /// Case-insensitive substring of the category description.
    DescriptionContains(String),
}

impl Selector {
    pub fn matches(&self, row: &NormalizedRow) -> bool {
        match self {
            Selector::Department(name) => row.department() == Some(name.as_str()),
            Selector::DescriptionContains(needle) => row
                .description()
                .map(|d| d.to_lowercase().contains(&needle.to_lowercase()))
                .unwrap_or(false),
        }
    }
}

/// Sum of `TOTAL` in millions per cycle and budget kind for the selected rows.
pub fn yearly_pivot(
    rows: &[NormalizedRow],
    selector: &Selector,
) -> BTreeMap<u16, BTreeMap<BudgetKind, f64>> {
    let mut pivot: BTreeMap<u16, BTreeMap<BudgetKind, f64>> = BTreeMap::new();
    for row in rows.iter().filter(|r| selector.matches(r)) {
        let (Some(cycle), Some(kind)) = (row.cycle(), row.budget_kind()) else {
            continue;
        };
        let total = row.figure(Column::Total).unwrap_or(0.0);
        *pivot.entry(cycle).or_default().entry(kind).or_default() += total / MILLIONS;
    }
    pivot
}

#[derive(Debug, Deserialize)]
struct CpiRecord {
    #[serde(rename = "Fecha")]
    date: NaiveDate,
    #[serde(rename = "IPC")]
    cpi: f64,
}

/// Consumer price index reduced to one value per year (its last
/// observation) and the overall latest value used as reference.
#[derive(Debug, Clone, PartialEq)]
pub struct InflationIndex {
    reference: f64,
    by_year: BTreeMap<u16, f64>,
}

impl InflationIndex {
    /// Observations must be in date order, as published.
    pub fn from_observations<I>(observations: I) -> Option<Self>
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        let mut by_year = BTreeMap::new();
        let mut reference = None;
        for (date, cpi) in observations {
            let year = u16::try_from(date.year()).ok()?;
            by_year.insert(year, cpi);
            reference = Some(cpi);
        }
        Some(Self {
            reference: reference?,
            by_year,
        })
    }

    /// Read a CSV with `Fecha` (YYYY-MM-DD) and `IPC` columns.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut rdr = ReaderBuilder::new().from_path(path)?;
        let mut observations = Vec::new();
        for record in rdr.deserialize::<CpiRecord>() {
            let record = record?;
            observations.push((record.date, record.cpi));
        }
        Self::from_observations(observations).ok_or_else(|| {
            PipelineError::Config(format!("{}: no CPI observations", path.display()))
        })
    }

    /// Multiplier converting `year` pesos into reference pesos.
    pub fn factor(&self, year: u16) -> Option<f64> {
        self.by_year
            .get(&year)
            .filter(|cpi| **cpi != 0.0)
            .map(|cpi| self.reference / cpi)
    }
}

/// Nominal GDP per year, in pesos.
#[derive(Debug, Clone, PartialEq)]
pub struct GdpTable {
    by_year: BTreeMap<u16, f64>,
}

impl GdpTable {
    /// Read a two-column CSV (year, GDP in millions of pesos).
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut rdr = ReaderBuilder::new().from_path(path)?;
        let mut by_year = BTreeMap::new();
        for record in rdr.records() {
            let record = record?;
            let parsed = (
                record.get(0).and_then(|y| y.trim().parse::<u16>().ok()),
                record.get(1).and_then(|v| v.trim().parse::<f64>().ok()),
            );
            match parsed {
                (Some(year), Some(gdp)) => {
                    by_year.insert(year, gdp * MILLIONS);
                }
                _ => {
                    return Err(PipelineError::Config(format!(
                        "{}: bad GDP row {:?}",
                        path.display(),
                        record
                    )))
                }
            }
        }
        Ok(Self { by_year })
    }

    /// `amount` as a percentage of that year's GDP.
    pub fn share(&self, year: u16, amount: f64) -> Option<f64> {
        let gdp = self.by_year.get(&year).copied().filter(|g| *g != 0.0)?;
        Some(amount / gdp * 100.0)
    }
}

/// Relative change between consecutive values, in percent. The first entry,
/// and any entry following a zero, is `None`.
pub fn pct_change(values: &[(u16, f64)]) -> Vec<(u16, Option<f64>)> {
    let mut out = Vec::with_capacity(values.len());
    let mut previous: Option<f64> = None;
    for &(year, value) in values {
        let change = previous.filter(|p| *p != 0.0).map(|p| (value - p) / p * 100.0);
        out.push((year, change));
        previous = Some(value);
    }
    out
}

/// Keep only cycles within `from..=to`; a missing bound is open.
pub fn retain_years<V>(pivot: &mut BTreeMap<u16, V>, from: Option<u16>, to: Option<u16>) {
    pivot.retain(|year, _| from.map_or(true, |f| *year >= f) && to.map_or(true, |t| *year <= t));
}

/// Year-over-year change of the executed amount, inflation adjusted where
/// the index covers the year. Years without an executed figure are left out
/// of the series.
pub fn executed_change(lines: &[YearSummary]) -> BTreeMap<u16, Option<f64>> {
    let series: Vec<(u16, f64)> = lines
        .iter()
        .filter_map(|l| Some((l.cycle, l.executed_adjusted.or(l.executed)?)))
        .collect();
    pct_change(&series).into_iter().collect()
}

/// One line of an approved-vs-executed comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct YearSummary {
    pub cycle: u16,
    pub approved: Option<f64>,
    pub executed: Option<f64>,
    pub approved_adjusted: Option<f64>,
    pub executed_adjusted: Option<f64>,
    pub ratio: Option<f64>,
}

/// Inflation-adjusted approved/executed amounts per year. Years missing from
/// the index keep nominal figures only.
pub fn summarize(
    pivot: &BTreeMap<u16, BTreeMap<BudgetKind, f64>>,
    index: Option<&InflationIndex>,
) -> Vec<YearSummary> {
    pivot
        .iter()
        .map(|(&cycle, kinds)| {
            let approved = kinds.get(&BudgetKind::Approved).copied();
            let executed = kinds.get(&BudgetKind::Executed).copied();
            let factor = index.and_then(|i| i.factor(cycle));
            let approved_adjusted = approved.zip(factor).map(|(a, f)| a * f);
            let executed_adjusted = executed.zip(factor).map(|(e, f)| e * f);
            YearSummary {
                cycle,
                approved,
                executed,
                approved_adjusted,
                executed_adjusted,
                ratio: execution_ratio(
                    executed_adjusted.or(executed),
                    approved_adjusted.or(approved),
                ),
            }
        })
        .collect()
}
