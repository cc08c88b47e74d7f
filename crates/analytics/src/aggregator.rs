//! Aggregator: group-by sums and means, derived spend metrics, and the
//! ranked insight lists.
//!
//! Every function here is total: missing values (null, non-numeric text,
//! NaN) are skipped by sums and means, while infinities propagate. Groups
//! come out in first-encounter order of their key and rows with a null key
//! form no group.

use influence_core::{columns, Cell, Table};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

// ─── Types ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub key: Cell,
    pub value: Cell,
}

/// Key → single metric, in ranked order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    pub key_column: String,
    pub metric: String,
    pub entries: Vec<RankedEntry>,
}

impl Ranking {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> Vec<&Cell> {
        self.entries.iter().map(|e| &e.key).collect()
    }
}

/// Headline numbers shown above the tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardOverview {
    pub total_influencers: usize,
    pub total_posts: usize,
    pub total_revenue: Cell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Ascending,
    Descending,
}

struct Group {
    key: Cell,
    rows: Vec<usize>,
}

// ─── Grouping primitives ────────────────────────────────────────────────────

fn group_by(table: &Table, key_column: &str) -> Vec<Group> {
    let mut groups: Vec<Group> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for (row_idx, row) in table.iter().enumerate() {
        let cell = row.get(key_column);
        let Some(key) = cell.key() else { continue };
        let slot = *index.entry(key).or_insert_with(|| {
            groups.push(Group {
                key: cell.clone(),
                rows: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].rows.push(row_idx);
    }

    groups
}

fn cells_of<'a>(table: &'a Table, rows: &'a [usize], column: &str) -> impl Iterator<Item = &'a Cell> {
    let idx = table.column_index(column);
    rows.iter().map(move |&r| match idx {
        Some(idx) => &table.rows()[r][idx],
        None => &NULL,
    })
}

static NULL: Cell = Cell::Null;

/// Sum that stays integer while every contribution is an integer.
pub fn sum_cells<'a>(cells: impl IntoIterator<Item = &'a Cell>) -> Cell {
    cells.into_iter().fold(Cell::Int(0), |acc, cell| match (acc, cell) {
        (Cell::Int(a), Cell::Int(b)) => a
            .checked_add(*b)
            .map_or_else(|| Cell::Float(a as f64 + *b as f64), Cell::Int),
        (acc, cell) => match cell.numeric_value() {
            Some(value) => Cell::Float(acc.as_f64().unwrap_or(0.0) + value),
            None => acc,
        },
    })
}

/// Mean over present values; NaN when there are none.
pub fn mean_cells<'a>(cells: impl IntoIterator<Item = &'a Cell>) -> f64 {
    let (total, count) = cells
        .into_iter()
        .filter_map(Cell::numeric_value)
        .fold((0.0, 0usize), |(total, count), value| (total + value, count + 1));
    if count == 0 {
        f64::NAN
    } else {
        total / count as f64
    }
}

fn grouped_table<F>(table: &Table, key_column: &str, metrics: &[&str], reduce: F) -> Table
where
    F: Fn(&Table, &[usize], &str) -> Cell,
{
    let mut out = Table::new(
        std::iter::once(key_column)
            .chain(metrics.iter().copied())
            .map(str::to_string)
            .collect(),
    );
    for group in group_by(table, key_column) {
        let mut row = Vec::with_capacity(metrics.len() + 1);
        row.push(group.key);
        row.extend(
            metrics
                .iter()
                .map(|&metric| reduce(table, group.rows.as_slice(), metric)),
        );
        out.push_row(row);
    }
    out
}

fn grouped_sums(table: &Table, key_column: &str, metrics: &[&str]) -> Table {
    grouped_table(table, key_column, metrics, |t, rows, metric| {
        sum_cells(cells_of(t, rows, metric))
    })
}

fn grouped_means(table: &Table, key_column: &str, metrics: &[&str]) -> Table {
    grouped_table(table, key_column, metrics, |t, rows, metric| {
        Cell::Float(mean_cells(cells_of(t, rows, metric)))
    })
}

/// NaN sorts last whichever way the ranking runs.
fn compare_metric(a: &Cell, b: &Cell, direction: Direction) -> Ordering {
    let a = a.as_f64().unwrap_or(f64::NAN);
    let b = b.as_f64().unwrap_or(f64::NAN);
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let ord = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
            match direction {
                Direction::Ascending => ord,
                Direction::Descending => ord.reverse(),
            }
        }
    }
}

fn rank(
    table: &Table,
    key_column: &str,
    metric: &str,
    direction: Direction,
    limit: Option<usize>,
) -> Ranking {
    let mut entries: Vec<RankedEntry> = table
        .iter()
        .map(|row| RankedEntry {
            key: row.cells()[0].clone(),
            value: row.cells()[1].clone(),
        })
        .collect();
    // Stable: equal metrics keep group order.
    entries.sort_by(|a, b| compare_metric(&a.value, &b.value, direction));
    if let Some(limit) = limit {
        entries.truncate(limit);
    }
    Ranking {
        key_column: key_column.to_string(),
        metric: metric.to_string(),
        entries,
    }
}

// ─── Dashboard aggregations ─────────────────────────────────────────────────

/// Reach, likes, and comments summed per influencer.
pub fn post_performance(posts: &Table) -> Table {
    grouped_sums(
        posts,
        columns::INFLUENCER_ID,
        &[columns::REACH, columns::LIKES, columns::COMMENTS],
    )
}

/// Orders and revenue summed per influencer over the unfiltered tracking table.
pub fn influencer_performance(tracking: &Table) -> Table {
    grouped_sums(tracking, columns::INFLUENCER_ID, &[columns::ORDERS, columns::REVENUE])
}

/// Add `ad_spend = orders * rate`, `ROAS = revenue / ad_spend`, and
/// `ROI = (revenue - ad_spend) / ad_spend` to every row. Zero spend yields
/// infinite or NaN ratios; rows missing orders or revenue get nulls.
/// Integer orders at a whole-number rate give an integer spend.
pub fn derive_metrics(tracking: &Table, ad_spend_rate: f64) -> Table {
    let whole_rate = (ad_spend_rate.fract() == 0.0 && ad_spend_rate.abs() < 9.007_199_254_740_992e15)
        .then_some(ad_spend_rate as i64);

    let mut ad_spend = Vec::with_capacity(tracking.len());
    let mut roas = Vec::with_capacity(tracking.len());
    let mut roi = Vec::with_capacity(tracking.len());

    for row in tracking.iter() {
        let orders_cell = row.get(columns::ORDERS);
        let Some(orders) = orders_cell.as_f64() else {
            ad_spend.push(Cell::Null);
            roas.push(Cell::Null);
            roi.push(Cell::Null);
            continue;
        };

        let spend = orders * ad_spend_rate;
        let spend_cell = match (orders_cell, whole_rate) {
            (Cell::Int(orders), Some(rate)) => orders.checked_mul(rate).map(Cell::Int),
            _ => None,
        };
        ad_spend.push(spend_cell.unwrap_or(Cell::Float(spend)));

        match row.get(columns::REVENUE).as_f64() {
            Some(revenue) => {
                roas.push(Cell::Float(revenue / spend));
                roi.push(Cell::Float((revenue - spend) / spend));
            }
            None => {
                roas.push(Cell::Null);
                roi.push(Cell::Null);
            }
        }
    }

    tracking
        .clone()
        .with_column(columns::AD_SPEND, ad_spend)
        .with_column(columns::ROAS, roas)
        .with_column(columns::ROI, roi)
}

/// Mean ROAS and ROI per campaign.
pub fn campaign_roi_summary(tracking: &Table) -> Table {
    grouped_means(tracking, columns::CAMPAIGN, &[columns::ROAS, columns::ROI])
}

/// Influencers ranked by summed revenue, highest first.
pub fn top_influencers_by_revenue(filtered_tracking: &Table, limit: usize) -> Ranking {
    let sums = grouped_sums(filtered_tracking, columns::INFLUENCER_ID, &[columns::REVENUE]);
    rank(
        &sums,
        columns::INFLUENCER_ID,
        columns::REVENUE,
        Direction::Descending,
        Some(limit),
    )
}

/// Mean revenue per influencer category, highest first. Inner join on
/// `influencer_id = ID`: tracking rows without a matching influencer are
/// dropped before averaging.
pub fn best_personas_by_category(filtered_tracking: &Table, influencers: &Table) -> Ranking {
    let mut categories_by_id: HashMap<String, Vec<&Cell>> = HashMap::new();
    for row in influencers.iter() {
        if let Some(id) = row.get(columns::ID).key() {
            categories_by_id
                .entry(id)
                .or_default()
                .push(row.get(columns::CATEGORY));
        }
    }

    let mut joined = Table::new(vec![columns::CATEGORY.to_string(), columns::REVENUE.to_string()]);
    for row in filtered_tracking.iter() {
        let Some(id) = row.get(columns::INFLUENCER_ID).key() else {
            continue;
        };
        let Some(categories) = categories_by_id.get(&id) else {
            continue;
        };
        for category in categories {
            joined.push_row(vec![(*category).clone(), row.get(columns::REVENUE).clone()]);
        }
    }

    let means = grouped_means(&joined, columns::CATEGORY, &[columns::REVENUE]);
    rank(
        &means,
        columns::CATEGORY,
        columns::REVENUE,
        Direction::Descending,
        None,
    )
}

/// Influencers ranked by mean ROAS, lowest first. `None` when the table
/// carries no `ROAS` column, i.e. derived metrics were never computed.
pub fn worst_roas_influencers(filtered_tracking: &Table, limit: usize) -> Option<Ranking> {
    if !filtered_tracking.has_column(columns::ROAS) {
        return None;
    }
    let means = grouped_means(filtered_tracking, columns::INFLUENCER_ID, &[columns::ROAS]);
    Some(rank(
        &means,
        columns::INFLUENCER_ID,
        columns::ROAS,
        Direction::Ascending,
        Some(limit),
    ))
}

pub fn overview(filtered_influencers: &Table, posts: &Table, filtered_tracking: &Table) -> DashboardOverview {
    DashboardOverview {
        total_influencers: filtered_influencers.len(),
        total_posts: posts.len(),
        total_revenue: sum_cells(filtered_tracking.column(columns::REVENUE)),
    }
}
