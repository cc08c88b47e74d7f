//! Filter engine: narrows the influencer and tracking tables by the
//! category, platform, and brand selections.

use influence_core::{columns, Cell, Table};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use tracing::debug;

/// Inclusion set for one filter dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode", content = "values")]
pub enum Selection {
    /// Every observed value, the unfiltered default.
    #[default]
    All,
    /// Only these values. An empty set matches nothing.
    Only(BTreeSet<String>),
}

impl Selection {
    pub fn only<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Selection::Only(values.into_iter().map(Into::into).collect())
    }

    pub fn includes(&self, cell: &Cell) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(values) => cell.key().is_some_and(|key| values.contains(&key)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    #[serde(default)]
    pub categories: Selection,
    #[serde(default)]
    pub platforms: Selection,
    #[serde(default)]
    pub brands: Selection,
}

/// Values offered for each multi-select, in first-encounter order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub categories: Vec<Cell>,
    pub platforms: Vec<Cell>,
    pub brands: Vec<Cell>,
}

impl FilterOptions {
    pub fn observe(influencers: &Table, tracking: &Table) -> Self {
        Self {
            categories: influencers.distinct(columns::CATEGORY),
            platforms: influencers.distinct(columns::PLATFORM),
            brands: tracking.distinct(columns::PRODUCT),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilteredViews {
    pub influencers: Table,
    pub tracking: Table,
}

/// Influencers matching category AND platform; tracking rows matching brand
/// AND belonging to one of those influencers. Sources are left untouched.
pub fn apply(influencers: &Table, tracking: &Table, selection: &FilterSelection) -> FilteredViews {
    let filtered_influencers = influencers.filter(|row| {
        selection.categories.includes(row.get(columns::CATEGORY))
            && selection.platforms.includes(row.get(columns::PLATFORM))
    });

    let ids: HashSet<String> = filtered_influencers
        .column(columns::ID)
        .into_iter()
        .filter_map(Cell::key)
        .collect();

    let filtered_tracking = tracking.filter(|row| {
        selection.brands.includes(row.get(columns::PRODUCT))
            && row
                .get(columns::INFLUENCER_ID)
                .key()
                .is_some_and(|id| ids.contains(&id))
    });

    debug!(
        influencers = filtered_influencers.len(),
        tracking = filtered_tracking.len(),
        "Filters applied"
    );

    FilteredViews {
        influencers: filtered_influencers,
        tracking: filtered_tracking,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::parse_csv;
    use influence_core::DatasetKind;

    fn influencers() -> Table {
        Table::with_rows(
            vec!["ID".into(), "category".into(), "platform".into()],
            vec![
                vec![Cell::Int(1), "fitness".into(), "Instagram".into()],
                vec![Cell::Int(2), "fitness".into(), "YouTube".into()],
                vec![Cell::Int(3), "nutrition".into(), "Instagram".into()],
            ],
        )
    }

    fn tracking() -> Table {
        Table::with_rows(
            vec!["influencer_id".into(), "product".into(), "revenue".into()],
            vec![
                vec![Cell::Int(1), "MuscleBlaze".into(), Cell::Int(100)],
                vec![Cell::Int(2), "HKVitals".into(), Cell::Int(200)],
                vec![Cell::Int(3), "MuscleBlaze".into(), Cell::Int(300)],
                vec![Cell::Int(9), "MuscleBlaze".into(), Cell::Int(400)],
            ],
        )
    }

    #[test]
    fn test_default_selection_keeps_known_influencers() {
        let views = apply(&influencers(), &tracking(), &FilterSelection::default());
        assert_eq!(views.influencers, influencers());
        // Influencer 9 is unknown, so its row falls out.
        assert_eq!(views.tracking.len(), 3);
    }

    #[test]
    fn test_dimensions_combine_with_and() {
        let selection = FilterSelection {
            categories: Selection::only(["fitness"]),
            platforms: Selection::only(["Instagram"]),
            ..Default::default()
        };
        let views = apply(&influencers(), &tracking(), &selection);
        assert_eq!(views.influencers.len(), 1);
        assert_eq!(views.influencers.rows()[0][0], Cell::Int(1));
        assert_eq!(views.tracking.column("revenue"), vec![&Cell::Int(100)]);
    }

    #[test]
    fn test_brand_filter_applies_to_tracking() {
        let selection = FilterSelection {
            brands: Selection::only(["HKVitals"]),
            ..Default::default()
        };
        let views = apply(&influencers(), &tracking(), &selection);
        assert_eq!(views.influencers.len(), 3);
        assert_eq!(views.tracking.column("revenue"), vec![&Cell::Int(200)]);
    }

    #[test]
    fn test_empty_selection_yields_empty_tables() {
        let selection = FilterSelection {
            categories: Selection::only(Vec::<String>::new()),
            ..Default::default()
        };
        let views = apply(&influencers(), &tracking(), &selection);
        assert!(views.influencers.is_empty());
        assert!(views.tracking.is_empty());
        assert_eq!(views.tracking.columns(), tracking().columns());
    }

    #[test]
    fn test_options_observed_in_encounter_order() {
        let options = FilterOptions::observe(&influencers(), &tracking());
        assert_eq!(options.categories, vec![Cell::from("fitness"), Cell::from("nutrition")]);
        assert_eq!(options.platforms, vec![Cell::from("Instagram"), Cell::from("YouTube")]);
        assert_eq!(options.brands, vec![Cell::from("MuscleBlaze"), Cell::from("HKVitals")]);
    }

    #[test]
    fn test_numeric_looking_brands_match_as_uploaded() {
        let data = "source,campaign,influencer_id,user_id,product,date,orders,revenue\n\
                    ig,launch,1,u1,007,2025-01-03,2,150\n\
                    ig,launch,2,u2,Infinity,2025-01-04,1,60\n\
                    yt,launch,3,u3,Gritzo,2025-01-05,1,75\n";
        let tracking = parse_csv(DatasetKind::Tracking, data.as_bytes()).unwrap();

        let options = FilterOptions::observe(&influencers(), &tracking);
        assert_eq!(
            options.brands,
            vec![Cell::from("007"), Cell::from("Infinity"), Cell::from("Gritzo")]
        );

        for (brand, revenue) in [("007", 150), ("Infinity", 60), ("Gritzo", 75)] {
            let selection = FilterSelection {
                brands: Selection::only([brand]),
                ..Default::default()
            };
            let views = apply(&influencers(), &tracking, &selection);
            assert_eq!(views.tracking.column("revenue"), vec![&Cell::Int(revenue)], "brand {brand}");
        }
    }
}
