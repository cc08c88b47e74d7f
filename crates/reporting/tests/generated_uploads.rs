//! Properties of the pipeline and CSV export over generated uploads.

use influence_analytics::loader::parse_csv;
use influence_analytics::{compute, DatasetUploads, FilterSelection, Selection};
use influence_core::config::MetricsConfig;
use influence_core::DatasetKind;
use influence_reporting::to_csv_string;
use proptest::prelude::*;
use proptest::sample::select;
use std::fmt::Write;

static CATEGORIES: [&str; 3] = ["fitness", "nutrition", "lifestyle"];
static PLATFORMS: [&str; 3] = ["Instagram", "YouTube", "Twitter"];
static CAMPAIGNS: [&str; 3] = ["spring_push", "creator_week", "launch"];
// Numeric-looking brand names sit next to plain ones.
static BRANDS: [&str; 6] = ["MuscleBlaze", "HKVitals", "Gritzo", "007", "Infinity", "12.5"];

const POSTS: &str = "influencer_id,platform,date,URL,caption,reach,likes,comments\n\
                     1,Instagram,2025-03-01,https://instagram.com/p/a1,\"Leg day, again\",15000,1200,85\n";
const PAYOUTS: &str = "influencer_id,basis,total_payout\n1,post,7500\n";

fn influencers_csv() -> impl Strategy<Value = String> {
    prop::collection::vec((select(&CATEGORIES[..]), select(&PLATFORMS[..])), 1..7).prop_map(|rows| {
        let mut csv = String::from("ID,name,category,gender,follower_count,platform\n");
        for (idx, (category, platform)) in rows.into_iter().enumerate() {
            let id = idx + 1;
            writeln!(csv, "{id},Creator {id},{category},F,{},{platform}", id * 1000).unwrap();
        }
        csv
    })
}

fn tracking_row() -> impl Strategy<Value = String> {
    (
        prop_oneof!["[a-z]{2,8}", Just("\"ig, stories\"".to_string())],
        select(&CAMPAIGNS[..]),
        prop_oneof![
            4 => (1i64..=8).prop_map(|id| id.to_string()),
            1 => Just(String::new()),
        ],
        prop_oneof![
            "u[0-9]{1,4}",
            "0[0-9]{1,3}",
            (0i64..1000).prop_map(|n| n.to_string()),
        ],
        select(&BRANDS[..]),
        "2025-0[1-9]-[12][0-9]",
        prop_oneof![
            4 => (0i64..20).prop_map(|n| n.to_string()),
            1 => Just(String::new()),
        ],
        prop_oneof![
            (0i64..5000).prop_map(|n| n.to_string()),
            (0.0f64..5000.0).prop_map(|v| v.to_string()),
            Just("NaN".to_string()),
            Just("inf".to_string()),
            Just(String::new()),
        ],
    )
        .prop_map(|(source, campaign, influencer_id, user_id, product, date, orders, revenue)| {
            format!("{source},{campaign},{influencer_id},{user_id},{product},{date},{orders},{revenue}")
        })
}

fn tracking_csv() -> impl Strategy<Value = String> {
    prop::collection::vec(tracking_row(), 0..25).prop_map(|rows| {
        let mut csv =
            String::from("source,campaign,influencer_id,user_id, product ,date,orders,revenue\n");
        for row in rows {
            writeln!(csv, "{row}").unwrap();
        }
        csv
    })
}

fn selection(values: &'static [&'static str]) -> impl Strategy<Value = Selection> {
    prop_oneof![
        Just(Selection::All),
        prop::collection::vec(select(values), 0..4).prop_map(Selection::only),
    ]
}

fn filter_selection() -> impl Strategy<Value = FilterSelection> {
    (selection(&CATEGORIES), selection(&PLATFORMS), selection(&BRANDS)).prop_map(
        |(categories, platforms, brands)| FilterSelection {
            categories,
            platforms,
            brands,
        },
    )
}

fn metrics() -> impl Strategy<Value = MetricsConfig> {
    prop_oneof![
        Just(50.0),
        (0u32..200).prop_map(f64::from),
        0.0f64..200.0,
    ]
    .prop_map(|ad_spend_rate| MetricsConfig {
        ad_spend_rate,
        ..MetricsConfig::default()
    })
}

fn uploads(influencers: &str, tracking: &str) -> DatasetUploads {
    DatasetUploads {
        influencers: Some(parse_csv(DatasetKind::Influencers, influencers.as_bytes()).unwrap()),
        posts: Some(parse_csv(DatasetKind::Posts, POSTS.as_bytes()).unwrap()),
        tracking: Some(parse_csv(DatasetKind::Tracking, tracking.as_bytes()).unwrap()),
        payouts: Some(parse_csv(DatasetKind::Payouts, PAYOUTS.as_bytes()).unwrap()),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn test_exported_tracking_reloads_unchanged(
        influencers in influencers_csv(),
        tracking in tracking_csv(),
        selection in filter_selection(),
        metrics in metrics(),
    ) {
        let results = compute(uploads(&influencers, &tracking), &selection, &metrics).unwrap();
        let csv = to_csv_string(&results.filtered_tracking).unwrap();
        let reloaded = parse_csv(DatasetKind::Tracking, csv.as_bytes()).unwrap();

        prop_assert_eq!(reloaded.columns(), results.filtered_tracking.columns());
        prop_assert_eq!(reloaded, results.filtered_tracking);
    }

    #[test]
    fn test_identical_inputs_give_identical_results(
        influencers in influencers_csv(),
        tracking in tracking_csv(),
        selection in filter_selection(),
        metrics in metrics(),
    ) {
        let first = compute(uploads(&influencers, &tracking), &selection, &metrics).unwrap();
        let second = compute(uploads(&influencers, &tracking), &selection, &metrics).unwrap();
        prop_assert_eq!(first, second);
    }
}
