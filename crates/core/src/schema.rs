//! Explicit schema descriptors for the validated datasets.
//!
//! A schema lists the fields a dataset must carry, in order, with the
//! semantic kind each field is read as downstream. Extra columns are
//! always allowed; only absence is an error.

use crate::types::{ColumnType, DatasetKind, Table};
use serde::Serialize;
use std::collections::BTreeSet;

/// Column names referenced by the pipeline.
pub mod columns {
    pub const ID: &str = "ID";
    pub const NAME: &str = "name";
    pub const CATEGORY: &str = "category";
    pub const GENDER: &str = "gender";
    pub const FOLLOWER_COUNT: &str = "follower_count";
    pub const PLATFORM: &str = "platform";

    pub const INFLUENCER_ID: &str = "influencer_id";
    pub const DATE: &str = "date";
    pub const URL: &str = "URL";
    pub const CAPTION: &str = "caption";
    pub const REACH: &str = "reach";
    pub const LIKES: &str = "likes";
    pub const COMMENTS: &str = "comments";

    pub const SOURCE: &str = "source";
    pub const CAMPAIGN: &str = "campaign";
    pub const USER_ID: &str = "user_id";
    pub const PRODUCT: &str = "product";
    pub const ORDERS: &str = "orders";
    pub const REVENUE: &str = "revenue";

    pub const AD_SPEND: &str = "ad_spend";
    pub const ROAS: &str = "ROAS";
    pub const ROI: &str = "ROI";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Identifier used for grouping and joins.
    Key,
    Text,
    Integer,
    Number,
    Date,
}

impl FieldKind {
    /// Storage type forced on the column regardless of what its values
    /// look like. Other kinds are inferred from the data.
    pub fn pinned_type(self) -> Option<ColumnType> {
        match self {
            FieldKind::Text | FieldKind::Date => Some(ColumnType::Text),
            FieldKind::Key | FieldKind::Integer | FieldKind::Number => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

const fn field(name: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec { name, kind }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Schema {
    pub dataset: DatasetKind,
    pub fields: &'static [FieldSpec],
    /// Column names are trimmed before the required set is checked.
    pub trim_column_names: bool,
}

pub const INFLUENCER_SCHEMA: Schema = Schema {
    dataset: DatasetKind::Influencers,
    fields: &[
        field(columns::ID, FieldKind::Key),
        field(columns::NAME, FieldKind::Text),
        field(columns::CATEGORY, FieldKind::Text),
        field(columns::GENDER, FieldKind::Text),
        field(columns::FOLLOWER_COUNT, FieldKind::Integer),
        field(columns::PLATFORM, FieldKind::Text),
    ],
    trim_column_names: false,
};

pub const POST_SCHEMA: Schema = Schema {
    dataset: DatasetKind::Posts,
    fields: &[
        field(columns::INFLUENCER_ID, FieldKind::Key),
        field(columns::PLATFORM, FieldKind::Text),
        field(columns::DATE, FieldKind::Date),
        field(columns::URL, FieldKind::Text),
        field(columns::CAPTION, FieldKind::Text),
        field(columns::REACH, FieldKind::Integer),
        field(columns::LIKES, FieldKind::Integer),
        field(columns::COMMENTS, FieldKind::Integer),
    ],
    trim_column_names: true,
};

pub const TRACKING_SCHEMA: Schema = Schema {
    dataset: DatasetKind::Tracking,
    fields: &[
        field(columns::SOURCE, FieldKind::Text),
        field(columns::CAMPAIGN, FieldKind::Text),
        field(columns::INFLUENCER_ID, FieldKind::Key),
        field(columns::USER_ID, FieldKind::Text),
        field(columns::PRODUCT, FieldKind::Text),
        field(columns::DATE, FieldKind::Date),
        field(columns::ORDERS, FieldKind::Integer),
        field(columns::REVENUE, FieldKind::Number),
    ],
    trim_column_names: true,
};

impl Schema {
    /// Schema enforced for a dataset. Payouts pass through unchecked.
    pub fn for_dataset(kind: DatasetKind) -> Option<&'static Schema> {
        match kind {
            DatasetKind::Influencers => Some(&INFLUENCER_SCHEMA),
            DatasetKind::Posts => Some(&POST_SCHEMA),
            DatasetKind::Tracking => Some(&TRACKING_SCHEMA),
            DatasetKind::Payouts => None,
        }
    }

    pub fn required_columns(&self) -> impl Iterator<Item = &'static str> {
        self.fields.iter().map(|f| f.name)
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Required columns the table does not carry.
    pub fn missing_columns(&self, table: &Table) -> BTreeSet<String> {
        self.required_columns()
            .filter(|name| !table.has_column(name))
            .map(str::to_string)
            .collect()
    }
}
