use serde::{
    Deserialize, Deserializer,
    de::{IntoDeserializer, value::StrDeserializer},
};

use crate::models::{AdminDashboardStats, Item, ItemStatus, ItemType};

/// ItemFilter
///
/// Query parameters accepted by every item listing endpoint. Unset fields, an empty
/// value and the literal `all` let everything through.
#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ItemFilter {
    /// Case-insensitive substring searched in the name, description and location.
    pub q: Option<String>,
    /// `lost`, `found` or `all`.
    #[serde(rename = "type", default, deserialize_with = "all_as_none")]
    pub item_type: Option<ItemType>,
    /// `pending`, `verified`, `resolved` or `all`.
    #[serde(default, deserialize_with = "all_as_none")]
    pub status: Option<ItemStatus>,
}

// The listing pages send `all` (or nothing) for "no filter".
fn all_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) if v.eq_ignore_ascii_case("all") => Ok(None),
        Some(v) => {
            let value: StrDeserializer<'_, D::Error> = v.into_deserializer();
            T::deserialize(value).map(Some)
        }
    }
}

/// SearchScope
///
/// Which fields the text query looks at. The moderation dashboard also matches on the
/// reporter's name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchScope {
    Listing,
    Moderation,
}

impl ItemFilter {
    pub fn matches(&self, item: &Item, scope: SearchScope) -> bool {
        if self.item_type.is_some_and(|t| t != item.item_type) {
            return false;
        }
        if self.status.is_some_and(|s| s != item.status) {
            return false;
        }
        match self.q.as_deref() {
            None | Some("") => true,
            Some(q) => {
                let needle = q.to_lowercase();
                let hit = |field: &str| field.to_lowercase().contains(&needle);
                hit(&item.item_name)
                    || hit(&item.description)
                    || hit(&item.location)
                    || (scope == SearchScope::Moderation && hit(&item.user_name))
            }
        }
    }
}

/// filter_items
///
/// All criteria are ANDed; the text query is an OR over fields. Keeps the source order.
pub fn filter_items(items: &[Item], filter: &ItemFilter, scope: SearchScope) -> Vec<Item> {
    items
        .iter()
        .filter(|item| filter.matches(item, scope))
        .cloned()
        .collect()
}

/// status_counts
///
/// Tallies for the admin dashboard. `total_users` is left for the caller to fill in.
pub fn status_counts(items: &[Item]) -> AdminDashboardStats {
    let mut stats = AdminDashboardStats {
        total_items: items.len(),
        ..AdminDashboardStats::default()
    };
    for item in items {
        match item.status {
            ItemStatus::Pending => stats.pending += 1,
            ItemStatus::Verified => stats.verified += 1,
            ItemStatus::Resolved => stats.resolved += 1,
        }
        match item.item_type {
            ItemType::Lost => stats.lost += 1,
            ItemType::Found => stats.found += 1,
        }
    }
    stats
}
