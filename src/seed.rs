use chrono::{DateTime, NaiveDate, Utc};

use crate::models::{Item, ItemStatus, ItemType, Role, User};

// Demo records for local runs. Ids are contiguous so the id counters resume at len + 1.

pub fn demo_users() -> Vec<User> {
    vec![
        User {
            id: "1".into(),
            name: "Admin User".into(),
            email: "admin@university.edu".into(),
            role: Role::Admin,
        },
        User {
            id: "2".into(),
            name: "John Student".into(),
            email: "john@university.edu".into(),
            role: Role::Student,
        },
        User {
            id: "3".into(),
            name: "Jane Student".into(),
            email: "jane@university.edu".into(),
            role: Role::Student,
        },
    ]
}

pub fn demo_items() -> Vec<Item> {
    vec![
        demo_item(
            1,
            ("2", "John Student"),
            "Blue Backpack",
            ItemType::Lost,
            "Navy blue backpack with a laptop sleeve and a keychain on the zipper.",
            "2025-03-10",
            "Library 2nd Floor",
            ItemStatus::Pending,
            None,
        ),
        demo_item(
            2,
            ("3", "Jane Student"),
            "Red Wallet",
            ItemType::Found,
            "Small red leather wallet, no cards inside.",
            "2025-03-11",
            "Student Union Cafeteria",
            ItemStatus::Verified,
            Some("1"),
        ),
        demo_item(
            3,
            ("2", "John Student"),
            "Calculator",
            ItemType::Lost,
            "TI-84 graphing calculator with initials on the back.",
            "2025-03-08",
            "Science Building Room 101",
            ItemStatus::Resolved,
            Some("1"),
        ),
        demo_item(
            4,
            ("3", "Jane Student"),
            "Silver Water Bottle",
            ItemType::Found,
            "Insulated bottle with stickers.",
            "2025-03-12",
            "Gym Locker Room",
            ItemStatus::Pending,
            None,
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn demo_item(
    id: u64,
    (user_id, user_name): (&str, &str),
    item_name: &str,
    item_type: ItemType,
    description: &str,
    date: &str,
    location: &str,
    status: ItemStatus,
    admin_id: Option<&str>,
) -> Item {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap_or_default();
    let created_at = date
        .and_hms_opt(12, 0, 0)
        .map(|dt| DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc))
        .unwrap_or_default();
    Item {
        id,
        user_id: user_id.into(),
        user_name: user_name.into(),
        item_name: item_name.into(),
        item_type,
        description: description.into(),
        date,
        location: location.into(),
        image_url: None,
        contact_info: format!(
            "{}@university.edu",
            user_name.split(' ').next().unwrap_or(user_name).to_lowercase()
        ),
        status,
        created_at,
        admin_id: admin_id.map(str::to_string),
    }
}
