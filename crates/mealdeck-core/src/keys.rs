// ── Food cache key scheme ──
//
// ["food"]
// ├── ["food", "list"]
// │   ├── ["food", "list", <filters>]
// │   ├── ["food", "list", "search", <term>]
// │   └── ["food", "list", "advanced", <filters>]
// └── ["food", "detail"]
//     └── ["food", "detail", <id>]

use crate::cache::QueryKey;
use crate::filters::FoodFilters;

pub fn all() -> QueryKey {
    QueryKey::new(["food"])
}

pub fn lists() -> QueryKey {
    all().child("list")
}

pub fn list(filters: &FoodFilters) -> QueryKey {
    lists().child(filters.canonical())
}

pub fn search(term: &str) -> QueryKey {
    lists().child("search").child(term)
}

pub fn advanced(filters: &FoodFilters) -> QueryKey {
    lists().child("advanced").child(filters.canonical())
}

pub fn details() -> QueryKey {
    all().child("detail")
}

pub fn detail(id: &str) -> QueryKey {
    details().child(id)
}
