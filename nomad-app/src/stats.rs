use serde::Serialize;

/// Counters shown on the profile page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileStats {
    pub upcoming_trips: usize,
    pub favorites: usize,
    pub reviews: usize,
    pub posts: usize,
}
