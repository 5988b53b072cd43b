use uuid::Uuid;

/// Time-ordered identifier with an optional tag in front (`BK…`, `REV…`).
pub fn new_id(prefix: &str) -> String {
    format!("{}{}", prefix, Uuid::now_v7().simple())
}
