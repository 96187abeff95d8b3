//! Unread badge display rule.

/// Counts above this render as `"99+"`.
pub const BADGE_CAP: u64 = 99;

/// Label for an unread badge, or `None` when nothing should render.
pub fn badge_label(count: u64) -> Option<String> {
    match count {
        0 => None,
        n if n > BADGE_CAP => Some(format!("{BADGE_CAP}+")),
        n => Some(n.to_string()),
    }
}
