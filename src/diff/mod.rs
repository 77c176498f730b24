use similar::TextDiff;
use std::path::Path;

/// Render a unified diff between the original and migrated text.
///
/// Returns an empty string when nothing changed.
pub fn unified_diff(old: &str, new: &str, path: &Path) -> String {
    if old == new {
        return String::new();
    }

    let display = path.display().to_string();
    let old_header = format!("a/{}", display);
    let new_header = format!("b/{}", display);

    TextDiff::from_lines(old, new)
        .unified_diff()
        .context_radius(3)
        .header(&old_header, &new_header)
        .to_string()
}

/// Count of (removed, added) lines between two texts
pub fn change_counts(old: &str, new: &str) -> (usize, usize) {
    use similar::ChangeTag;

    TextDiff::from_lines(old, new)
        .iter_all_changes()
        .fold((0, 0), |(removed, added), change| match change.tag() {
            ChangeTag::Delete => (removed + 1, added),
            ChangeTag::Insert => (removed, added + 1),
            ChangeTag::Equal => (removed, added),
        })
}
