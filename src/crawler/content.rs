/// Collapses whitespace runs to single spaces and keeps at most `limit` characters
///
/// Truncation counts Unicode scalar values, so multi-byte text is never split in
/// the middle of a character.
pub fn clean_text(text: &str, limit: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= limit {
        collapsed
    } else {
        collapsed.chars().take(limit).collect()
    }
}
