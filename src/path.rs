/// Characters replaced by `_` in prim path segments.
const REPLACED: [char; 6] = ['.', '-', '<', '>', '[', ']'];

/// Normalize an arbitrary name into something usable as a prim path.
///
/// Spaces are removed, `.`, `-`, `<`, `>`, `[` and `]` become `_`, and a
/// leading digit gets an `_` prefix. Uniqueness is the caller's concern.
pub fn valid_path(path: &str) -> String {
    let mut result: String = path
        .chars()
        .filter(|c| *c != ' ')
        .map(|c| if REPLACED.contains(&c) { '_' } else { c })
        .collect();

    if result.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        result.insert(0, '_');
    }
    result
}
