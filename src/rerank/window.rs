/// Splits `text` into word windows of `window` words starting every `stride` words.
///
/// Starts are `0, stride, 2 * stride, ...` below the word count; the last windows may be
/// shorter than `window`. Text without words yields no windows.
pub fn sliding_windows(text: &str, window: usize, stride: usize) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() || window == 0 {
        return Vec::new();
    }

    (0..words.len())
        .step_by(stride.max(1))
        .map(|start| words[start..(start + window).min(words.len())].join(" "))
        .collect()
}
