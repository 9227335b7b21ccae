/// Scrub invisible characters the legacy sheet leaks into exported text and
/// collapse runs of whitespace. Case is preserved; measures are display names.
pub(crate) fn clean_text(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}
