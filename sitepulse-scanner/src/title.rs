/// Title recorded when a page has no usable `<title>` element.
pub const NO_TITLE: &str = "No title found";

const TITLE_OPEN: &str = "<title>";
const TITLE_CLOSE: &str = "</title>";

/// Returns the text between the first `<title>` and the next `</title>`.
///
/// Markers are matched literally. A missing opening or closing marker yields [`NO_TITLE`].
pub fn extract_title(html: &str) -> String {
    html.split_once(TITLE_OPEN)
        .and_then(|(_, rest)| rest.split_once(TITLE_CLOSE))
        .map(|(title, _)| title.to_string())
        .unwrap_or_else(|| NO_TITLE.to_string())
}
