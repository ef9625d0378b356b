/// Pages checked when no URLs are supplied.
pub const DEFAULT_TARGETS: &[&str] = &[
    "https://www.dev.to",
    "https://www.reddit.com",
    "https://www.python.org",
    "https://www.wikipedia.org",
    "https://www.github.com",
];

pub fn default_targets() -> Vec<String> {
    DEFAULT_TARGETS.iter().map(|url| url.to_string()).collect()
}
