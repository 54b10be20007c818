use crate::{LinkError, LinkResult};
use std::borrow::Cow;
use std::fmt;
use url::Url;

/// Characters that only appear in article names produced by broken or
/// templated markup
const UNSAFE_CHARACTERS: &[char] = &['<', '>', '[', ']', '{', '}', '|', '\n'];

/// Canonical identifier of one article: `prefix + Article_Name`
///
/// The article name is percent-decoded and uses `_` as word joiner, so every
/// href denoting the same article produces an equal value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedLink {
    value: String,
    prefix_len: usize,
}

impl NormalizedLink {
    /// The canonical `prefix + name` string
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// The decoded article name without the prefix
    pub fn article_name(&self) -> &str {
        &self.value[self.prefix_len..]
    }

    /// Human-readable title derived from the article name
    pub fn display_title(&self) -> String {
        self.article_name().replace('_', " ")
    }

    /// An href that normalizes back to this link
    ///
    /// Characters that the normalizer would otherwise strip or decode again
    /// (`%`, `?`, `#`) are re-encoded.
    pub fn as_href(&self) -> String {
        let mut href = String::with_capacity(self.value.len());
        href.push_str(&self.value[..self.prefix_len]);
        for c in self.article_name().chars() {
            match c {
                '%' => href.push_str("%25"),
                '?' => href.push_str("%3F"),
                '#' => href.push_str("%23"),
                _ => href.push(c),
            }
        }
        href
    }

    /// Resolves this link against the site's base URL
    pub fn resolve(&self, base: &Url) -> Result<Url, url::ParseError> {
        base.join(&self.as_href())
    }
}

impl fmt::Display for NormalizedLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Normalizes a raw href into a canonical article link
///
/// # Normalization Steps
///
/// 1. Take the path of the href; reject it unless it starts with `prefix`
/// 2. Drop fragment and query
/// 3. Percent-decode the path (undecodable input is kept verbatim)
/// 4. Reject an empty article name
/// 5. Replace spaces with `_`
/// 6. Reject names containing `< > [ ] { } |` or a newline
///
/// # Examples
///
/// ```
/// use topic_digest::link::normalize_link;
///
/// let link = normalize_link("/wiki/Foo%20Bar#History", "/wiki/").unwrap();
/// assert_eq!(link.as_str(), "/wiki/Foo_Bar");
/// assert!(normalize_link("/not_wiki/Foo", "/wiki/").is_err());
/// ```
pub fn normalize_link(href: &str, prefix: &str) -> LinkResult<NormalizedLink> {
    let path = href_path(href);

    if !path.starts_with(prefix) {
        return Err(LinkError::OutsideArticlePath(path.into_owned()));
    }

    let decoded = match urlencoding::decode(&path) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => path.clone().into_owned(),
    };

    let article = decoded
        .strip_prefix(prefix)
        .ok_or_else(|| LinkError::OutsideArticlePath(decoded.clone()))?;

    if article.is_empty() {
        return Err(LinkError::EmptyArticle);
    }

    let article = article.replace(' ', "_");
    if article.contains(UNSAFE_CHARACTERS) {
        return Err(LinkError::UnsafeCharacters(article));
    }

    Ok(NormalizedLink {
        value: format!("{}{}", prefix, article),
        prefix_len: prefix.len(),
    })
}

/// Turns a seed given on the command line into an href
///
/// Article links and absolute URLs pass through; bare article names
/// (`Graph theory`) get the article prefix.
pub fn seed_href(seed: &str, prefix: &str) -> String {
    let seed = seed.trim();
    if seed.starts_with(prefix) || seed.contains("://") {
        seed.to_string()
    } else {
        format!("{}{}", prefix, seed.replace(' ', "_"))
    }
}

/// Extracts the path component of an absolute, protocol-relative or
/// relative href
fn href_path(href: &str) -> Cow<'_, str> {
    let href = href.trim();

    if href.starts_with("//") || href.contains("://") {
        let absolute = if href.starts_with("//") {
            Cow::Owned(format!("https:{}", href))
        } else {
            Cow::Borrowed(href)
        };
        return match Url::parse(&absolute) {
            Ok(url) => Cow::Owned(url.path().to_string()),
            Err(_) => Cow::Borrowed(""),
        };
    }

    let end = href.find(|c: char| c == '#' || c == '?').unwrap_or(href.len());
    Cow::Borrowed(&href[..end])
}
