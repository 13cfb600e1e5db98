//! src/util/location.rs
//! ============================================================================
//! Page location abstraction used for query <-> URL synchronization.
//!
//! Only the query-string part is interpreted. Rewrites happen in place, the
//! way `history.replaceState` would, so no history entry is ever produced.

use std::fmt;

use tracing::trace;

/// Read/replace access to the current page location.
pub trait Location: Send {
    /// Decoded value of the first parameter called `name`.
    fn query_param(&self, name: &str) -> Option<String>;

    /// Replace (or with `None` remove) a parameter without navigating.
    fn replace_query_param(&mut self, name: &str, value: Option<&str>);

    /// Full location as it would appear in the address bar.
    fn href(&self) -> String;
}

/// In-memory page location: `path?query#fragment`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLocation {
    path: String,
    params: Vec<(String, String)>,
    fragment: Option<String>,
}

impl PageLocation {
    /// Parse an href such as `/docs/intro?query=install#top`.
    #[must_use]
    pub fn parse(href: &str) -> Self {
        let (rest, fragment) = match href.split_once('#') {
            Some((rest, frag)) => (rest, Some(frag.to_string())),
            None => (href, None),
        };

        let (path, query) = match rest.split_once('?') {
            Some((path, query)) => (path, query),
            None => (rest, ""),
        };

        let params = query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
                (decode_component(k), decode_component(v))
            })
            .collect();

        Self {
            path: path.to_string(),
            params,
            fragment,
        }
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl Location for PageLocation {
    fn query_param(&self, name: &str) -> Option<String> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
    }

    fn replace_query_param(&mut self, name: &str, value: Option<&str>) {
        match value {
            Some(v) => {
                if let Some(slot) = self.params.iter_mut().find(|(k, _)| k == name) {
                    slot.1 = v.to_string();
                } else {
                    self.params.push((name.to_string(), v.to_string()));
                }
                self.params.retain({
                    let mut seen = false;
                    move |(k, _)| {
                        if k != name {
                            return true;
                        }
                        let keep = !seen;
                        seen = true;
                        keep
                    }
                });
            }
            None => self.params.retain(|(k, _)| k != name),
        }
        trace!("location rewritten: {}", self);
    }

    fn href(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PageLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)?;
        for (i, (k, v)) in self.params.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{sep}{}={}", urlencoding::encode(k), urlencoding::encode(v))?;
        }
        if let Some(frag) = &self.fragment {
            write!(f, "#{frag}")?;
        }
        Ok(())
    }
}

/// Form-style decoding: `+` is a space, invalid escapes are kept verbatim.
fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|s| s.into_owned())
        .unwrap_or(spaced)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reads_decoded_param() {
        let loc = PageLocation::parse("/docs/intro?lang=en&query=hello+world%21#top");
        assert_eq!(loc.path(), "/docs/intro");
        assert_eq!(loc.query_param("query").as_deref(), Some("hello world!"));
        assert_eq!(loc.query_param("lang").as_deref(), Some("en"));
        assert_eq!(loc.query_param("missing"), None);
    }

    #[test]
    fn test_replace_keeps_other_params_and_fragment() {
        let mut loc = PageLocation::parse("/docs?lang=en&query=old#top");
        loc.replace_query_param("query", Some("new value"));
        assert_eq!(loc.href(), "/docs?lang=en&query=new%20value#top");
    }

    #[test]
    fn test_replace_appends_then_removes() {
        let mut loc = PageLocation::parse("/docs");
        loc.replace_query_param("query", Some("install"));
        assert_eq!(loc.href(), "/docs?query=install");

        loc.replace_query_param("query", None);
        assert_eq!(loc.href(), "/docs");
    }

    #[test]
    fn test_replace_collapses_duplicate_params() {
        let mut loc = PageLocation::parse("/?query=a&query=b");
        loc.replace_query_param("query", Some("c"));
        assert_eq!(loc.href(), "/?query=c");
    }
}
