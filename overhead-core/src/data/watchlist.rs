//! Watchlist of highlighted registrations
//!
//! Accepts either a table of `REGISTRATION = "Display name"` pairs or a
//! bare list of registrations. Keys are case-insensitive; an unknown
//! registration is simply not a hit.

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Registrations that get the highlighted theme
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "WatchlistRepr", into = "WatchlistRepr"))]
pub struct Watchlist {
    /// Upper-cased registration -> optional display name
    entries: BTreeMap<String, Option<String>>,
}

/// A watchlist match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchlistHit<'a> {
    /// Registration as stored in the watchlist
    pub registration: &'a str,
    /// Display name, if one was configured
    pub name: Option<&'a str>,
}

impl Watchlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an entry
    pub fn insert(&mut self, registration: &str, name: Option<&str>) {
        let key = normalize(registration);
        if key.is_empty() {
            return;
        }
        let name = name.map(str::trim).filter(|n| !n.is_empty()).map(String::from);
        self.entries.insert(key, name);
    }

    /// Look up a registration, ignoring case and surrounding whitespace
    pub fn lookup(&self, registration: &str) -> Option<WatchlistHit<'_>> {
        self.entries
            .get_key_value(&normalize(registration))
            .map(|(reg, name)| WatchlistHit {
                registration: reg.as_str(),
                name: name.as_deref(),
            })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn normalize(registration: &str) -> String {
    registration.trim().to_uppercase()
}

/// On-disk forms of the watchlist
#[cfg(feature = "serde")]
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum WatchlistRepr {
    Named(BTreeMap<String, String>),
    Plain(Vec<String>),
}

#[cfg(feature = "serde")]
impl From<WatchlistRepr> for Watchlist {
    fn from(repr: WatchlistRepr) -> Self {
        let mut list = Watchlist::new();
        match repr {
            WatchlistRepr::Named(map) => {
                for (reg, name) in &map {
                    list.insert(reg, Some(name));
                }
            }
            WatchlistRepr::Plain(regs) => {
                for reg in &regs {
                    list.insert(reg, None);
                }
            }
        }
        list
    }
}

#[cfg(feature = "serde")]
impl From<Watchlist> for WatchlistRepr {
    fn from(list: Watchlist) -> Self {
        WatchlistRepr::Named(
            list.entries
                .into_iter()
                .map(|(reg, name)| (reg, name.unwrap_or_default()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let mut list = Watchlist::new();
        list.insert("g-eupt", Some("Speedbird"));

        let hit = list.lookup(" G-EuPt ").unwrap();
        assert_eq!(hit.registration, "G-EUPT");
        assert_eq!(hit.name, Some("Speedbird"));
        assert!(list.lookup("G-EUPU").is_none());
    }

    #[test]
    fn test_blank_name_is_none() {
        let mut list = Watchlist::new();
        list.insert("N1", Some("  "));
        assert_eq!(list.lookup("n1").unwrap().name, None);
    }

    #[test]
    fn test_blank_registration_ignored() {
        let mut list = Watchlist::new();
        list.insert("   ", Some("ghost"));
        assert!(list.is_empty());
    }

    #[derive(Deserialize)]
    struct Wrapper {
        watchlist: Watchlist,
    }

    #[test]
    fn test_parse_table_form() {
        let w: Wrapper = toml::from_str(
            r#"
            [watchlist]
            "G-EUPT" = "Speedbird"
            "n628ts" = ""
            "#,
        )
        .unwrap();
        assert_eq!(w.watchlist.len(), 2);
        assert_eq!(w.watchlist.lookup("g-eupt").unwrap().name, Some("Speedbird"));
        assert_eq!(w.watchlist.lookup("N628TS").unwrap().name, None);
    }

    #[test]
    fn test_parse_list_form() {
        let w: Wrapper = toml::from_str(r#"watchlist = ["G-EUPT", "n628ts"]"#).unwrap();
        assert_eq!(w.watchlist.len(), 2);
        assert!(w.watchlist.lookup("N628TS").is_some());
    }
}
