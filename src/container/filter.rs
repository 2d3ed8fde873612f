//! Name based selection of the containers that are exported.
//!
//! Matching is plain substring containment on the container name. A filter for `web` therefore
//! also selects `my-web-2` or `webhook`; this looseness is intended, since stack deployments
//! prefix or suffix the names of their containers.

use std::fmt;
use std::str::FromStr;

use super::ContainerRef;

/// Keyword that selects every container.
const MATCH_ALL: &str = "all";

/// Predicate deciding which containers are collected.
///
/// # Examples
///
/// ```
/// # use docker_stats_exporter::container::NameFilter;
/// let filter: NameFilter = "web,db".parse().unwrap();
/// assert!(filter.matches_name("web-1"));
/// assert!(filter.matches_name("my-db-2"));
/// assert!(!filter.matches_name("cache-1"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NameFilter {
    /// Keeps every container.
    #[default]
    All,
    /// Keeps a container if its name contains any of the given substrings.
    AnyOf(Vec<String>),
    /// Keeps a container if its name contains the given substring.
    Substring(String),
}

impl NameFilter {
    /// Returns `true` if a container with the given name passes the filter.
    pub fn matches_name(&self, name: &str) -> bool {
        match self {
            NameFilter::All => true,
            NameFilter::AnyOf(needles) => needles.iter().any(|needle| name.contains(needle.as_str())),
            NameFilter::Substring(needle) => name.contains(needle.as_str()),
        }
    }

    /// Returns `true` if the container passes the filter.
    pub fn matches(&self, container: &ContainerRef) -> bool {
        self.matches_name(container.name())
    }
}

impl FromStr for NameFilter {
    type Err = std::convert::Infallible;

    /// Parses the `STACKS` configuration value.
    ///
    /// An empty value or `all` selects every container, a comma separated list selects
    /// containers matching any entry and any other value is used as a single substring.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case(MATCH_ALL) {
            return Ok(NameFilter::All);
        }

        if s.contains(',') {
            let needles: Vec<String> = s
                .split(',')
                .map(str::trim)
                .filter(|needle| !needle.is_empty())
                .map(str::to_owned)
                .collect();
            if needles.is_empty() {
                return Ok(NameFilter::All);
            }
            return Ok(NameFilter::AnyOf(needles));
        }

        Ok(NameFilter::Substring(s.to_owned()))
    }
}

impl fmt::Display for NameFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameFilter::All => f.write_str(MATCH_ALL),
            NameFilter::AnyOf(needles) => f.write_str(&needles.join(",")),
            NameFilter::Substring(needle) => f.write_str(needle),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::container::ContainerID;

    fn container(name: &str) -> ContainerRef {
        ContainerRef::new(ContainerID::new("abc").unwrap(), name, HashMap::default())
    }

    #[test]
    fn test_parse_all() {
        assert_eq!("all".parse::<NameFilter>().unwrap(), NameFilter::All);
        assert_eq!("ALL".parse::<NameFilter>().unwrap(), NameFilter::All);
        assert_eq!("".parse::<NameFilter>().unwrap(), NameFilter::All);
        assert_eq!("  ".parse::<NameFilter>().unwrap(), NameFilter::All);
    }

    #[test]
    fn test_parse_any_of() {
        let filter: NameFilter = "web, db ,,".parse().unwrap();
        assert_eq!(
            filter,
            NameFilter::AnyOf(vec!["web".to_owned(), "db".to_owned()])
        );
    }

    #[test]
    fn test_parse_only_separators() {
        assert_eq!(",,".parse::<NameFilter>().unwrap(), NameFilter::All);
    }

    #[test]
    fn test_parse_substring() {
        let filter: NameFilter = " monitoring ".parse().unwrap();
        assert_eq!(filter, NameFilter::Substring("monitoring".to_owned()));
    }

    #[test]
    fn test_match_all_keeps_everything() {
        assert!(NameFilter::All.matches(&container("anything")));
        assert!(NameFilter::All.matches(&container("")));
    }

    #[test]
    fn test_match_any_of() {
        let filter = NameFilter::AnyOf(vec!["web".to_owned(), "db".to_owned()]);
        assert!(filter.matches(&container("web-1")));
        assert!(filter.matches(&container("my-db-2")));
        assert!(!filter.matches(&container("cache-1")));
    }

    #[test]
    fn test_match_substring_is_containment() {
        let filter = NameFilter::Substring("mon".to_owned());
        assert!(filter.matches(&container("monitoring_grafana.1")));
        assert!(filter.matches(&container("daemon")));
        assert!(!filter.matches(&container("MONITOR")));
    }

    #[test]
    fn test_labels_are_not_matched() {
        let labels = HashMap::from([(
            "com.docker.stack.namespace".to_owned(),
            "monitoring".to_owned(),
        )]);
        let grafana = ContainerRef::new(ContainerID::new("abc").unwrap(), "grafana", labels);
        assert!(!NameFilter::Substring("monitoring".to_owned()).matches(&grafana));
    }

    #[test]
    fn test_display_round_trips_configuration() {
        let filter: NameFilter = "web,db".parse().unwrap();
        assert_eq!(filter.to_string(), "web,db");
        assert_eq!(NameFilter::All.to_string(), "all");
    }
}
