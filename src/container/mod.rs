use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

mod error;
mod filter;

pub use error::{Error, Result};
pub use filter::NameFilter;

/// The maximum allowed length for a [`ContainerID`].
const CONTAINER_ID_MAX_LEN: usize = 255;

/// Number of characters docker shows for an abbreviated container id.
const SHORT_ID_LEN: usize = 12;

/// A validated container identifier as reported by the container runtime.
///
/// # Examples
///
/// ```
/// # use docker_stats_exporter::container::ContainerID;
/// let raw_id = "abc123abc123abc123abc123abc123abc123abc123abc123abc123abc123abcd";
/// let container_id = ContainerID::new(raw_id).unwrap();
/// assert_eq!(container_id.as_ref(), raw_id);
/// assert_eq!(container_id.short(), "abc123abc123");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainerID(Arc<str>);

impl ContainerID {
    /// Creates a new `ContainerID` from the given raw id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidContainerID`] if the input is empty or its length exceeds
    /// [`CONTAINER_ID_MAX_LEN`].
    pub fn new(src: impl AsRef<str>) -> Result<Self> {
        let src = src.as_ref();
        if src.is_empty() || src.len() > CONTAINER_ID_MAX_LEN {
            return Err(Error::InvalidContainerID(src.to_owned()));
        }

        Ok(Self(src.into()))
    }

    /// Returns the abbreviated form of the id, i.e., its first 12 characters.
    pub fn short(&self) -> &str {
        self.0.get(..SHORT_ID_LEN).unwrap_or(&self.0[..])
    }
}

impl AsRef<str> for ContainerID {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContainerID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Handle to a running container as known to the container runtime.
///
/// The handle is owned by the runtime client and never mutated by the exporter; it only
/// carries what is needed to address the container and to decide whether it is exported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerRef {
    id: ContainerID,
    name: String,
    labels: HashMap<String, String>,
}

impl ContainerRef {
    pub fn new(id: ContainerID, name: impl Into<String>, labels: HashMap<String, String>) -> Self {
        Self {
            id,
            name: name.into(),
            labels,
        }
    }

    pub fn id(&self) -> &ContainerID {
        &self.id
    }

    /// Returns the container name without the leading `/` docker prefixes names with.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the labels attached to the container. They are not consulted by [`NameFilter`].
    pub fn labels(&self) -> &HashMap<String, String> {
        &self.labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_id_rejects_empty() {
        let err = ContainerID::new("").unwrap_err();
        assert!(matches!(err, Error::InvalidContainerID(ref id) if id.is_empty()));
    }

    #[test]
    fn test_container_id_rejects_too_long() {
        let raw = "a".repeat(CONTAINER_ID_MAX_LEN + 1);
        assert!(ContainerID::new(&raw).is_err());
    }

    #[test]
    fn test_short_id_of_short_input() {
        let id = ContainerID::new("abc").unwrap();
        assert_eq!(id.short(), "abc");
    }
}
