use std::collections::HashMap;

use crate::container::{self, ContainerID, ContainerRef};

/// One entry of the `GET /containers/json` response.
///
/// Only the fields the exporter uses are decoded.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContainerSummary {
    pub id: String,
    #[serde(default)]
    pub names: Vec<String>,
    #[serde(default)]
    pub labels: Option<HashMap<String, String>>,
}

impl ContainerSummary {
    /// Returns the primary container name, i.e., the first name without its leading `/`.
    fn primary_name(&self) -> Option<&str> {
        self.names
            .first()
            .map(|name| name.trim_start_matches('/'))
            .filter(|name| !name.is_empty())
    }
}

impl TryFrom<ContainerSummary> for ContainerRef {
    type Error = container::Error;

    fn try_from(summary: ContainerSummary) -> Result<Self, Self::Error> {
        let id = ContainerID::new(&summary.id)?;
        let name = match summary.primary_name() {
            Some(name) => name.to_owned(),
            None => id.short().to_owned(),
        };

        Ok(ContainerRef::new(
            id,
            name,
            summary.labels.unwrap_or_default(),
        ))
    }
}
