/// Failure to derive the metrics of a single container.
///
/// A `FetchError` only ever concerns the container it names. The collector reports it and
/// drops the container from the current cycle.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("container `{container}`: missing mandatory field `{field}` in stats sample")]
    MandatoryFieldMissing {
        container: String,
        field: &'static str,
    },
    #[error("container `{container}`: failed to retrieve stats: {source}")]
    Runtime {
        container: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

pub type Result<T> = std::result::Result<T, FetchError>;
