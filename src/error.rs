/// Errors from the ambient, filesystem-touching parts of the crate.
///
/// The printer itself is total (see `printer` module docs) and never
/// constructs this type; it only surfaces from [`crate::config`].
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum FormatError {
    #[error("failed to read configuration file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration file {path}: {source}")]
    Config {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}
