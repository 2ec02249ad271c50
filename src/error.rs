use snafu::Snafu;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display(
        "Missing credentials for {provider}: {} (pass them explicitly or set them in the default configuration)",
        fields.join(", ")
    ))]
    MissingCredentials {
        provider: String,
        fields: Vec<&'static str>,
    },

    #[snafu(display("Unsupported storage provider: {provider}"))]
    UnsupportedProvider { provider: String },

    #[snafu(display("Cannot read credentials file '{}': {source}", path.display()))]
    ReadCredentialsFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Invalid credentials file '{}': {source}", path.display()))]
    InvalidCredentialsFile {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[snafu(display("Object already exists: {key} (use replace to overwrite)"))]
    ObjectAlreadyExists { key: String },

    #[snafu(display("Path does not exist: {}", path.display()))]
    PathNotFound { path: PathBuf },

    #[snafu(display("Invalid path: {path}"))]
    InvalidPath { path: String },

    #[snafu(display("Folder not found: {path}"))]
    FolderNotFound { path: String },

    #[snafu(display("Folder is not empty: {path} ({entries} entries inside)"))]
    FolderNotEmpty { path: String, entries: usize },

    #[snafu(display("Object not found: {key}"))]
    ObjectNotFound { key: String },

    #[snafu(display("Pre-signed links are not supported by the {provider} backend"))]
    PresignUnsupported { provider: String },

    #[snafu(display("Failed to upload '{local_path}' to '{key}': {source}"))]
    UploadFailed {
        local_path: String,
        key: String,
        source: Box<Error>,
    },

    #[snafu(display("Failed to move folder '{src_path}' to '{dest_path}': {source}"))]
    MoveFolderFailed {
        src_path: String,
        dest_path: String,
        source: Box<Error>,
    },

    #[snafu(display("Failed to list objects under '{prefix}': {source}"))]
    ListObjectsFailed { prefix: String, source: Box<Error> },

    #[snafu(display("OpenDAL error: {source}"))]
    OpenDal { source: opendal::Error },

    #[snafu(display("IO error: {source}"))]
    Io { source: std::io::Error },
}

impl Error {
    /// The innermost error below any context wrappers.
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::UploadFailed { source, .. }
            | Error::MoveFolderFailed { source, .. }
            | Error::ListObjectsFailed { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// The SDK error at the bottom of a wrapped chain, if any.
    pub fn opendal_source(&self) -> Option<&opendal::Error> {
        match self.root_cause() {
            Error::OpenDal { source } => Some(source),
            _ => None,
        }
    }
}

/// Map the error side of a `Result` into a context variant whose boxed
/// `source` is the original error, e.g.
/// `wrap_err!(lister.list(p, false).await, ListObjectsFailed { prefix: p.to_string() })`.
#[macro_export]
macro_rules! wrap_err {
    ($expr:expr, $variant:ident { $($field:ident : $value:expr),* $(,)? }) => {
        $expr.map_err(|e| $crate::error::Error::$variant {
            $($field: $value,)*
            source: Box::new($crate::error::Error::from(e)),
        })
    };
}

impl From<opendal::Error> for Error {
    fn from(error: opendal::Error) -> Self {
        Error::OpenDal { source: error }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::Io { source: error }
    }
}
