use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("I/O error: {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("stub template {template} has no script placeholder")]
    PlaceholderNotFound { template: String },

    #[error("stub template {template} has {count} script placeholders, expected exactly one")]
    MultiplePlaceholders { template: String, count: usize },
}
