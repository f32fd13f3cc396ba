use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("comic id must not be empty")]
    EmptyComicId,
    #[error("comic {0} has no pages")]
    NoPages(String),
    #[error("malformed page data url: {0}")]
    MalformedDataUrl(String),
    #[error("unknown sort criterion: {0}")]
    UnknownSortCriterion(String),
}
