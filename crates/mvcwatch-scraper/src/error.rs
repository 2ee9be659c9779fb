use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("malformed {block} block: {source}")]
    BlockParse {
        block: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{block} block is not an array of records")]
    BlockShape { block: &'static str },

    #[error("{block} record is missing required field {field}")]
    MissingField {
        block: &'static str,
        field: &'static str,
    },
}
