use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiffError {
    #[error("missing argument {position} <{name}>; usage: image-diff <pathA> <pathB>")]
    MissingArgument {
        position: usize,
        name: &'static str,
    },

    #[error("cannot access {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot decode image {which}: {source}")]
    Decode {
        which: &'static str,
        #[source]
        source: image::ImageError,
    },

    #[error("comparison failed: {0}")]
    Comparison(String),

    #[error("cannot encode diff image: {0}")]
    Encode(#[source] image::ImageError),

    #[error("cannot serialize statistics: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl DiffError {
    pub fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DiffError::FileAccess {
            path: path.into(),
            source,
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            DiffError::MissingArgument { .. } => 2,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, DiffError>;
