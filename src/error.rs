use thiserror::Error;

pub type PaibanResult<T> = Result<T, PaibanError>;

#[derive(Error, Debug)]
pub enum PaibanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("匯入失敗：{0}")]
    Import(String),

    #[error("匯出失敗：{0}")]
    Export(String),
}
