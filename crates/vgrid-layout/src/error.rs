use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("Minimum cell width must be positive")]
    ZeroCellWidth,

    #[error("Minimum cell width {0} is not a multiple of 16; 16:9 height would not be exact")]
    InexactAspect(u32),

    #[error("Tile limit must be between 1 and {max}, got {got}")]
    TileLimit { got: usize, max: usize },
}

pub type Result<T> = std::result::Result<T, LayoutError>;
