use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum PanelError {
    #[error("the simulation surface has nothing to export")]
    EmptySurface,
    #[error("surface buffer does not hold {width}x{height} RGBA pixels")]
    MalformedSurface { width: u32, height: u32 },
    #[error("failed to encode or decode image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
