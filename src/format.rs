// format.rs
use std::path::Path;

/// Extensions (lowercase, without the dot) the converter accepts.
pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "webp"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Png,
    Jpeg,
    WebP,
    Unsupported,
}

impl ImageKind {
    /// The format a file of this kind is converted into.
    pub fn target(self) -> Option<ImageKind> {
        match self {
            ImageKind::Png | ImageKind::Jpeg => Some(ImageKind::WebP),
            ImageKind::WebP => Some(ImageKind::Png),
            ImageKind::Unsupported => None,
        }
    }

    pub fn extension(self) -> Option<&'static str> {
        match self {
            ImageKind::Png => Some("png"),
            ImageKind::Jpeg => Some("jpg"),
            ImageKind::WebP => Some("webp"),
            ImageKind::Unsupported => None,
        }
    }

    pub fn is_supported(self) -> bool {
        self != ImageKind::Unsupported
    }
}

/// Classifies a path by its extension only, ignoring case. The file is not opened.
pub fn classify(path: &Path) -> ImageKind {
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => ext.to_ascii_lowercase(),
        None => return ImageKind::Unsupported,
    };

    match ext.as_str() {
        "png" => ImageKind::Png,
        "jpg" | "jpeg" => ImageKind::Jpeg,
        "webp" => ImageKind::WebP,
        _ => ImageKind::Unsupported,
    }
}
