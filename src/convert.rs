// convert.rs
use crate::error::ConvertError;
use crate::format::{classify, ImageKind};
use crate::quality::Quality;
use crate::utils::measure_time;
use image::io::Reader as ImageReader;
use image::{DynamicImage, ImageOutputFormat};
use log::{debug, info};
use std::fs::{self, OpenOptions};
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

/// Settings captured once when a job starts and shared by every file in it.
#[derive(Debug, Clone, Default)]
pub struct ConversionSettings {
    /// `None` writes each output next to its input.
    pub output_dir: Option<PathBuf>,
    pub quality: Quality,
}

impl ConversionSettings {
    pub fn new(output_dir: Option<PathBuf>, quality: Quality) -> Self {
        Self { output_dir, quality }
    }

    pub fn request_for(&self, input: &Path) -> ConversionRequest {
        ConversionRequest {
            input: input.to_path_buf(),
            output_dir: self.output_dir.clone(),
            quality: self.quality,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConversionRequest {
    pub input: PathBuf,
    pub output_dir: Option<PathBuf>,
    pub quality: Quality,
}

impl ConversionRequest {
    pub fn new(input: impl Into<PathBuf>, quality: Quality) -> Self {
        Self {
            input: input.into(),
            output_dir: None,
            quality,
        }
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(output_dir.into());
        self
    }

    /// The explicit output directory, or the input's own directory.
    pub fn output_dir(&self) -> PathBuf {
        match &self.output_dir {
            Some(dir) => dir.clone(),
            None => match self.input.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            },
        }
    }
}

#[derive(Debug)]
pub struct ConversionResult {
    pub input: PathBuf,
    pub outcome: Result<PathBuf, ConvertError>,
}

impl ConversionResult {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn output(&self) -> Option<&Path> {
        self.outcome.as_ref().ok().map(PathBuf::as_path)
    }

    pub fn error(&self) -> Option<&ConvertError> {
        self.outcome.as_ref().err()
    }

    /// One line suitable for a log or summary.
    pub fn message(&self) -> String {
        let name = display_name(&self.input);
        match &self.outcome {
            Ok(output) => format!("Converted: {} -> {}", name, display_name(output)),
            Err(e) => format!("Error converting {}: {}", name, e),
        }
    }
}

/// Converts one file: PNG/JPEG become lossy WebP, WebP becomes lossless PNG.
///
/// The output lands in the request's output directory under the input's
/// file stem. An existing file is never overwritten; a numeric suffix is
/// appended instead. The input file is left untouched.
pub fn convert_file(request: &ConversionRequest) -> ConversionResult {
    let (outcome, duration) = measure_time(|| try_convert(request));
    match &outcome {
        Ok(output) => info!(
            "Converted {} -> {} in {:?}",
            request.input.display(),
            output.display(),
            duration
        ),
        Err(e) => debug!("Conversion of {} failed: {}", request.input.display(), e),
    }
    ConversionResult {
        input: request.input.clone(),
        outcome,
    }
}

fn try_convert(request: &ConversionRequest) -> Result<PathBuf, ConvertError> {
    let input = &request.input;
    let kind = classify(input);
    let target = match kind.target() {
        Some(target) => target,
        None => return Err(ConvertError::Unsupported(input.clone())),
    };

    if !input.is_file() {
        return Err(ConvertError::Read {
            path: input.clone(),
            reason: "file not found".to_string(),
        });
    }

    let img = load_image(input, kind)?;
    let encoded = encode_image(&img, target, request.quality, input)?;

    let output_dir = request.output_dir();
    fs::create_dir_all(&output_dir).map_err(|source| ConvertError::Write {
        path: output_dir.clone(),
        source,
    })?;

    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    // every target kind has an extension
    let ext = target.extension().unwrap_or("png");
    let output_path = unique_output_path(&output_dir, &stem, ext);

    save_bytes(&encoded, &output_path)?;
    Ok(output_path)
}

fn load_image(path: &Path, kind: ImageKind) -> Result<DynamicImage, ConvertError> {
    let read_err = |reason: String| ConvertError::Read {
        path: path.to_path_buf(),
        reason,
    };

    let (result, duration) = measure_time(|| match kind {
        ImageKind::WebP => {
            let data = fs::read(path).map_err(|e| read_err(e.to_string()))?;
            webp::Decoder::new(&data)
                .decode()
                .map(|decoded| decoded.to_image())
                .ok_or_else(|| read_err("not a valid still WebP image".to_string()))
        }
        _ => ImageReader::open(path)
            .map_err(|e| read_err(e.to_string()))?
            .decode()
            .map_err(|e| read_err(e.to_string())),
    });
    debug!("load_image {} took {:?}", path.display(), duration);
    result
}

fn encode_image(
    img: &DynamicImage,
    target: ImageKind,
    quality: Quality,
    input: &Path,
) -> Result<Vec<u8>, ConvertError> {
    let encode_err = |reason: String| ConvertError::Encode {
        path: input.to_path_buf(),
        reason,
    };

    let (result, duration) = measure_time(|| match target {
        ImageKind::WebP => encode_to_webp(img, quality).map_err(encode_err),
        ImageKind::Png => {
            let mut buf = Vec::new();
            img.write_to(&mut Cursor::new(&mut buf), ImageOutputFormat::Png)
                .map_err(|e| encode_err(e.to_string()))?;
            Ok(buf)
        }
        other => Err(encode_err(format!("cannot encode to {:?}", other))),
    });
    debug!("encode to {:?} took {:?}", target, duration);
    result
}

fn encode_to_webp(img: &DynamicImage, quality: Quality) -> Result<Vec<u8>, String> {
    // libwebp only takes 8-bit RGB or RGBA buffers
    let normalized;
    let img = match img {
        DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_) => img,
        other => {
            normalized = DynamicImage::ImageRgba8(other.to_rgba8());
            &normalized
        }
    };

    let encoder = webp::Encoder::from_image(img).map_err(|e| e.to_string())?;
    let webp = encoder
        .encode_simple(false, quality.as_f32())
        .map_err(|e| format!("{:?}", e))?;
    Ok(webp.to_vec())
}

fn save_bytes(data: &[u8], output_path: &Path) -> Result<(), ConvertError> {
    let write_err = |source| ConvertError::Write {
        path: output_path.to_path_buf(),
        source,
    };
    let (result, duration) = measure_time(|| {
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(output_path)
            .map_err(write_err)?;
        file.write_all(data).map_err(write_err)
    });
    debug!("save {} took {:?}", output_path.display(), duration);
    result
}

/// Guess at the output size before converting, from typical compression ratios.
///
/// WebP shrinks to 50-80% of the input depending on quality; PNG re-encodes
/// of lossy sources usually grow by about half.
pub fn estimate_output_size(input_size: u64, target: ImageKind, quality: Quality) -> u64 {
    let factor = match target {
        ImageKind::WebP => 0.5 + f64::from(quality.get()) / 100.0 * 0.3,
        ImageKind::Png => 1.5,
        ImageKind::Jpeg | ImageKind::Unsupported => 1.0,
    };
    (input_size as f64 * factor) as u64
}

/// `<dir>/<stem>.<ext>`, or `<dir>/<stem>_N.<ext>` with the first free N.
pub fn unique_output_path(dir: &Path, stem: &str, ext: &str) -> PathBuf {
    let candidate = dir.join(format!("{}.{}", stem, ext));
    if !candidate.exists() {
        return candidate;
    }
    let mut n = 1u32;
    loop {
        let candidate = dir.join(format!("{}_{}.{}", stem, n, ext));
        if !candidate.exists() {
            return candidate;
        }
        n += 1;
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
