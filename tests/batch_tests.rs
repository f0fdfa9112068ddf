// tests/batch_tests.rs

use png_webp_converter::batch::{convert_folder_with, DEFAULT_OUTPUT_SUBDIR};
use png_webp_converter::{convert_folder, BatchError, BatchOptions, Quality};
use std::fs::{self, File};
use std::path::Path;
use tempfile::tempdir;

fn write_png(path: &Path) {
    image::RgbImage::from_pixel(6, 4, image::Rgb([10, 200, 30])).save(path).unwrap();
}

#[test]
fn one_good_and_one_corrupt_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    write_png(&dir.path().join("good.png"));
    fs::write(dir.path().join("corrupt.png"), b"not an image")?;
    fs::write(dir.path().join("readme.txt"), b"ignored")?;

    let summary = convert_folder(&BatchOptions::new(dir.path()))?;

    assert_eq!(summary.attempted, 2);
    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.failures.len(), 1);
    assert!(summary.failures[0].contains("corrupt.png"));
    assert!(dir.path().join(DEFAULT_OUTPUT_SUBDIR).join("good.webp").exists());
    Ok(())
}

#[test]
fn recursion_controls_depth() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    fs::create_dir(dir.path().join("sub"))?;
    write_png(&dir.path().join("sub").join("nested.png"));

    let flat = convert_folder(&BatchOptions::new(dir.path()))?;
    assert_eq!(flat.attempted, 0);

    let mut options = BatchOptions::new(dir.path());
    options.recursive = true;
    let deep = convert_folder(&options)?;
    assert_eq!(deep.attempted, 1);
    assert_eq!(deep.succeeded, 1);
    Ok(())
}

#[test]
fn recursive_run_does_not_reconvert_its_own_output() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    write_png(&dir.path().join("a.png"));

    let mut options = BatchOptions::new(dir.path());
    options.recursive = true;
    assert_eq!(convert_folder(&options)?.attempted, 1);
    // converted/a.webp now exists but lives in the output folder
    assert_eq!(convert_folder(&options)?.attempted, 1);
    assert!(dir.path().join(DEFAULT_OUTPUT_SUBDIR).join("a_1.webp").exists());
    Ok(())
}

#[test]
fn explicit_output_folder_and_quality() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let src = dir.path().join("src");
    let out = dir.path().join("elsewhere").join("out");
    fs::create_dir(&src)?;
    write_png(&src.join("x.png"));

    let mut options = BatchOptions::new(&src);
    options.output_dir = Some(out.clone());
    options.quality = Quality::new(40)?;

    let mut reported = Vec::new();
    let summary = convert_folder_with(&options, |index, result| {
        reported.push((index, result.output().map(Path::to_path_buf)));
    })?;

    assert!(summary.all_succeeded());
    assert_eq!(reported, vec![(0, Some(out.join("x.webp")))]);
    assert!(!src.join(DEFAULT_OUTPUT_SUBDIR).exists());
    Ok(())
}

#[test]
fn webp_inputs_become_png() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    write_png(&dir.path().join("a.png"));
    let first = convert_folder(&BatchOptions::new(dir.path()))?;
    assert_eq!(first.succeeded, 1);

    let converted = dir.path().join(DEFAULT_OUTPUT_SUBDIR);
    let second = convert_folder(&BatchOptions::new(&converted))?;
    assert_eq!(second.succeeded, 1);
    assert_eq!(image::image_dimensions(converted.join(DEFAULT_OUTPUT_SUBDIR).join("a.png"))?, (6, 4));
    Ok(())
}

#[test]
fn unusable_output_folder_is_fatal() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    write_png(&dir.path().join("a.png"));
    File::create(dir.path().join("blocker"))?;

    let mut options = BatchOptions::new(dir.path());
    options.output_dir = Some(dir.path().join("blocker").join("out"));
    let err = convert_folder(&options).unwrap_err();
    assert!(matches!(err, BatchError::OutputDir { .. }));
    Ok(())
}

#[test]
fn missing_source_is_fatal() {
    let err = convert_folder(&BatchOptions::new("surely_this_does_not_exist_42_integration")).unwrap_err();
    assert!(matches!(err, BatchError::SourceNotDir(_)));
}
