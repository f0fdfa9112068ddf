// cli.rs
use anyhow::{Context, Result};
use clap::Parser;
use png_webp_converter::batch::{convert_folder_with, BatchOptions};
use png_webp_converter::utils::get_memory_usage;
use png_webp_converter::Quality;
use std::path::PathBuf;
use std::process::ExitCode;

/// Convert images between PNG/JPEG and WebP.
///
/// PNG and JPEG files become WebP; WebP files become PNG.
/// Run without --folder to open the drag-and-drop window.
#[derive(Parser, Debug)]
#[command(name = "png_webp_converter", version)]
#[command(after_help = "Examples:
  png_webp_converter                              # open the window
  png_webp_converter --folder ./images
  png_webp_converter --folder ./images --output ./out --quality 75
  png_webp_converter --folder ./images --recursive")]
pub struct Args {
    /// Folder containing images to convert
    #[arg(short, long, value_name = "DIR")]
    pub folder: Option<PathBuf>,

    /// Output folder (default: <folder>/converted)
    #[arg(short, long, value_name = "DIR", requires = "folder")]
    pub output: Option<PathBuf>,

    /// WebP quality 1-100
    #[arg(
        short,
        long,
        value_name = "QUALITY",
        default_value_t = Quality::DEFAULT.get(),
        value_parser = clap::value_parser!(u8).range(1..=100)
    )]
    pub quality: u8,

    /// Also convert images in subfolders
    #[arg(short, long, requires = "folder")]
    pub recursive: bool,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Runs one folder batch, printing a line per file and a final count.
pub fn run_folder_mode(folder: PathBuf, args: &Args) -> Result<ExitCode> {
    let mut options = BatchOptions::new(folder);
    options.output_dir = args.output.clone();
    options.quality = Quality::new(args.quality)?;
    options.recursive = args.recursive;

    println!("Converting images in: {}", options.source.display());
    println!("Output directory: {}", options.output_dir().display());
    println!("Quality: {}", options.quality);
    println!("{}", "-".repeat(50));
    log::debug!("{}", get_memory_usage());

    let summary = convert_folder_with(&options, |_, result| println!("{}", result.message()))
        .with_context(|| format!("Batch conversion of {} failed", options.source.display()))?;

    log::debug!("{}", get_memory_usage());
    println!("{}", "-".repeat(50));
    if summary.attempted == 0 {
        println!("No supported images found in folder");
    } else {
        println!(
            "Completed: {}/{} images converted successfully ({} failed)",
            summary.succeeded, summary.attempted, summary.failed
        );
    }

    Ok(if summary.all_succeeded() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn no_arguments_means_window_mode() {
        let args = Args::try_parse_from(["png_webp_converter"]).unwrap();
        assert!(args.folder.is_none());
        assert_eq!(args.quality, 85);
        assert!(!args.recursive);
    }

    #[test]
    fn folder_mode_flags() {
        let args = Args::try_parse_from(["png_webp_converter", "-f", "imgs", "-o", "out", "-q", "70", "-r"]).unwrap();
        assert_eq!(args.folder, Some(PathBuf::from("imgs")));
        assert_eq!(args.output, Some(PathBuf::from("out")));
        assert_eq!(args.quality, 70);
        assert!(args.recursive);
    }

    #[test]
    fn quality_out_of_range_is_rejected() {
        assert!(Args::try_parse_from(["png_webp_converter", "-f", "imgs", "-q", "0"]).is_err());
        assert!(Args::try_parse_from(["png_webp_converter", "-f", "imgs", "-q", "101"]).is_err());
    }
}
