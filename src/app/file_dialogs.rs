// file_dialogs.rs
use png_webp_converter::format::SUPPORTED_EXTENSIONS;
use rfd::FileDialog;
use std::path::PathBuf;

pub fn select_images() -> Option<Vec<PathBuf>> {
    FileDialog::new()
        .set_title("Select Images")
        .add_filter("Image files", &SUPPORTED_EXTENSIONS)
        .add_filter("PNG files", &["png"])
        .add_filter("JPEG files", &["jpg", "jpeg"])
        .add_filter("WebP files", &["webp"])
        .pick_files()
}

pub fn select_folder() -> Option<PathBuf> {
    FileDialog::new().set_title("Select Folder").pick_folder()
}

pub fn select_output_directory() -> Option<PathBuf> {
    FileDialog::new().set_title("Select Output Folder").pick_folder()
}
