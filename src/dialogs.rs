use std::path::PathBuf;

/// Blocking prompts the canvas raises mid-gesture. Hosts route these into
/// whatever chrome they have; tests script them.
pub trait Dialogs {
    /// Yes/no confirmation. `true` means the user accepted.
    fn confirm(&mut self, message: &str) -> bool;

    /// Single-line text entry. `None` when the user cancelled or entered
    /// nothing.
    fn prompt_text(&mut self, title: &str) -> Option<String>;

    /// Pick an image file to stamp onto the canvas. `None` when cancelled.
    fn pick_image(&mut self) -> Option<PathBuf>;

    /// Pick a destination for an exported PNG, seeded with a suggested file
    /// name. `None` when cancelled.
    fn save_png(&mut self, file_name: &str) -> Option<PathBuf>;
}

/// Native file dialogs. Confirmations and text entry have no native
/// counterpart here, so this implementation declines them and logs; hosts
/// with their own chrome implement [`Dialogs`] directly.
#[derive(Debug, Default)]
pub struct DesktopDialogs;

impl Dialogs for DesktopDialogs {
    fn confirm(&mut self, message: &str) -> bool {
        tracing::warn!(message, "no confirmation dialog available, declining");
        false
    }

    fn prompt_text(&mut self, title: &str) -> Option<String> {
        tracing::warn!(title, "no text entry dialog available");
        None
    }

    fn pick_image(&mut self) -> Option<PathBuf> {
        rfd::FileDialog::new()
            .add_filter("Images", &["png", "jpg", "jpeg"])
            .pick_file()
    }

    fn save_png(&mut self, file_name: &str) -> Option<PathBuf> {
        let mut dialog = rfd::FileDialog::new()
            .add_filter("PNG", &["png"])
            .set_file_name(file_name);
        if let Some(downloads) = dirs_next::download_dir() {
            dialog = dialog.set_directory(downloads);
        }
        dialog.save_file()
    }
}
