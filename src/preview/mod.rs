/// Image preview handling
///
/// This module handles:
/// - Picking the file to preview out of a selection (first file only)
/// - Reading the file in the background and encoding it as a data URL
/// - Updating the preview element once a read completes
///
/// Reads are not cancelled or ordered. If a second file is selected
/// while the first is still loading, whichever read finishes last is the
/// one left on screen.
///
/// A drop of several files arrives as one event per file. Those events are
/// collected into a single selection before anything is read.

pub mod data_url;

use iced::widget::image::Handle;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::error::PreviewError;
pub use data_url::DataUrl;

/// Sequence number attached to each started read, for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct ReadId(pub u64);

impl ReadId {
    pub fn next(self) -> Self {
        ReadId(self.0 + 1)
    }
}

/// A completed read: the encoded file and where it came from
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub path: PathBuf,
    pub size: usize,
    pub source: DataUrl,
}

/// How long a drop gesture stays open for further files
pub const DROP_SETTLE: Duration = Duration::from_millis(50);

/// Files dropped in one gesture
#[derive(Debug, Default)]
pub struct DropBatch {
    paths: Vec<PathBuf>,
}

impl DropBatch {
    /// Add a dropped file. Returns `true` if it opened a new batch.
    pub fn push(&mut self, path: PathBuf) -> bool {
        let opened = self.paths.is_empty();
        self.paths.push(path);
        opened
    }

    /// Close the batch, handing its files over as one selection
    pub fn take(&mut self) -> Vec<PathBuf> {
        std::mem::take(&mut self.paths)
    }
}

/// Resolves once the current drop gesture is over
pub async fn drop_settled() {
    tokio::time::sleep(DROP_SETTLE).await;
}

/// Only the first selected file is considered; the rest are ignored.
pub fn first_selected(selection: &[PathBuf]) -> Option<&Path> {
    selection.first().map(PathBuf::as_path)
}

/// Read a file and encode it as a data URL
pub async fn read_data_url(path: PathBuf) -> Result<LoadedImage, PreviewError> {
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| PreviewError::Read {
            path: path.clone(),
            source: Arc::new(e),
        })?;

    let source = DataUrl::encode(&path, &bytes);

    Ok(LoadedImage {
        path,
        size: bytes.len(),
        source,
    })
}

/// The element that displays the previewed image. Hidden until the first
/// successful read.
#[derive(Debug, Clone)]
pub struct PreviewElement {
    id: String,
    source: Option<DataUrl>,
    handle: Option<Handle>,
    visible: bool,
}

impl PreviewElement {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: None,
            handle: None,
            visible: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source(&self) -> Option<&DataUrl> {
        self.source.as_ref()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn handle(&self) -> Option<&Handle> {
        self.handle.as_ref()
    }

    /// Point the element at `source` and make it visible
    ///
    /// The render handle is decoded from the data URL itself. If the URL
    /// cannot be decoded the element is left untouched.
    pub fn show(&mut self, source: DataUrl) -> Result<(), PreviewError> {
        let bytes = source.decode()?;

        self.handle = Some(Handle::from_bytes(bytes));
        self.source = Some(source);
        self.visible = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    /// Encode a 1x1 PNG
    fn one_pixel_png() -> Vec<u8> {
        let img = RgbaImage::from_pixel(1, 1, Rgba([255, 0, 0, 255]));
        let mut bytes = Cursor::new(Vec::new());
        img.write_to(&mut bytes, ImageFormat::Png).unwrap();
        bytes.into_inner()
    }

    #[test]
    fn test_first_selected_ignores_the_rest() {
        let selection = vec![PathBuf::from("a.png"), PathBuf::from("b.png")];
        assert_eq!(first_selected(&selection), Some(Path::new("a.png")));
    }

    #[test]
    fn test_empty_selection_selects_nothing() {
        assert_eq!(first_selected(&[]), None);
    }

    #[test]
    fn test_preview_hidden_by_default() {
        let preview = PreviewElement::new("imagePreview");
        assert!(!preview.is_visible());
        assert!(preview.source().is_none());
        assert!(preview.handle().is_none());
    }

    #[tokio::test]
    async fn test_one_pixel_png_becomes_visible() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pixel.png");
        let png = one_pixel_png();
        std::fs::write(&path, &png).unwrap();

        let loaded = read_data_url(path.clone()).await.unwrap();
        assert_eq!(loaded.path, path);
        assert_eq!(loaded.size, png.len());

        let mut preview = PreviewElement::new("imagePreview");
        preview.show(loaded.source).unwrap();

        assert!(preview.is_visible());
        assert!(preview.handle().is_some());

        let source = preview.source().unwrap().as_str();
        assert!(source.starts_with("data:image/png;base64,"));
        assert!(source.len() > "data:image/png;base64,".len());
    }

    #[tokio::test]
    async fn test_unreadable_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_data_url(dir.path().join("missing.png")).await;

        assert!(matches!(result, Err(PreviewError::Read { .. })));
    }

    #[test]
    fn test_later_show_replaces_earlier() {
        let mut preview = PreviewElement::new("imagePreview");
        let first = DataUrl::with_mime("image/png", b"first");
        let second = DataUrl::with_mime("image/png", b"second");

        preview.show(first).unwrap();
        preview.show(second.clone()).unwrap();

        assert_eq!(preview.source(), Some(&second));
    }

    #[test]
    fn test_drop_batch_collects_one_gesture() {
        let mut batch = DropBatch::default();

        assert!(batch.push(PathBuf::from("first.png")));
        assert!(!batch.push(PathBuf::from("second.png")));

        let selection = batch.take();
        assert_eq!(first_selected(&selection), Some(Path::new("first.png")));
        assert_eq!(selection.len(), 2);

        // Taking closes the batch; the next drop opens a fresh one
        assert!(batch.take().is_empty());
        assert!(batch.push(PathBuf::from("third.png")));
    }

    #[test]
    fn test_read_ids_increase() {
        let id = ReadId::default();
        assert!(id.next() > id);
        assert_eq!(id.next().next(), ReadId(2));
    }
}
