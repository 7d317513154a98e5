//! Profile photo handling: type gate, background reads and data URIs

use std::io;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::ImageFormat;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Extensions offered by the file picker
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp"];

/// The selected file is not an image
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Please select a valid image (jpg or png).")]
pub struct UnsupportedFileError {
    pub path: PathBuf,
}

#[derive(Debug, Error)]
pub enum PhotoError {
    #[error(transparent)]
    Unsupported(#[from] UnsupportedFileError),
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Image MIME type for a path, judged by its extension
pub fn image_mime_for_path(path: &Path) -> Result<&'static str, UnsupportedFileError> {
    path.extension()
        .and_then(ImageFormat::from_extension)
        .filter(|format| format.reading_enabled())
        .map(|format| format.to_mime_type())
        .filter(|mime| mime.starts_with("image/"))
        .ok_or_else(|| UnsupportedFileError {
            path: path.to_path_buf(),
        })
}

/// Encode bytes as a base64 `data:` URI
pub fn encode_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Split a base64 `data:` URI into its MIME type and bytes
pub fn decode_data_uri(uri: &str) -> Option<(String, Vec<u8>)> {
    let rest = uri.strip_prefix("data:")?;
    let (meta, payload) = rest.split_once(',')?;
    let mime = meta.strip_suffix(";base64")?;
    let bytes = STANDARD.decode(payload.trim()).ok()?;
    Some((mime.to_string(), bytes))
}

/// Sniff file content and encode it as a data URI
pub fn photo_data_uri(path: &Path, bytes: &[u8]) -> Result<String, UnsupportedFileError> {
    let format = image::guess_format(bytes).map_err(|_| UnsupportedFileError {
        path: path.to_path_buf(),
    })?;
    Ok(encode_data_uri(format.to_mime_type(), bytes))
}

/// Outcome of one background photo read
#[derive(Debug)]
pub struct PhotoLoad {
    pub path: PathBuf,
    pub result: Result<String, PhotoError>,
}

/// Reads photos off the UI thread
///
/// Reads are never cancelled. When several overlap, every result is
/// delivered in completion order, so the last one to finish wins.
pub struct PhotoLoader {
    handle: Handle,
    tx: UnboundedSender<PhotoLoad>,
    rx: UnboundedReceiver<PhotoLoad>,
}

impl PhotoLoader {
    pub fn new(handle: Handle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { handle, tx, rx }
    }

    /// Start reading `path`, calling `notify` once the result is queued
    pub fn load(&self, path: PathBuf, notify: impl FnOnce() + Send + 'static) {
        let tx = self.tx.clone();
        tracing::debug!("Reading photo: {}", path.display());

        self.handle.spawn(async move {
            let result = read_photo(&path).await;
            if tx.send(PhotoLoad { path, result }).is_err() {
                tracing::debug!("Photo loader dropped before read completed");
            }
            notify();
        });
    }

    /// Drain completed reads
    pub fn poll(&mut self) -> Vec<PhotoLoad> {
        let mut done = Vec::new();
        while let Ok(load) = self.rx.try_recv() {
            done.push(load);
        }
        done
    }
}

async fn read_photo(path: &Path) -> Result<String, PhotoError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| PhotoError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(photo_data_uri(path, &bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::tests::scratch_dir;
    use std::sync::mpsc as std_mpsc;
    use std::time::Duration;

    const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

    #[test]
    fn test_mime_from_extension() {
        assert_eq!(image_mime_for_path(Path::new("me.PNG")), Ok("image/png"));
        assert_eq!(image_mime_for_path(Path::new("me.jpeg")), Ok("image/jpeg"));
        assert!(image_mime_for_path(Path::new("cv.pdf")).is_err());
        assert!(image_mime_for_path(Path::new("noext")).is_err());
    }

    #[test]
    fn test_data_uri_round_trip() {
        let uri = encode_data_uri("image/png", b"abc");
        assert_eq!(uri, "data:image/png;base64,YWJj");
        assert_eq!(
            decode_data_uri(&uri),
            Some(("image/png".to_string(), b"abc".to_vec()))
        );
        assert_eq!(decode_data_uri("image/png;base64,YWJj"), None);
        assert_eq!(decode_data_uri("data:image/png,abc"), None);
    }

    #[test]
    fn test_sniff_rejects_non_image_content() {
        let path = Path::new("fake.png");
        assert!(photo_data_uri(path, b"just text").is_err());
        let uri = photo_data_uri(path, PNG_SIGNATURE).unwrap();
        assert!(uri.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_loader_delivers_results() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let mut loader = PhotoLoader::new(runtime.handle().clone());

        let dir = scratch_dir("photo");
        std::fs::create_dir_all(&dir).unwrap();
        let png = dir.join("me.png");
        let text = dir.join("notes.png");
        std::fs::write(&png, PNG_SIGNATURE).unwrap();
        std::fs::write(&text, "hello").unwrap();

        let (done_tx, done_rx) = std_mpsc::channel();
        for path in [png.clone(), text.clone()] {
            let done_tx = done_tx.clone();
            loader.load(path, move || {
                let _ = done_tx.send(());
            });
        }
        for _ in 0..2 {
            done_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        }

        let loads = loader.poll();
        assert_eq!(loads.len(), 2);
        for load in loads {
            if load.path == png {
                assert!(load.result.unwrap().starts_with("data:image/png"));
            } else {
                assert!(matches!(load.result, Err(PhotoError::Unsupported(_))));
            }
        }

        let _ = std::fs::remove_dir_all(dir);
    }
}
