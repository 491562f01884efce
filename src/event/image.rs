use crate::infra::static_dir;
use anyhow::{Context as _, Result};
use rocket::fairing::{self, Fairing};
use rocket::{error, warn};
use rocket::fs::TempFile;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub(crate) const ALLOWED_IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "gif"];

pub(crate) const INVALID_IMAGE_FORMAT: &str =
    "Invalid image format. Allowed formats: .jpg, .jpeg, .png, .gif.";

const IMAGES_DIRECTORY: &str = "images";

/// Stores uploaded event images below the public directory,
/// from where the static file server picks them up.
#[derive(Debug)]
pub(crate) struct ImageStore {
    directory: PathBuf,
}

impl ImageStore {
    pub(crate) fn new(static_dir: impl AsRef<Path>) -> Self {
        Self {
            directory: static_dir.as_ref().join(IMAGES_DIRECTORY),
        }
    }

    pub(crate) fn directory(&self) -> &Path {
        &self.directory
    }

    pub(crate) fn fairing() -> impl Fairing {
        fairing::AdHoc::try_on_ignite("Image Store", |rocket| async {
            let store = ImageStore::new(static_dir(rocket.figment()));
            match store.create_directory().await {
                Ok(()) => Ok(rocket.manage(store)),
                Err(e) => {
                    error!("Failed to prepare image directory: {e:?}");
                    Err(rocket)
                }
            }
        })
    }

    async fn create_directory(&self) -> Result<()> {
        rocket::tokio::fs::create_dir_all(&self.directory).await?;
        Ok(())
    }

    /// Copies the upload to a freshly named file and
    /// returns the public path under which it is served.
    pub(crate) async fn save(&self, file: &mut TempFile<'_>, extension: &str) -> Result<String> {
        let file_name = format!("{}.{extension}", Uuid::new_v4());
        file.copy_to(self.directory.join(&file_name)).await?;
        Ok(format!("/{IMAGES_DIRECTORY}/{file_name}"))
    }

    /// Deletes an image previously stored by [`ImageStore::save`].
    pub(crate) async fn remove(&self, public_path: &str) -> Result<()> {
        let file_name = public_path
            .strip_prefix(&format!("/{IMAGES_DIRECTORY}/"))
            .filter(|name| !name.is_empty() && !name.contains(['/', '\\']))
            .with_context(|| format!("not a stored image: {public_path}"))?;
        rocket::tokio::fs::remove_file(self.directory.join(file_name)).await?;
        Ok(())
    }

    /// Deletes an image that ended up without an event pointing at it.
    pub(crate) async fn discard(&self, public_path: &str) {
        if let Err(e) = self.remove(public_path).await {
            warn!("Failed to remove orphaned image {public_path}: {e:?}");
        }
    }
}

/// The lowercased extension of an uploaded file's original name,
/// if it is one of the accepted image formats.
pub(crate) fn allowed_image_extension(file: &TempFile<'_>) -> Option<String> {
    let raw_name = file.raw_name()?.dangerous_unsafe_unsanitized_raw();
    image_extension(raw_name.as_str())
}

fn image_extension(file_name: &str) -> Option<String> {
    let extension = Path::new(file_name).extension()?.to_str()?.to_lowercase();
    ALLOWED_IMAGE_EXTENSIONS
        .contains(&extension.as_str())
        .then_some(extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_image_extensions_regardless_of_case() {
        assert_eq!(Some("jpg".to_owned()), image_extension("holiday.JPG"));
        assert_eq!(Some("jpeg".to_owned()), image_extension("holiday.jpeg"));
        assert_eq!(Some("png".to_owned()), image_extension("poster.Png"));
        assert_eq!(Some("gif".to_owned()), image_extension("dance.gif"));
    }

    #[test]
    fn rejects_other_extensions() {
        assert_eq!(None, image_extension("invoice.pdf"));
        assert_eq!(None, image_extension("script.jpg.exe"));
        assert_eq!(None, image_extension("no-extension"));
        assert_eq!(None, image_extension(".png"));
    }

    #[test]
    fn public_paths_point_into_the_images_directory() {
        let store = ImageStore::new("public");
        assert_eq!(PathBuf::from("public/images"), store.directory);
    }

    #[rocket::async_test]
    async fn only_stored_images_are_removed() {
        let directory = tempfile::tempdir().unwrap();
        let store = ImageStore::new(directory.path());
        store.create_directory().await.unwrap();
        std::fs::write(directory.path().join("keep.txt"), "keep").unwrap();
        std::fs::write(store.directory().join("poster.png"), "png").unwrap();

        assert!(store.remove("/images/../keep.txt").await.is_err());
        assert!(store.remove("/static/site.css").await.is_err());
        assert!(directory.path().join("keep.txt").exists());

        store.remove("/images/poster.png").await.unwrap();
        assert!(!store.directory().join("poster.png").exists());
    }
}
