//! Profile picture references.
//!
//! The bytes live in blob storage; records only keep the relative path
//! under the media root, e.g. `owner_profile_pics/jane.jpg`.

use serde::{Deserialize, Serialize};

use super::field::FieldError;

/// Relative blob path of an owner's profile picture.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfilePicture(String);

impl ProfilePicture {
    /// Directory (under the media root) that profile pictures are uploaded to.
    pub const UPLOAD_DIR: &'static str = "owner_profile_pics";

    /// Column length of the stored path.
    pub const MAX_LENGTH: usize = 100;

    const EXTENSIONS: [&'static str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

    /// Build the stored path for an uploaded file name.
    ///
    /// Only the final path component of `file_name` is kept, so
    /// `"../../etc/passwd.png"` becomes `owner_profile_pics/passwd.png`.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::Required`] for an empty name,
    /// [`FieldError::InvalidChoice`] for a non-image extension and
    /// [`FieldError::TooLong`] when the full path exceeds the column.
    pub fn for_upload(file_name: &str) -> Result<Self, FieldError> {
        let base = file_name
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or_default()
            .trim();
        if base.is_empty() || base.starts_with('.') {
            return Err(FieldError::Required {
                field: "profile_picture",
            });
        }

        let has_image_ext = base.rsplit_once('.').is_some_and(|(_, ext)| {
            Self::EXTENSIONS
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(ext))
        });
        if !has_image_ext {
            return Err(FieldError::InvalidChoice {
                field: "profile_picture",
                value: base.to_owned(),
            });
        }

        let path = format!("{}/{base}", Self::UPLOAD_DIR);
        let len = path.chars().count();
        if len > Self::MAX_LENGTH {
            return Err(FieldError::TooLong {
                field: "profile_picture",
                max: Self::MAX_LENGTH,
                len,
            });
        }
        Ok(Self(path))
    }

    /// The same upload with `_<tag>` inserted before the extension, for
    /// when the plain name is already taken. The stem is shortened if the
    /// path would outgrow the column.
    #[must_use]
    pub fn with_tag(&self, tag: &str) -> Self {
        let (dir, file) = self.0.rsplit_once('/').unwrap_or(("", &self.0));
        let (stem, ext) = file.rsplit_once('.').unwrap_or((file, ""));

        let fixed = dir.chars().count() + tag.chars().count() + ext.chars().count() + 3;
        let keep = Self::MAX_LENGTH.saturating_sub(fixed).max(1);
        let stem: String = stem.chars().take(keep).collect();

        Self(format!("{dir}/{stem}_{tag}.{ext}"))
    }

    /// Wrap a path read back from storage.
    #[must_use]
    pub const fn from_stored(path: String) -> Self {
        Self(path)
    }

    /// Relative path under the media root.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Public URL given the media URL prefix (e.g. `/media`).
    #[must_use]
    pub fn url(&self, media_url: &str) -> String {
        format!("{}/{}", media_url.trim_end_matches('/'), self.0)
    }
}

impl AsRef<str> for ProfilePicture {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
