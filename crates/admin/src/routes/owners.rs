//! Owner admin handlers.

use std::collections::HashMap;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
};
use serde::Deserialize;
use tokio::io::AsyncWriteExt;
use tracing::instrument;

use meroghar_core::{OwnerId, ProfilePicture, UserId};

use crate::{
    db::OwnerRepository,
    error::AppError,
    listing::{self, ListQuery, Listing, ListingConfig, ListingError, owners::OwnerListItem},
    middleware::RequireStaff,
    models::{Home, Owner, OwnerFields},
    state::AppState,
};

/// Build the owner router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/owners", get(index).post(create))
        .route("/admin/owners/config", get(config))
        .route("/admin/owners/{id}", get(show).put(update).delete(destroy))
        .route("/admin/owners/{id}/homes", get(homes))
        .route("/admin/owners/{id}/picture", put(upload_picture))
}

/// Request to create an owner for an existing user account.
#[derive(Debug, Deserialize)]
pub struct CreateOwnerRequest {
    pub user_id: UserId,
    #[serde(flatten)]
    pub fields: OwnerFields,
}

/// Owner listing with search and filters.
#[instrument(skip(staff, state), fields(user_id = %staff.id))]
pub async fn index(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Listing<OwnerListItem>>, AppError> {
    let query = ListQuery::from_params(params);
    Ok(Json(listing::owners::list(state.pool(), &query).await?))
}

/// Listing configuration, with filter options loaded.
pub async fn config(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
) -> Result<Json<ListingConfig>, AppError> {
    let config = listing::owners::config()
        .load_options(state.pool())
        .await
        .map_err(ListingError::from)?;
    Ok(Json(config))
}

/// Create an owner.
#[instrument(skip(staff, state, body), fields(user_id = %staff.id))]
pub async fn create(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
    Json(body): Json<CreateOwnerRequest>,
) -> Result<(StatusCode, Json<Owner>), AppError> {
    let owner = OwnerRepository::new(state.pool())
        .create(body.user_id, &body.fields)
        .await?;
    Ok((StatusCode::CREATED, Json(owner)))
}

/// Owner detail.
pub async fn show(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<OwnerId>,
) -> Result<Json<Owner>, AppError> {
    OwnerRepository::new(state.pool())
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("owner {id}")))
}

/// Replace an owner's profile fields.
#[instrument(skip(staff, state, fields), fields(user_id = %staff.id))]
pub async fn update(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<OwnerId>,
    Json(fields): Json<OwnerFields>,
) -> Result<Json<Owner>, AppError> {
    let owner = OwnerRepository::new(state.pool()).update(id, &fields).await?;
    Ok(Json(owner))
}

/// Delete an owner and their homes.
#[instrument(skip(staff, state), fields(user_id = %staff.id))]
pub async fn destroy(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<OwnerId>,
) -> Result<StatusCode, AppError> {
    OwnerRepository::new(state.pool()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Query string of a profile picture upload.
#[derive(Debug, Deserialize)]
pub struct PictureUpload {
    pub filename: String,
}

/// Attempts at a free file name before an upload is refused.
const MAX_NAME_ATTEMPTS: u32 = 100;

/// Store an uploaded profile picture under the media root and point the
/// owner at it. The request body is the raw image.
///
/// An existing file is never overwritten; a taken name gets a numeric tag.
///
/// PUT /admin/owners/{id}/picture?filename=jane.jpg
#[instrument(skip(staff, state, body), fields(user_id = %staff.id, bytes = body.len()))]
pub async fn upload_picture(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<OwnerId>,
    Query(upload): Query<PictureUpload>,
    body: Bytes,
) -> Result<Json<Owner>, AppError> {
    if body.is_empty() {
        return Err(AppError::BadRequest("empty upload".to_string()));
    }
    let picture = ProfilePicture::for_upload(&upload.filename)?;

    let repo = OwnerRepository::new(state.pool());
    if repo.get(id).await?.is_none() {
        return Err(AppError::NotFound(format!("owner {id}")));
    }

    let picture = save_upload(&state.config().media_root, &picture, &body).await?;
    let owner = repo.set_profile_picture(id, &picture).await?;
    Ok(Json(owner))
}

/// Write `body` to the first free name derived from `picture`.
async fn save_upload(
    media_root: &std::path::Path,
    picture: &ProfilePicture,
    body: &[u8],
) -> Result<ProfilePicture, AppError> {
    let io_error = |what: &str, e: std::io::Error| AppError::Internal(format!("{what}: {e}"));

    if let Some(dir) = media_root.join(picture.as_str()).parent() {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| io_error("create media directory", e))?;
    }

    for attempt in 0..MAX_NAME_ATTEMPTS {
        let candidate = if attempt == 0 {
            picture.clone()
        } else {
            picture.with_tag(&attempt.to_string())
        };
        let opened = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(media_root.join(candidate.as_str()))
            .await;
        let mut file = match opened {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(io_error("open profile picture", e)),
        };
        file.write_all(body)
            .await
            .map_err(|e| io_error("write profile picture", e))?;
        file.flush()
            .await
            .map_err(|e| io_error("write profile picture", e))?;
        tracing::info!(path = %candidate.as_str(), "profile picture stored");
        return Ok(candidate);
    }

    Err(AppError::Internal(format!(
        "no free file name for {}",
        picture.as_str()
    )))
}

/// An owner's homes.
pub async fn homes(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<OwnerId>,
) -> Result<Json<Vec<Home>>, AppError> {
    let repo = OwnerRepository::new(state.pool());
    if repo.get(id).await?.is_none() {
        return Err(AppError::NotFound(format!("owner {id}")));
    }
    Ok(Json(repo.homes(id).await?))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use meroghar_core::MaritalStatus;

    use super::*;

    fn scratch_dir(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("meroghar-{name}-{}", std::process::id()))
    }

    #[tokio::test]
    async fn test_save_upload_never_overwrites() {
        let root = scratch_dir("same-name");
        let _ = std::fs::remove_dir_all(&root);
        let picture = ProfilePicture::for_upload("photo.jpg").unwrap();

        let first = save_upload(&root, &picture, b"owner one").await.unwrap();
        let second = save_upload(&root, &picture, b"owner two").await.unwrap();

        assert_eq!(first.as_str(), "owner_profile_pics/photo.jpg");
        assert_eq!(second.as_str(), "owner_profile_pics/photo_1.jpg");
        assert_eq!(std::fs::read(root.join(first.as_str())).unwrap(), b"owner one");
        assert_eq!(std::fs::read(root.join(second.as_str())).unwrap(), b"owner two");

        std::fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_create_request_flattens_fields() {
        let body: CreateOwnerRequest = serde_json::from_str(
            r#"{"user_id":7,"phone_number":"555-1234","date_of_birth":"1980-01-01","marital_status":"Married"}"#,
        )
        .unwrap();
        assert_eq!(body.user_id, UserId::new(7));
        assert_eq!(body.fields.phone_number, "555-1234");
        assert_eq!(body.fields.marital_status, MaritalStatus::Married);
    }
}
