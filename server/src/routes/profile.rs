//! Profile reads and onboarding writes.
//!
//! Unauthenticated requests are rejected by the extractor. A profile read
//! for a signed-in user always succeeds and reports the `onboarded` flag,
//! so the client can route to onboarding exactly once; `PUT` completes it.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use studymate_store::UserProfile;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

pub async fn get(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<UserProfile>, ApiError> {
    let profile = state
        .profiles
        .get_profile(&user.uid)
        .await?
        .unwrap_or_else(|| UserProfile::new(&user.uid));
    Ok(Json(profile))
}

/// Onboarding/settings payload; gamification counters are never written
/// directly by the client.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub display_name: Option<String>,
    pub subjects: Option<Vec<String>>,
    pub onboarded: Option<bool>,
}

pub async fn put(
    State(state): State<AppState>,
    user: AuthUser,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<UserProfile>, ApiError> {
    let mut profile = state
        .profiles
        .get_profile(&user.uid)
        .await?
        .unwrap_or_else(|| UserProfile::new(&user.uid));

    if let Some(display_name) = update.display_name {
        profile.display_name = Some(display_name).filter(|s| !s.trim().is_empty());
    }
    if let Some(subjects) = update.subjects {
        profile.subjects = subjects;
    }
    if let Some(onboarded) = update.onboarded {
        profile.onboarded = onboarded;
    }

    state.profiles.put_profile(profile.clone()).await?;
    Ok(Json(profile))
}
