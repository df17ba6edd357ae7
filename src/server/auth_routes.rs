//! Authorization-code login: redirect to the consent page, then trade the
//! returned code for tokens and hand them to the browser.

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::{error, info};

use super::error::ApiError;
use super::state::ServerState;
use crate::config::{ENV_SPOTIFY_CLIENT_ID, ENV_SPOTIFY_REDIRECT_URI};
use crate::spotify::auth::{authorize_url, post_login_location};

#[derive(Deserialize, Debug)]
pub struct CallbackParams {
    pub code: Option<String>,
}

pub async fn login(State(state): State<ServerState>) -> Result<Redirect, ApiError> {
    let client_id = state
        .oauth
        .client_id
        .as_deref()
        .ok_or_else(|| ApiError::missing_config(ENV_SPOTIFY_CLIENT_ID))?;
    let redirect_uri = state
        .oauth
        .redirect_uri
        .as_deref()
        .ok_or_else(|| ApiError::missing_config(ENV_SPOTIFY_REDIRECT_URI))?;

    Ok(Redirect::temporary(&authorize_url(
        &state.config.accounts_base_url,
        client_id,
        redirect_uri,
    )))
}

pub async fn callback(
    State(state): State<ServerState>,
    Query(params): Query<CallbackParams>,
) -> Result<Response, ApiError> {
    let code = params
        .code
        .filter(|code| !code.is_empty())
        .ok_or_else(|| ApiError::MissingInput("Missing authorization code".to_string()))?;

    let credentials = state
        .oauth
        .credentials()
        .map_err(ApiError::missing_config)?;

    let tokens = match state.music_api.exchange_code(&code, &credentials).await {
        Ok(tokens) => tokens,
        Err(err) => {
            error!("Token exchange failed: {}", err);
            return Err(ApiError::Upstream {
                message: "Error during authentication".to_string(),
                details: Some(err.details()),
            });
        }
    };

    info!("Token exchange succeeded, redirecting to the app");
    Ok((
        StatusCode::FOUND,
        [(header::LOCATION, post_login_location(&tokens))],
    )
        .into_response())
}
