use axum::{
    extract::{rejection::JsonRejection, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::{dto::MsgResponse, jwt::AuthUser},
    error::AppError,
    state::AppState,
    wins::{
        dto::{CreateWinRequest, WinView},
        services,
    },
};

pub fn win_routes() -> Router<AppState> {
    Router::new().route("/wins", get(list_wins).post(create_win))
}

#[instrument(skip(state))]
pub async fn list_wins(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<WinView>>, AppError> {
    let wins = services::list_wins(state.wins.as_ref(), user_id).await?;
    Ok(Json(wins))
}

#[instrument(skip(state, payload))]
pub async fn create_win(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<CreateWinRequest>, JsonRejection>,
) -> Result<Json<MsgResponse>, AppError> {
    let Json(payload) = payload?;
    services::create_win(state.wins.as_ref(), user_id, &payload).await?;
    Ok(Json(MsgResponse { msg: "Win added" }))
}
