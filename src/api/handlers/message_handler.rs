//! Direct message handlers. Every route here needs a session.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::config::MAX_MESSAGE_LENGTH;
use crate::domain::{ConversationResponse, MessageResponse};
use crate::errors::AppResult;
use crate::types::Created;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SendMessageRequest {
    pub recipient_id: Uuid,
    #[validate(length(min = 1, max = MAX_MESSAGE_LENGTH, message = "Message must be between 1 and 2000 characters"))]
    #[schema(example = "See you at the meetup!")]
    pub content: String,
}

/// Create message routes
pub fn message_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_conversations).post(send_message))
        .route("/:user_id", get(get_thread))
}

/// Conversations, most recent first
#[utoipa::path(
    get,
    path = "/messages",
    tag = "Messages",
    responses(
        (status = 200, description = "Latest message per counterpart", body = [ConversationResponse]),
        (status = 401, description = "No session")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_conversations(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<ConversationResponse>>> {
    let conversations = state.message_service.conversations(current_user.id).await?;
    Ok(Json(
        conversations
            .into_iter()
            .map(ConversationResponse::from)
            .collect(),
    ))
}

/// Every message exchanged with one user, oldest first
#[utoipa::path(
    get,
    path = "/messages/{user_id}",
    tag = "Messages",
    params(("user_id" = Uuid, Path, description = "Other participant")),
    responses(
        (status = 200, description = "Thread", body = [MessageResponse]),
        (status = 401, description = "No session"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_thread(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<Vec<MessageResponse>>> {
    let messages = state
        .message_service
        .thread(current_user.id, user_id)
        .await?;
    Ok(Json(messages.into_iter().map(MessageResponse::from).collect()))
}

/// Send a message
#[utoipa::path(
    post,
    path = "/messages",
    tag = "Messages",
    request_body = SendMessageRequest,
    responses(
        (status = 201, description = "Message sent", body = MessageResponse),
        (status = 400, description = "Validation error or message to self"),
        (status = 401, description = "No session"),
        (status = 404, description = "Recipient not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn send_message(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ValidatedJson(payload): ValidatedJson<SendMessageRequest>,
) -> AppResult<Created<MessageResponse>> {
    let message = state
        .message_service
        .send(current_user.id, payload.recipient_id, payload.content)
        .await?;

    Ok(Created(MessageResponse::from(message)))
}
