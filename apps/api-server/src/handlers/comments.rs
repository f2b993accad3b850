//! Comment handlers.

use actix_web::{HttpResponse, web};

use parley_shared::dto::{AddCommentRequest, AddCommentResponse, SuccessResponse};

use super::posts::comment_response;
use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/posts/{post_id}/comments
pub async fn add_comment(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<String>,
    body: web::Json<AddCommentRequest>,
) -> AppResult<HttpResponse> {
    let comment = state
        .discussion
        .add_comment(identity.caller(), &path, &body.content)
        .await?;

    Ok(HttpResponse::Created().json(AddCommentResponse {
        success: true,
        comment: comment_response(comment),
    }))
}

/// DELETE /api/posts/{post_id}/comments/{comment_id}
pub async fn delete_comment(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<(String, String)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    state
        .discussion
        .delete_comment(identity.caller(), &post_id, &comment_id)
        .await?;

    Ok(HttpResponse::Ok().json(SuccessResponse::ok()))
}
