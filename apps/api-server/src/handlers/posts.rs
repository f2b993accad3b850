//! Post handlers.

use actix_web::{HttpResponse, web};

use parley_core::domain::{Comment, Post};
use parley_shared::dto::{
    CommentResponse, CreatePostRequest, EditPostRequest, EditPostResponse, PostResponse,
    SuccessResponse,
};

use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

pub(crate) fn comment_response(comment: Comment) -> CommentResponse {
    CommentResponse {
        id: comment.id,
        content: comment.content,
        author_id: comment.author_id,
        author_email: comment.author_email,
        created_at: comment.created_at,
    }
}

pub(crate) fn post_response(post: Post) -> PostResponse {
    PostResponse {
        id: post.id,
        content: post.content,
        author_id: post.author_id,
        author_email: post.author_email,
        created_at: post.created_at,
        comments: post.comments.into_iter().map(comment_response).collect(),
    }
}

/// GET /api/posts
pub async fn list_posts(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
) -> AppResult<HttpResponse> {
    let posts = state.discussion.get_posts(identity.caller()).await?;

    Ok(HttpResponse::Ok().json(posts.into_iter().map(post_response).collect::<Vec<_>>()))
}

/// POST /api/posts
pub async fn create_post(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let post = state
        .discussion
        .create_post(identity.caller(), &body.content)
        .await?;

    Ok(HttpResponse::Created().json(post_response(post)))
}

/// PUT /api/posts/{post_id}
pub async fn edit_post(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<String>,
    body: web::Json<EditPostRequest>,
) -> AppResult<HttpResponse> {
    let content = state
        .discussion
        .edit_post(identity.caller(), &path, &body.content)
        .await?;

    Ok(HttpResponse::Ok().json(EditPostResponse {
        success: true,
        content,
    }))
}

/// DELETE /api/posts/{post_id}
pub async fn delete_post(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    state.discussion.delete_post(identity.caller(), &path).await?;

    Ok(HttpResponse::Ok().json(SuccessResponse::ok()))
}
