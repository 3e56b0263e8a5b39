//! Post handlers: create-or-update, read and listings.

use actix_web::{HttpResponse, web};

use inkwell_core::service::ReadOptions;
use inkwell_shared::dto::{
    BlogDetail, BlogResponse, BlogsResponse, CountResponse, CreateBlogRequest, CreateBlogResponse,
    GetBlogRequest, PageRequest, SearchBlogsRequest,
};

use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /create-blog
pub async fn create_blog(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreateBlogRequest>,
) -> AppResult<HttpResponse> {
    let slug = state
        .blogs
        .create_or_update(identity.user_id, body.into_inner().into())
        .await?;

    Ok(HttpResponse::Ok().json(CreateBlogResponse { id: slug }))
}

/// POST /get-blog
pub async fn get_blog(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    body: web::Json<GetBlogRequest>,
) -> AppResult<HttpResponse> {
    let options = ReadOptions {
        draft: body.draft,
        edit_mode: body.is_edit_mode(),
    };
    let view = state
        .blogs
        .read(&body.blog_id, viewer.user_id(), options)
        .await?;

    Ok(HttpResponse::Ok().json(BlogResponse {
        blog: BlogDetail::from(view),
    }))
}

/// POST /latest-blogs
pub async fn latest_blogs(
    state: web::Data<AppState>,
    body: web::Json<PageRequest>,
) -> AppResult<HttpResponse> {
    let views = state.blogs.latest(body.page).await?;
    Ok(HttpResponse::Ok().json(BlogsResponse::from(views)))
}

/// POST /all-latest-blogs-count
pub async fn latest_blogs_count(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let total_docs = state.blogs.count_latest().await?;
    Ok(HttpResponse::Ok().json(CountResponse { total_docs }))
}

/// GET /trending-blogs
pub async fn trending_blogs(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let views = state.blogs.trending().await?;
    Ok(HttpResponse::Ok().json(BlogsResponse::from(views)))
}

/// POST /search-blogs
pub async fn search_blogs(
    state: web::Data<AppState>,
    body: web::Json<SearchBlogsRequest>,
) -> AppResult<HttpResponse> {
    let views = state
        .blogs
        .search(&body.criteria(), body.page, body.limit)
        .await?;
    Ok(HttpResponse::Ok().json(BlogsResponse::from(views)))
}

/// POST /search-blogs-count
pub async fn search_blogs_count(
    state: web::Data<AppState>,
    body: web::Json<SearchBlogsRequest>,
) -> AppResult<HttpResponse> {
    let total_docs = state.blogs.count_search(&body.criteria()).await?;
    Ok(HttpResponse::Ok().json(CountResponse { total_docs }))
}
