//! The `/api/v1` scope: API root plus one scope per collection.

use actix_web::{HttpRequest, Scope, web};
use serde_json::{Map, Value};

use crate::domain::{Article, Category, User};

use super::error::json_error_handler;
use super::resource::{API_BASE, HttpResource, resource_scope};

/// Collection names served under [`API_BASE`], in registration order.
pub const COLLECTIONS: [&str; 3] = [User::COLLECTION, Category::COLLECTION, Article::COLLECTION];

/// API root: maps each collection name to its absolute URL.
///
/// ```text
/// GET /api/v1
/// {"users":"http://host/api/v1/users", ...}
/// ```
async fn api_root(req: HttpRequest) -> web::Json<Map<String, Value>> {
    let info = req.connection_info();
    let base = format!("{}://{}{API_BASE}", info.scheme(), info.host());
    let links = COLLECTIONS
        .iter()
        .map(|name| ((*name).to_owned(), Value::String(format!("{base}/{name}"))))
        .collect();
    web::Json(links)
}

/// Every API route, with JSON body errors reported as `invalid_request`.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use backend::inbound::http::api::api_scope;
///
/// let app = App::new().service(api_scope());
/// # let _ = app;
/// ```
pub fn api_scope() -> Scope {
    web::scope(API_BASE)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .route("", web::get().to(api_root))
        .route("/", web::get().to(api_root))
        .service(resource_scope::<User>())
        .service(resource_scope::<Category>())
        .service(resource_scope::<Article>())
}
