// sweetshop/server/src/web/routes.rs

use actix_web::web;

use crate::web::handlers::{auth_handlers, inventory_handlers, sweet_handlers};

async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api")
      .route("/health", web::get().to(health_check_handler))
      .service(
        web::scope("/auth")
          .route("/register", web::post().to(auth_handlers::register_handler))
          .route("/login", web::post().to(auth_handlers::login_handler)),
      )
      // Fixed segments are registered before `/{id}` so they are never read as ids.
      .service(
        web::scope("/sweets")
          .route("", web::get().to(sweet_handlers::list_sweets_handler))
          .route("", web::post().to(sweet_handlers::create_sweet_handler))
          .route("/search", web::get().to(sweet_handlers::search_sweets_handler))
          .route("/purchase", web::post().to(inventory_handlers::purchase_handler))
          .route("/restock", web::post().to(inventory_handlers::restock_handler))
          .route("/{id}", web::get().to(sweet_handlers::get_sweet_handler))
          .route("/{id}", web::put().to(sweet_handlers::update_sweet_handler))
          .route("/{id}", web::delete().to(sweet_handlers::delete_sweet_handler))
          .route("/{id}/quantity", web::put().to(inventory_handlers::set_quantity_handler)),
      ),
  );
}
