use actix_web::{HttpResponse, Responder, get};

/// Health check route. No body; the response status is enough.
#[get("/")]
pub async fn health_route() -> impl Responder {
    HttpResponse::Ok()
}
