use actix_web::web;

pub mod health;
pub mod probe;
pub mod targets;

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health::health_route)
        .service(probe::check_status)
        .service(targets::create_target)
        .service(targets::list_targets)
        .service(targets::get_target)
        .service(targets::update_target)
        .service(targets::delete_target)
        .service(targets::target_summary)
        .service(targets::target_history);
}
