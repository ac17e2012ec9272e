use actix_web::{http::header, web, HttpResponse, Responder};

use crate::AppState;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/robots.txt").route(web::get().to(robots_txt)));
    cfg.service(web::resource("/api/robots").route(web::get().to(robots_txt)));
}

pub fn render_robots(site_url: &str) -> String {
    format!(
        "User-agent: *\n\
         Allow: /\n\
         \n\
         # Disallow admin and private areas\n\
         Disallow: /admin/\n\
         Disallow: /api/\n\
         Disallow: /_next/\n\
         Disallow: /private/\n\
         \n\
         # Sitemap\n\
         Sitemap: {}/sitemap.xml\n\
         \n\
         # Crawl-delay for respectful crawling\n\
         Crawl-delay: 1",
        site_url
    )
}

async fn robots_txt(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/plain")
        .insert_header((header::CACHE_CONTROL, "public, max-age=86400"))
        .body(render_robots(&state.config.site_url))
}
