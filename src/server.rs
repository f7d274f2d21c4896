use actix_web::{
    error::{InternalError, JsonPayloadError},
    guard,
    http::header,
    middleware::{DefaultHeaders, Logger},
    web, App, HttpRequest, HttpResponse, HttpServer,
};
use serde_json::json;

use crate::{
    config::Config,
    error::SiteGenError,
    models::{GenerationRequest, ImageGenerationRequest, ImageGenerationResponse},
    pipeline::Pipeline,
};

pub const ALLOWED_HEADERS: &str = "authorization, x-client-info, apikey, content-type";

// Reference images arrive inline as data URIs.
const JSON_BODY_LIMIT: usize = 10 * 1024 * 1024;

/// Open CORS headers added to every response, errors included.
pub fn cors_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add((header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"))
        .add((header::ACCESS_CONTROL_ALLOW_HEADERS, ALLOWED_HEADERS))
        .add((header::ACCESS_CONTROL_ALLOW_METHODS, "GET, POST, OPTIONS"))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(JSON_BODY_LIMIT)
            .error_handler(json_error_handler),
    )
    .service(
        web::resource("/{tail:.*}")
            .guard(guard::Options())
            .to(preflight),
    )
    .route("/", web::post().to(generate_website))
    .route("/generate-website", web::post().to(generate_website))
    .route("/generate-images", web::post().to(generate_images))
    .route("/health", web::get().to(health));
}

pub async fn serve(config: Config, pipeline: Pipeline) -> std::io::Result<()> {
    let data = web::Data::new(pipeline);
    let (host, port) = config.bind_address();

    HttpServer::new(move || {
        App::new()
            .wrap(cors_headers())
            .wrap(Logger::new("%r %s %Dms"))
            .app_data(data.clone())
            .configure(configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}

async fn preflight() -> HttpResponse {
    HttpResponse::Ok().finish()
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

async fn generate_website(
    pipeline: web::Data<Pipeline>,
    request: web::Json<GenerationRequest>,
) -> Result<HttpResponse, SiteGenError> {
    let bundle = pipeline.run(&request).await?;
    Ok(HttpResponse::Ok().json(bundle))
}

async fn generate_images(
    pipeline: web::Data<Pipeline>,
    request: web::Json<ImageGenerationRequest>,
) -> Result<HttpResponse, SiteGenError> {
    let images = pipeline.generate_images(&request.prompts).await?;
    Ok(HttpResponse::Ok().json(ImageGenerationResponse::from(images)))
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = err.to_string();
    log::warn!("⚠️  Rejected request body: {}", message);
    InternalError::from_response(err, HttpResponse::BadRequest().json(json!({ "error": message })))
        .into()
}
