mod api;
mod database;
mod middleware;
mod models;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::env;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    // Get configuration from environment
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "8000".to_string());
    let database_url = env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set");
    let frontend_url = env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());

    log::info!("🚀 Starting E-Learning Service...");
    log::info!("📊 Database: {}", database_url);

    // Initialize MongoDB connection
    let db = database::MongoDB::new(&database_url)
        .await
        .expect("Failed to connect to MongoDB");

    log::info!("✅ MongoDB connected successfully");

    let db_data = web::Data::new(db.clone());

    log::info!("🌐 Server starting on {}:{}", host, port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", host, port);
    log::info!("📄 OpenAPI spec at: http://{}:{}/api-docs/openapi.json", host, port);

    // Start HTTP server
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&frontend_url)
            .allowed_origin("http://localhost:3000")
            .allowed_origin("http://127.0.0.1:3000")
            .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .supports_credentials()
            .max_age(3600);

        // Generate OpenAPI specification
        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(db_data.clone())
            .wrap(cors)
            .wrap(middleware::SecurityHeaders)
            .wrap(Logger::default())
            // Swagger UI
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi.clone())
            )
            // Health check
            .route("/health", web::get().to(api::health::health_check))
            // Auth endpoints (token-free except /me)
            .service(
                web::scope("/api/v1/auth")
                    .route("/register", web::post().to(api::auth::register))
                    .route("/login", web::post().to(api::auth::login))
                    .route("/refresh", web::post().to(api::auth::refresh_token))
                    .route("/logout", web::post().to(api::auth::logout))
                    .route("/send-otp", web::post().to(api::auth::send_otp))
                    .route("/verify-otp", web::post().to(api::auth::verify_otp))
                    .route("/reset-password", web::post().to(api::auth::reset_password))
                    .service(
                        web::resource("/me")
                            .wrap(middleware::auth::AuthMiddleware)
                            .route(web::get().to(api::auth::get_me))
                    )
            )
            // Users: generic account management (admin gated in handlers)
            .service(
                web::scope("/api/v1/users")
                    .wrap(middleware::auth::AuthMiddleware)
                    .route("", web::get().to(api::users::list_users))
                    .route("/{user_id}", web::get().to(api::users::get_user))
                    .route("/{user_id}", web::patch().to(api::users::update_user))
                    .route("/{user_id}", web::delete().to(api::users::delete_user))
            )
            // Employees: staff accounts with generated credentials
            .service(
                web::scope("/api/v1/employees")
                    .wrap(middleware::auth::AuthMiddleware)
                    .route("", web::get().to(api::employees::list_employees))
                    .route("", web::post().to(api::employees::create_employee))
                    .route("/{user_id}", web::patch().to(api::employees::update_employee))
            )
            // Students
            .service(
                web::scope("/api/v1/students")
                    .wrap(middleware::auth::AuthMiddleware)
                    .route("", web::get().to(api::students::list_students))
                    .route("", web::post().to(api::students::create_student))
                    .route("/{user_id}", web::patch().to(api::students::update_student))
            )
            // Classes
            .service(
                web::scope("/api/v1/classes")
                    .wrap(middleware::auth::AuthMiddleware)
                    .route("", web::get().to(api::classes::list_classes))
                    .route("", web::post().to(api::classes::create_class))
                    .route("/{class_id}", web::get().to(api::classes::get_class))
                    .route("/{class_id}", web::patch().to(api::classes::update_class))
                    .route("/{class_id}", web::delete().to(api::classes::delete_class))
            )
            // Courses: the rating aggregate is public, everything else needs a token
            .service(
                web::scope("/api/v1/courses")
                    .route("/{course_id}/rating", web::get().to(api::courses::overall_rating))
                    .service(
                        web::resource("")
                            .wrap(middleware::auth::AuthMiddleware)
                            .route(web::get().to(api::courses::list_courses))
                            .route(web::post().to(api::courses::create_course))
                    )
                    .service(
                        web::resource("/{course_id}")
                            .wrap(middleware::auth::AuthMiddleware)
                            .route(web::get().to(api::courses::get_course))
                            .route(web::patch().to(api::courses::update_course))
                            .route(web::delete().to(api::courses::delete_course))
                    )
            )
            // Sections and sub-sections
            .service(
                web::scope("/api/v1/sections")
                    .wrap(middleware::auth::AuthMiddleware)
                    .route("", web::get().to(api::sections::list_sections))
                    .route("", web::post().to(api::sections::create_section))
                    .route("/{section_id}", web::patch().to(api::sections::update_section))
                    .route("/{section_id}", web::delete().to(api::sections::delete_section))
            )
            .service(
                web::scope("/api/v1/subsections")
                    .wrap(middleware::auth::AuthMiddleware)
                    .route("", web::get().to(api::sections::list_sub_sections))
                    .route("", web::post().to(api::sections::create_sub_section))
                    .route("/{sub_section_id}", web::patch().to(api::sections::update_sub_section))
                    .route("/{sub_section_id}", web::delete().to(api::sections::delete_sub_section))
            )
            // Ratings
            .service(
                web::scope("/api/v1/ratings")
                    .wrap(middleware::auth::AuthMiddleware)
                    .route("", web::post().to(api::ratings::post_review))
            )
            // Attendance
            .service(
                web::scope("/api/v1/attendance")
                    .wrap(middleware::auth::AuthMiddleware)
                    .route("/mark", web::post().to(api::attendance::mark))
                    .route("", web::get().to(api::attendance::list))
            )
    })
    .bind(format!("{}:{}", host, port))?
    .run()
    .await
}
