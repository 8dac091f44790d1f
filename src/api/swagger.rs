use utoipa::OpenApi;
use utoipa::openapi::security::{SecurityScheme, HttpAuthScheme, HttpBuilder};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "E-Learning Service API",
        version = "1.0.0",
        description = "API documentation for the e-learning backend. \n\n**Authentication:** Most endpoints require a JWT Bearer token.\n\n**Features:**\n- Registration, login, and OTP-based password reset\n- Employee and student management\n- Class, course, section, and sub-section catalog\n- Course ratings\n- Attendance marking with admin status override",
        contact(
            name = "E-Learning Service Team"
        )
    ),
    paths(
        // Auth endpoints
        crate::api::auth::login,
        crate::api::auth::register,

        // Health
        crate::api::health::health_check,

        // Courses
        crate::api::courses::list_courses,
        crate::api::courses::create_course,

        // Attendance
        crate::api::attendance::mark,
    ),
    components(
        schemas(
            // Auth
            crate::services::auth_service::LoginRequest,
            crate::services::auth_service::RegisterRequest,
            crate::services::auth_service::AuthResponse,
            crate::services::auth_service::UserInfo,

            // Health
            crate::api::health::HealthResponse,

            // Users
            crate::models::UserRole,
            crate::models::UserResponse,

            // Courses
            crate::models::CreateCourseRequest,
            crate::models::CourseResponse,

            // Attendance
            crate::models::AttendanceStatus,
            crate::models::MarkAttendanceRequest,
            crate::models::AttendanceResponse,
        )
    ),
    tags(
        (name = "Auth", description = "Registration, login, token refresh, logout, and OTP password reset."),
        (name = "Health", description = "Health check endpoint for monitoring service status."),
        (name = "Courses", description = "Course catalog endpoints with pagination."),
        (name = "Attendance", description = "Attendance marking and listing. Admins may override the status of an existing day record."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Enter your JWT token"))
                        .build()
                ),
            );
        }
    }
}
