pub mod attendance_service;
pub mod auth_service;
pub mod class_service;
pub mod course_service;
pub mod mail_service;
pub mod rating_service;
pub mod section_service;
pub mod user_service;
