pub mod attendance;
pub mod class;
pub mod course;
pub mod otp;
pub mod rating;
pub mod section;
pub mod user;

pub use attendance::*;
pub use class::*;
pub use course::*;
pub use otp::*;
pub use rating::*;
pub use section::*;
pub use user::*;
