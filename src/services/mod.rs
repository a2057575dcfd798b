//! Business logic services

pub mod assignment_service;
pub mod auth_service;
pub mod car_service;
pub mod complaint_service;
pub mod file_service;
pub mod mail_service;
pub mod region_service;
pub mod route_list_service;
pub mod route_service;
pub mod session_store;
pub mod setting_service;
pub mod user_service;
pub mod work_entry_service;

pub use assignment_service::AssignmentService;
pub use auth_service::AuthService;
pub use car_service::CarService;
pub use complaint_service::ComplaintService;
pub use file_service::FileService;
pub use mail_service::{MailService, Mailer};
pub use region_service::RegionService;
pub use route_list_service::RouteListService;
pub use route_service::RouteService;
pub use session_store::{RedisSessionStore, SessionStore};
pub use setting_service::SettingService;
pub use user_service::UserService;
pub use work_entry_service::WorkEntryService;
