//! Database repositories
//!
//! Repositories handle all direct database interactions.

pub mod assignment_repo;
pub mod car_repo;
pub mod complaint_repo;
pub mod file_repo;
pub mod region_repo;
pub mod route_list_repo;
pub mod route_repo;
pub mod setting_repo;
pub mod user_repo;
pub mod work_entry_repo;

pub use assignment_repo::{AssetKind, AssignmentRepository};
pub use car_repo::{CarChanges, CarRepository, NewCar};
pub use complaint_repo::ComplaintRepository;
pub use file_repo::FileRepository;
pub use region_repo::RegionRepository;
pub use route_list_repo::RouteListRepository;
pub use route_repo::RouteRepository;
pub use setting_repo::SettingRepository;
pub use user_repo::{NewUser, ProfileChanges, UserRepository};
pub use work_entry_repo::{WorkEntryFilter, WorkEntryRepository};
