//! Domain models
//!
//! Database rows and the small amount of domain logic that belongs to them.

pub mod car;
pub mod complaint;
pub mod file;
pub mod region;
pub mod route;
pub mod route_list;
pub mod setting;
pub mod user;
pub mod work_entry;

pub use car::*;
pub use complaint::*;
pub use file::*;
pub use region::*;
pub use route::*;
pub use route_list::*;
pub use setting::*;
pub use user::*;
pub use work_entry::*;
