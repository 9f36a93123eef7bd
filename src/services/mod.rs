pub mod trips;
pub mod users;

pub use trips::TripService;
pub use users::UserService;
