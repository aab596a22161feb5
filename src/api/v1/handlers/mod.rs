pub mod health;
pub mod lms;
pub mod submissions;
pub mod users;
