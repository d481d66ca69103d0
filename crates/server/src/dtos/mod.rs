pub mod course;
pub mod home;
