pub mod course;
pub mod health;
pub mod home;
pub mod root;
