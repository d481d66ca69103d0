pub mod assignment;
pub mod course;
pub mod lookup;
pub mod report;
