pub mod course;

pub use course::{Course, CourseRequest, NewCourse, REQUIRED_FIELDS_MESSAGE};
