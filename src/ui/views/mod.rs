pub mod chapters;
pub mod course;
pub mod course_select;
pub mod quiz;
pub mod workspace;
