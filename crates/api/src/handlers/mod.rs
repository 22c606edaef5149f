pub mod changes;
pub mod lifecycle;
pub mod manifest;
pub mod seating;
