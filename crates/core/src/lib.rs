pub mod assignment;
pub mod bootstrap;
pub mod change_log;
pub mod diff;
pub mod document;
pub mod error;
pub mod layout;
pub mod manifest;
pub mod roster;
pub mod roster_view;
pub mod seating;
pub mod sources;
pub mod types;
