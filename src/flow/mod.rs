pub mod event;
pub mod screen;
pub mod session;
