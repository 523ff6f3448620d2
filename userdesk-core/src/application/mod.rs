pub mod agent;
pub mod catalog;
pub mod session;
pub mod tooling;
