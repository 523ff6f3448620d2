pub mod capabilities;
pub mod chat;
pub mod health;
pub mod resources;
pub mod tools;
pub mod users;
