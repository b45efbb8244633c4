pub mod manager;
pub mod models;
pub mod todos;
pub mod tokens;
pub mod users;
