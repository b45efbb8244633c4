pub mod healthcheck;
pub mod todos;
pub mod tokens;
pub mod users;
