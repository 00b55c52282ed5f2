pub mod database;
pub mod jwt;
pub mod logging;
pub mod object_id;
