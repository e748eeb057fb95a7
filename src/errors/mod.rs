pub mod anyhow;
pub mod axum;
pub mod io;
pub mod yaml;
