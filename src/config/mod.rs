mod loader;
mod paths;
mod types;

pub use loader::API_URL_ENV;
pub use types::Config;
