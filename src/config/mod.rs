mod server;

pub use server::{
    ADMIN_PASSWORD_ENV, CONFIG_FILE_NAME, DB_FILE_NAME, FileConfig, ServerConfig,
};
