use envconfig::Envconfig;

#[derive(Envconfig, Debug, Clone)]
pub struct Config {
    #[envconfig(from = "DATABASE_URL", default = "postgresql://localhost/recipe_server")]
    pub database_url: String,

    #[envconfig(from = "RECIPE_SERVER_PORT", default = "3000")]
    pub server_port: u16,

    // Shared secret the hosted auth provider signs session tokens with.
    #[envconfig(from = "RECIPE_JWT_SECRET", default = "change-me-in-production")]
    pub jwt_secret: String,

    #[envconfig(from = "RECIPE_IMAGE_UPLOAD_DIR", default = "./uploads/images")]
    pub image_upload_dir: String,

    #[envconfig(from = "RECIPE_IMAGE_BASE_URL", default = "/images")]
    pub image_base_url: String,

    #[envconfig(from = "RECIPE_MAX_DB_CONNECTIONS", default = "5")]
    pub max_db_connections: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, envconfig::Error> {
        Self::init_from_env()
    }
}
