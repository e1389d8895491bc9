use crate::{db::DbPool, uploads::Cloudinary};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub uploads: Cloudinary,
}
