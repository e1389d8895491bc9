use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Full `usuarios` row. `GET /api/usuarios` returns these as-is.
#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Usuario {
    pub id_usuario: String,
    pub correo: String,
    pub nombre_usuario: String,
    pub contrasena: String,
    pub es_negocio: bool,
    pub foto_perfil: Option<String>,
}

/// Login projection: every user field except the credential.
#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UsuarioPublico {
    pub id_usuario: String,
    pub correo: String,
    pub nombre_usuario: String,
    pub foto_perfil: Option<String>,
    pub es_negocio: bool,
}

/// `usuarios` merged with the optional `vendedores` row; the seller fields
/// are null until the first profile edit creates them.
#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PerfilUsuario {
    pub id_usuario: String,
    pub nombre_usuario: String,
    pub correo: String,
    pub foto_perfil: Option<String>,
    pub es_negocio: bool,
    pub descripcion: Option<String>,
    pub localidad: Option<String>,
}

/// Row of the category listing. `image` carries the first product photo, or
/// the placeholder URL for products without one.
#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ProductoResumen {
    pub id: i64,
    pub name: String,
    pub price: i64,
    pub descripcion: Option<String>,
    pub image: String,
}
