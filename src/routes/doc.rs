use utoipa::{OpenApi, openapi::OpenApi as OpenApiSpec};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    models::{PerfilUsuario, ProductoResumen, Usuario, UsuarioPublico},
    response::Ack,
    routes::{health, productos, usuarios},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        productos::create_product,
        productos::list_by_category,
        usuarios::list_users,
        usuarios::register,
        usuarios::login,
        usuarios::get_user,
        usuarios::update_user
    ),
    components(
        schemas(
            Usuario,
            UsuarioPublico,
            PerfilUsuario,
            ProductoResumen,
            Ack,
            productos::CrearProductoRequest,
            usuarios::RegistroRequest,
            usuarios::LoginRequest,
            usuarios::LoginResponse,
            usuarios::ActualizarUsuarioRequest
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Productos", description = "Product endpoints"),
        (name = "Usuarios", description = "User account endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
