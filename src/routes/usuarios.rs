use axum::{
    Json, Router,
    extract::{Multipart, Path, State, multipart::Field},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    ids,
    models::{PerfilUsuario, Usuario, UsuarioPublico},
    response::Ack,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/{id}", get(get_user).put(update_user))
}

/// Multipart fields accepted by [`register`]. Schema documentation only;
/// the handler walks the form manually.
#[derive(Debug, ToSchema)]
pub struct RegistroRequest {
    pub correo: String,
    pub nombre_usuario: String,
    pub contrasena: String,
    /// `"true"` marks a business account; anything else is a regular user.
    pub es_negocio: Option<String>,
    #[schema(value_type = Option<String>, format = Binary)]
    pub foto_perfil: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub correo: String,
    pub contrasena: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub success: bool,
    pub usuario: UsuarioPublico,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ActualizarUsuarioRequest {
    pub nombre_usuario: Option<String>,
    pub descripcion: Option<String>,
    pub localidad: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/usuarios",
    responses(
        (status = 200, description = "Todos los usuarios", body = [Usuario]),
    ),
    tag = "Usuarios"
)]
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<Usuario>>> {
    let usuarios = sqlx::query_as::<_, Usuario>("SELECT * FROM usuarios")
        .fetch_all(&state.pool)
        .await?;

    Ok(Json(usuarios))
}

#[derive(Debug, Default)]
struct RegistroForm {
    correo: Option<String>,
    nombre_usuario: Option<String>,
    contrasena: Option<String>,
    es_negocio: bool,
    avatar: Option<(Vec<u8>, String, String)>,
}

async fn read_text(field: Field<'_>) -> AppResult<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))
}

fn require(value: Option<String>, name: &str) -> AppResult<String> {
    value.ok_or_else(|| AppError::BadRequest(format!("Falta el campo {name}")))
}

async fn read_form(mut multipart: Multipart) -> AppResult<RegistroForm> {
    let mut form = RegistroForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            "correo" => form.correo = Some(read_text(field).await?),
            "nombre_usuario" => form.nombre_usuario = Some(read_text(field).await?),
            "contrasena" => form.contrasena = Some(read_text(field).await?),
            "es_negocio" => form.es_negocio = read_text(field).await? == "true",
            "foto_perfil" => {
                let filename = field.file_name().unwrap_or("foto_perfil").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                // Browsers send an empty part when no file was picked.
                if !data.is_empty() {
                    form.avatar = Some((data.to_vec(), filename, content_type));
                }
            }
            _ => {}
        }
    }

    Ok(form)
}

#[utoipa::path(
    post,
    path = "/api/usuarios/register",
    request_body(content = RegistroRequest, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Usuario registrado", body = Ack),
        (status = 409, description = "Correo ya registrado"),
        (status = 500, description = "Error interno"),
    ),
    tag = "Usuarios"
)]
pub async fn register(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Json<Ack>> {
    let form = read_form(multipart).await?;
    let correo = require(form.correo, "correo")?;
    let nombre_usuario = require(form.nombre_usuario, "nombre_usuario")?;
    let contrasena = require(form.contrasena, "contrasena")?;

    let existing: Option<(String,)> =
        sqlx::query_as("SELECT id_usuario FROM usuarios WHERE correo = $1")
            .bind(&correo)
            .fetch_optional(&state.pool)
            .await?;
    if existing.is_some() {
        return Err(AppError::Conflict("Correo ya registrado".to_string()));
    }

    let id_usuario = ids::generate_user_id(&state.pool).await?;

    let foto_perfil = match form.avatar {
        Some((data, filename, content_type)) => Some(
            state
                .uploads
                .upload_avatar(data, &filename, &content_type)
                .await?,
        ),
        None => None,
    };

    sqlx::query(
        r#"
        INSERT INTO usuarios (id_usuario, correo, nombre_usuario, contrasena, es_negocio, foto_perfil)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(&id_usuario)
    .bind(&correo)
    .bind(&nombre_usuario)
    .bind(&contrasena)
    .bind(form.es_negocio)
    .bind(&foto_perfil)
    .execute(&state.pool)
    .await
    .map_err(|e| {
        // Two concurrent registrations can both pass the lookup above; the
        // UNIQUE constraint on correo settles the race.
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.is_unique_violation()
            && db_err.constraint() == Some("usuarios_correo_key")
        {
            return AppError::Conflict("Correo ya registrado".to_string());
        }
        AppError::Db(e)
    })?;

    tracing::info!(id_usuario = %id_usuario, es_negocio = form.es_negocio, "usuario registrado");

    Ok(Json(Ack::ok()))
}

#[utoipa::path(
    post,
    path = "/api/usuarios/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credenciales válidas", body = LoginResponse),
        (status = 401, description = "Credenciales incorrectas"),
    ),
    tag = "Usuarios"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    // TODO: swap the plaintext equality for salted hashes once the stored
    // rows are migrated.
    let usuario = sqlx::query_as::<_, UsuarioPublico>(
        r#"
        SELECT id_usuario, correo, nombre_usuario, es_negocio, foto_perfil
        FROM usuarios
        WHERE correo = $1 AND contrasena = $2
        "#,
    )
    .bind(&payload.correo)
    .bind(&payload.contrasena)
    .fetch_optional(&state.pool)
    .await?
    .ok_or(AppError::Unauthorized)?;

    Ok(Json(LoginResponse {
        success: true,
        usuario,
    }))
}

#[utoipa::path(
    get,
    path = "/api/usuarios/{id}",
    params(
        ("id" = String, Path, description = "User id")
    ),
    responses(
        (status = 200, description = "Perfil del usuario", body = PerfilUsuario),
        (status = 404, description = "Usuario no encontrado"),
    ),
    tag = "Usuarios"
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<PerfilUsuario>> {
    let perfil = sqlx::query_as::<_, PerfilUsuario>(
        r#"
        SELECT u.id_usuario, u.correo, u.nombre_usuario, u.es_negocio, u.foto_perfil,
               v.descripcion, v.localidad
        FROM usuarios u
        LEFT JOIN vendedores v ON v.id_vendedor = u.id_usuario
        WHERE u.id_usuario = $1
        "#,
    )
    .bind(&id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Usuario no encontrado".to_string()))?;

    Ok(Json(perfil))
}

#[utoipa::path(
    put,
    path = "/api/usuarios/{id}",
    params(
        ("id" = String, Path, description = "User id")
    ),
    request_body = ActualizarUsuarioRequest,
    responses(
        (status = 200, description = "Perfil actualizado", body = Ack),
    ),
    tag = "Usuarios"
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ActualizarUsuarioRequest>,
) -> AppResult<Json<Ack>> {
    if let Some(nombre) = &payload.nombre_usuario {
        // Zero affected rows still acks; the contract has no existence check.
        sqlx::query("UPDATE usuarios SET nombre_usuario = $1 WHERE id_usuario = $2")
            .bind(nombre)
            .bind(&id)
            .execute(&state.pool)
            .await?;
    }

    if payload.descripcion.is_some() || payload.localidad.is_some() {
        let existing: Option<(Option<String>, Option<String>)> =
            sqlx::query_as("SELECT descripcion, localidad FROM vendedores WHERE id_vendedor = $1")
                .bind(&id)
                .fetch_optional(&state.pool)
                .await?;

        match existing {
            None => {
                sqlx::query(
                    "INSERT INTO vendedores (id_vendedor, descripcion, localidad) VALUES ($1, $2, $3)",
                )
                .bind(&id)
                .bind(&payload.descripcion)
                .bind(&payload.localidad)
                .execute(&state.pool)
                .await?;
            }
            // A field that arrives wins, even when empty; an absent field
            // keeps its stored value.
            Some((descripcion, localidad)) => {
                sqlx::query(
                    "UPDATE vendedores SET descripcion = $1, localidad = $2 WHERE id_vendedor = $3",
                )
                .bind(payload.descripcion.clone().or(descripcion))
                .bind(payload.localidad.clone().or(localidad))
                .bind(&id)
                .execute(&state.pool)
                .await?;
            }
        }
    }

    Ok(Json(Ack::ok()))
}
