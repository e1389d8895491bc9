use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::ProductoResumen,
    response::Ack,
    state::AppState,
};

/// Shown for products that have no photo rows.
pub const PLACEHOLDER_IMAGE: &str = "https://placehold.co/300x400";

#[derive(Debug, Deserialize, ToSchema)]
pub struct CrearProductoRequest {
    pub id_vendedor: String,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub precio: i64,
    pub stock: i32,
    pub codigo_categoria: i32,
    pub imagen: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_product))
        .route("/{slug}", get(list_by_category))
}

#[utoipa::path(
    post,
    path = "/api/productos",
    request_body = CrearProductoRequest,
    responses(
        (status = 201, description = "Producto creado", body = Ack),
        (status = 403, description = "El usuario no puede vender"),
        (status = 500, description = "Error interno"),
    ),
    tag = "Productos"
)]
pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<CrearProductoRequest>,
) -> AppResult<(StatusCode, Json<Ack>)> {
    let vendedor: Option<(bool,)> =
        sqlx::query_as("SELECT es_negocio FROM usuarios WHERE id_usuario = $1")
            .bind(&payload.id_vendedor)
            .fetch_optional(&state.pool)
            .await?;

    if vendedor != Some((true,)) {
        return Err(AppError::Forbidden(
            "No autorizado para crear productos".to_string(),
        ));
    }

    // Product and photo land together or not at all.
    let mut tx = state.pool.begin().await?;

    let (id_producto,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO productos (id_vendedor, nombre, descripcion, precio, stock, codigo_categoria)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id_producto
        "#,
    )
    .bind(&payload.id_vendedor)
    .bind(&payload.nombre)
    .bind(&payload.descripcion)
    .bind(payload.precio)
    .bind(payload.stock)
    .bind(payload.codigo_categoria)
    .fetch_one(&mut *tx)
    .await?;

    if let Some(imagen) = &payload.imagen {
        sqlx::query("INSERT INTO fotos_producto (id_producto, url_imagen) VALUES ($1, $2)")
            .bind(id_producto)
            .bind(imagen)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    tracing::info!(id_producto, id_vendedor = %payload.id_vendedor, "producto creado");

    Ok((StatusCode::CREATED, Json(Ack::ok())))
}

#[utoipa::path(
    get,
    path = "/api/productos/{slug}",
    params(
        ("slug" = String, Path, description = "Category slug")
    ),
    responses(
        (status = 200, description = "Productos de la categoría", body = [ProductoResumen]),
        (status = 404, description = "Categoría no encontrada"),
    ),
    tag = "Productos"
)]
pub async fn list_by_category(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<Vec<ProductoResumen>>> {
    let categoria: Option<(i32,)> =
        sqlx::query_as("SELECT codigo_categoria FROM categorias WHERE slug = $1")
            .bind(&slug)
            .fetch_optional(&state.pool)
            .await?;

    let codigo_categoria = match categoria {
        Some((codigo,)) => codigo,
        None => return Err(AppError::NotFound("Categoría no encontrada".to_string())),
    };

    // DISTINCT ON keeps one row per product, carrying its first photo.
    let productos = sqlx::query_as::<_, ProductoResumen>(
        r#"
        SELECT DISTINCT ON (p.id_producto)
               p.id_producto AS id,
               p.nombre AS name,
               p.precio AS price,
               p.descripcion,
               COALESCE(f.url_imagen, $2) AS image
        FROM productos p
        LEFT JOIN fotos_producto f ON f.id_producto = p.id_producto
        WHERE p.codigo_categoria = $1
        ORDER BY p.id_producto, f.id_foto
        "#,
    )
    .bind(codigo_categoria)
    .bind(PLACEHOLDER_IMAGE)
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(productos))
}
