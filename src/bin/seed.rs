use mercado_api::{config::AppConfig, db::create_pool, ids};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    sqlx::migrate!("./migrations").run(&pool).await?;

    let vendedor_id = ensure_usuario(&pool, "vendedor@example.com", "Tienda Demo", true).await?;
    let cliente_id = ensure_usuario(&pool, "cliente@example.com", "Cliente Demo", false).await?;
    seed_productos(&pool, &vendedor_id).await?;

    println!("Seed completed. Vendedor ID: {vendedor_id}, Cliente ID: {cliente_id}");
    Ok(())
}

async fn ensure_usuario(
    pool: &sqlx::PgPool,
    correo: &str,
    nombre_usuario: &str,
    es_negocio: bool,
) -> anyhow::Result<String> {
    let existing: Option<(String,)> =
        sqlx::query_as("SELECT id_usuario FROM usuarios WHERE correo = $1")
            .bind(correo)
            .fetch_optional(pool)
            .await?;

    if let Some((id,)) = existing {
        println!("Usuario {correo} already present ({id})");
        return Ok(id);
    }

    let id_usuario = ids::generate_user_id(pool).await?;
    sqlx::query(
        r#"
        INSERT INTO usuarios (id_usuario, correo, nombre_usuario, contrasena, es_negocio)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(&id_usuario)
    .bind(correo)
    .bind(nombre_usuario)
    .bind("demo123")
    .bind(es_negocio)
    .execute(pool)
    .await?;

    println!("Ensured usuario {correo} ({id_usuario}, es_negocio={es_negocio})");
    Ok(id_usuario)
}

async fn seed_productos(pool: &sqlx::PgPool, id_vendedor: &str) -> anyhow::Result<()> {
    // Prices in centavos. Category codes come from the seed migration.
    let productos = vec![
        ("Sudadera con capucha", "Sudadera unisex de algodón", 59900_i64, 50, 1),
        ("Tenis urbanos", "Tenis ligeros para diario", 89900_i64, 30, 2),
        ("Taza de cerámica", "Taza esmaltada de 350 ml", 15900_i64, 100, 3),
        ("Audífonos inalámbricos", "Audífonos con estuche de carga", 129900_i64, 25, 4),
    ];

    for (nombre, descripcion, precio, stock, codigo_categoria) in productos {
        let existing: Option<(i64,)> = sqlx::query_as(
            "SELECT id_producto FROM productos WHERE nombre = $1 AND id_vendedor = $2",
        )
        .bind(nombre)
        .bind(id_vendedor)
        .fetch_optional(pool)
        .await?;

        if existing.is_some() {
            continue;
        }

        sqlx::query(
            r#"
            INSERT INTO productos (id_vendedor, nombre, descripcion, precio, stock, codigo_categoria)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(id_vendedor)
        .bind(nombre)
        .bind(descripcion)
        .bind(precio)
        .bind(stock)
        .bind(codigo_categoria)
        .execute(pool)
        .await?;
    }

    println!("Seeded productos");
    Ok(())
}
