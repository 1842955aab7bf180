use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use chrono::Duration;
use clap::{Args, Parser, Subcommand};
use clinica::{
    Clinica, ClinicaConfig, JwtConfig, RegistroInput, Rol, SqliteRepositoryProvider, TokenConfig,
};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

/// One year
const MAX_TOKEN_TTL_HOURS: i64 = 8760;

/// Command line interface for the clinica server
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Database connection string
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite://clinica.db?mode=rwc"
    )]
    database_url: String,

    #[command(flatten)]
    serve: ServeArgs,

    /// Command to execute
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available CLI commands
#[derive(Subcommand)]
enum Commands {
    /// Run migrations and serve the HTTP API (default)
    Serve,
    /// Run database migrations
    Migrate,
    /// Create an administrador usuario together with its persona
    CreateAdmin(CreateAdminArgs),
}

#[derive(Args)]
struct ServeArgs {
    /// Address to listen on
    #[arg(long, env = "CLINICA_ADDR", default_value = "0.0.0.0:3000")]
    addr: SocketAddr,

    /// HS256 secret for access tokens; a random one is generated if unset
    #[arg(long, env = "CLINICA_JWT_SECRET", hide_env_values = true)]
    jwt_secret: Option<String>,

    /// Value of the `iss` claim, checked on every request
    #[arg(long, env = "CLINICA_JWT_ISSUER")]
    jwt_issuer: Option<String>,

    /// Lifetime of an access token, in hours (1 to 8760)
    #[arg(
        long,
        env = "CLINICA_TOKEN_TTL_HOURS",
        default_value_t = 24,
        value_parser = clap::value_parser!(i64).range(1..=MAX_TOKEN_TTL_HOURS)
    )]
    token_ttl_hours: i64,
}

#[derive(Args)]
struct CreateAdminArgs {
    #[arg(long)]
    correo: String,
    #[arg(long, env = "CLINICA_ADMIN_PASSWORD", hide_env_values = true)]
    contrasena: String,
    #[arg(long)]
    nombre: String,
    #[arg(long)]
    apellido_paterno: String,
    #[arg(long)]
    apellido_materno: String,
    /// Date of birth, DD/MM/YYYY
    #[arg(long)]
    fecha_nacimiento: String,
    #[arg(long, default_value = "otro")]
    genero: String,
    #[arg(long)]
    telefono: Option<String>,
    #[arg(long)]
    direccion: Option<String>,
}

impl CreateAdminArgs {
    fn into_registro(self) -> RegistroInput {
        RegistroInput {
            nombre: self.nombre,
            apellido_paterno: self.apellido_paterno,
            apellido_materno: self.apellido_materno,
            correo: self.correo,
            telefono: self.telefono,
            fecha_nacimiento: self.fecha_nacimiento,
            genero: self.genero,
            direccion: self.direccion,
            contrasena: self.contrasena,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("clinica=info,tower_http=debug")),
        )
        .init();

    let cli = Cli::parse();

    let repositories = Arc::new(
        SqliteRepositoryProvider::connect(&cli.database_url)
            .await
            .context("Failed to open database")?,
    );

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(repositories, cli.serve).await,
        Commands::Migrate => {
            let clinica = Clinica::new(repositories);
            clinica.migrate().await.context("Failed to run migrations")?;
            tracing::info!("Migrations applied");
            Ok(())
        }
        Commands::CreateAdmin(args) => create_admin(repositories, args).await,
    }
}

async fn serve(repositories: Arc<SqliteRepositoryProvider>, args: ServeArgs) -> anyhow::Result<()> {
    let config = ClinicaConfig::default().with_token_config(token_config(&args));
    let clinica = Arc::new(Clinica::with_config(repositories, config));
    clinica.migrate().await.context("Failed to run migrations")?;

    let app = clinica_axum::routes(clinica).layer(TraceLayer::new_for_http());

    let addr = args.addr;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Shut down");
    Ok(())
}

fn token_config(args: &ServeArgs) -> TokenConfig {
    let jwt = match &args.jwt_secret {
        Some(secret) => JwtConfig::new_hs256(secret.as_bytes().to_vec()),
        None => {
            tracing::warn!(
                "CLINICA_JWT_SECRET is not set, using a random secret; tokens will not survive a restart"
            );
            JwtConfig::new_random_hs256()
        }
    };
    let jwt = match &args.jwt_issuer {
        Some(issuer) => jwt.with_issuer(issuer.clone()),
        None => jwt,
    };

    TokenConfig::new(jwt).expires_in(Duration::hours(args.token_ttl_hours))
}

async fn create_admin(
    repositories: Arc<SqliteRepositoryProvider>,
    args: CreateAdminArgs,
) -> anyhow::Result<()> {
    let clinica = Clinica::new(repositories);
    clinica.migrate().await.context("Failed to run migrations")?;

    let admin = clinica
        .register_with_rol(&args.into_registro(), Rol::Administrador)
        .await
        .context("Failed to create administrador")?;

    tracing::info!(
        usuario_id = %admin.usuario_id,
        persona_id = %admin.persona_id,
        correo = %admin.correo,
        "Administrador created"
    );
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_ttl_hours_range() {
        let cli = Cli::try_parse_from(["clinica", "--token-ttl-hours", "48"]).unwrap();
        assert_eq!(cli.serve.token_ttl_hours, 48);

        for rejected in ["0", "-3", "8761", "9999999999999"] {
            let parsed = Cli::try_parse_from(["clinica", "--token-ttl-hours", rejected]);
            assert!(parsed.is_err(), "accepted {rejected}");
        }
    }

    #[test]
    fn test_create_admin_builds_registration() {
        let cli = Cli::try_parse_from([
            "clinica",
            "create-admin",
            "--correo",
            "admin@example.com",
            "--contrasena",
            "admin-segura-1",
            "--nombre",
            "Elena",
            "--apellido-paterno",
            "Rojas",
            "--apellido-materno",
            "Díaz",
            "--fecha-nacimiento",
            "12/05/1980",
        ])
        .unwrap();

        let Some(Commands::CreateAdmin(args)) = cli.command else {
            panic!("Expected the create-admin command");
        };
        let data = args.into_registro().validate().unwrap();
        assert_eq!(data.correo, "admin@example.com");
        assert_eq!(data.persona.nombre, "Elena");
    }
}
