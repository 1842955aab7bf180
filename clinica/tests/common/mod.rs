use std::sync::Arc;

use clinica::{
    Clinica, JwtConfig, PersonaInput, RegistroInput, SqliteRepositoryProvider, TokenConfig,
};

pub async fn setup_clinica() -> Clinica<SqliteRepositoryProvider> {
    let repositories = Arc::new(
        SqliteRepositoryProvider::connect("sqlite::memory:")
            .await
            .expect("Failed to open in-memory database"),
    );
    let jwt = JwtConfig::new_hs256(b"integration-test-secret".to_vec()).with_issuer("clinica-tests");
    let clinica = Clinica::new(repositories).with_token_config(TokenConfig::new(jwt));
    clinica.migrate().await.expect("Failed to migrate");
    clinica
}

pub fn registro(correo: &str) -> RegistroInput {
    RegistroInput {
        nombre: "Lucía".to_string(),
        apellido_paterno: "Hernández".to_string(),
        apellido_materno: "Ramos".to_string(),
        correo: correo.to_string(),
        telefono: Some("5512345678".to_string()),
        fecha_nacimiento: "03/11/1988".to_string(),
        genero: "femenino".to_string(),
        direccion: Some("Av. Reforma 100, CDMX".to_string()),
        contrasena: "contrasena-segura".to_string(),
    }
}

#[allow(dead_code)]
pub fn persona(nombre: &str) -> PersonaInput {
    PersonaInput {
        nombre: nombre.to_string(),
        apellido_paterno: "Torres".to_string(),
        apellido_materno: "Vega".to_string(),
        telefono: None,
        fecha_nacimiento: "1975-02-28".to_string(),
        genero: "masculino".to_string(),
        direccion: None,
    }
}
