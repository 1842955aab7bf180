use crate::{
    Error, NewUsuario, Persona, RegistroData, RegistroInput, RegistroResponse, Rol, Usuario,
    crypto::hash_password,
    repositories::{RegistrationRepository, UnitOfWork},
};
use std::sync::Arc;

/// Service for public self-registration
///
/// A registration writes a persona and its usuario inside one unit of work:
/// either both rows are committed or neither is. Public registrations always
/// get the `paciente` role.
pub struct RegistrationService<R: RegistrationRepository> {
    repository: Arc<R>,
}

impl<R: RegistrationRepository> RegistrationService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub async fn register(&self, input: &RegistroInput) -> Result<RegistroResponse, Error> {
        self.register_with_rol(input, Rol::Paciente).await
    }

    /// Register with an explicit role, used to bootstrap administrators
    pub async fn register_with_rol(
        &self,
        input: &RegistroInput,
        rol: Rol,
    ) -> Result<RegistroResponse, Error> {
        let data = input.validate()?;

        let mut unit = self.repository.begin().await?;
        let written = write_registration(unit.as_mut(), data, rol).await;
        let (persona, usuario) = match written {
            Ok(rows) => rows,
            Err(e) => return abort(unit, e).await,
        };

        unit.commit().await?;

        tracing::info!(
            usuario_id = %usuario.id,
            persona_id = %persona.id,
            rol = %usuario.rol,
            "Registration completed"
        );

        Ok(RegistroResponse {
            usuario_id: usuario.id,
            persona_id: persona.id,
            correo: usuario.correo,
            rol: usuario.rol,
            nombre_completo: persona.nombre_completo(),
        })
    }
}

/// Persona first, then the hashed usuario referencing it
async fn write_registration(
    unit: &mut dyn UnitOfWork,
    data: RegistroData,
    rol: Rol,
) -> Result<(Persona, Usuario), Error> {
    let persona = unit.create_persona(data.persona).await?;
    let password_hash = hash_password(&data.contrasena).await?;
    let usuario = unit
        .create_usuario(NewUsuario {
            persona_id: persona.id,
            rol,
            correo: data.correo,
            password_hash,
        })
        .await?;
    Ok((persona, usuario))
}

/// Roll the unit back and report the error that caused it
async fn abort<T>(unit: Box<dyn UnitOfWork>, error: Error) -> Result<T, Error> {
    tracing::warn!(error = %error, "Registration aborted, rolling back");
    if let Err(rollback_error) = unit.rollback().await {
        tracing::error!(error = %rollback_error, "Failed to roll back registration");
    }
    Err(error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::ValidationError, repositories::UsuarioRepository, services::mock::MockStore,
    };

    fn input(correo: &str) -> RegistroInput {
        RegistroInput {
            nombre: "Sofía".to_string(),
            apellido_paterno: "Mendoza".to_string(),
            apellido_materno: "Cruz".to_string(),
            correo: correo.to_string(),
            telefono: Some("5550001111".to_string()),
            fecha_nacimiento: "24/08/1995".to_string(),
            genero: "femenino".to_string(),
            direccion: None,
            contrasena: "paciente-123".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_creates_persona_and_paciente() {
        let store = Arc::new(MockStore::default());
        let service = RegistrationService::new(store.clone());

        let response = service.register(&input("sofia@example.com")).await.unwrap();

        assert_eq!(response.rol, Rol::Paciente);
        assert_eq!(response.correo, "sofia@example.com");
        assert_eq!(response.nombre_completo, "Sofía Mendoza");
        assert_eq!(store.persona_count().await, 1);
        assert_eq!(store.usuario_count().await, 1);

        let usuario = UsuarioRepository::find_by_id(&*store, response.usuario_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(usuario.persona_id, response.persona_id);

        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("paciente-123"));
        assert!(!json.contains("argon2"));
    }

    #[tokio::test]
    async fn test_duplicate_email_rolls_back_persona() {
        let store = Arc::new(MockStore::default());
        let service = RegistrationService::new(store.clone());

        service.register(&input("sofia@example.com")).await.unwrap();
        let err = service
            .register(&input("sofia@example.com"))
            .await
            .unwrap_err();

        assert!(err.is_conflict());
        assert_eq!(store.persona_count().await, 1);
        assert_eq!(store.usuario_count().await, 1);
    }

    #[tokio::test]
    async fn test_invalid_input_has_no_effect() {
        let store = Arc::new(MockStore::default());
        let service = RegistrationService::new(store.clone());

        let mut bad = input("not-an-email");
        bad.fecha_nacimiento = "1995-08-24".to_string();

        match service.register(&bad).await.unwrap_err() {
            Error::Validation(ValidationError::Fields(errors)) => {
                assert!(errors.contains("correo"));
                assert!(errors.contains("fecha_nacimiento"));
            }
            e => panic!("Expected field errors, got {e:?}"),
        }
        assert_eq!(store.persona_count().await, 0);
    }

    #[tokio::test]
    async fn test_register_with_rol_is_atomic() {
        let store = Arc::new(MockStore::default());
        let service = RegistrationService::new(store.clone());

        let admin = service
            .register_with_rol(&input("admin@example.com"), Rol::Administrador)
            .await
            .unwrap();
        assert_eq!(admin.rol, Rol::Administrador);

        let err = service
            .register_with_rol(&input("admin@example.com"), Rol::Administrador)
            .await
            .unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(store.persona_count().await, 1);
        assert_eq!(store.usuario_count().await, 1);
    }
}
