use crate::{
    Error, Persona, PersonaId, PersonaInput, error::utilities::FoundExt,
    repositories::PersonaRepository,
};
use std::sync::Arc;

/// Service for administrative persona management
pub struct PersonaService<P: PersonaRepository> {
    repository: Arc<P>,
}

impl<P: PersonaRepository> PersonaService<P> {
    pub fn new(repository: Arc<P>) -> Self {
        Self { repository }
    }

    pub async fn list_personas(&self) -> Result<Vec<Persona>, Error> {
        self.repository.list().await
    }

    /// Get a persona by ID, failing with NotFound if absent
    pub async fn get_persona(&self, id: PersonaId) -> Result<Persona, Error> {
        self.repository
            .find_by_id(id)
            .await?
            .or_not_found("Persona")
    }

    pub async fn persona_exists(&self, id: PersonaId) -> Result<bool, Error> {
        self.repository.exists(id).await
    }

    pub async fn create_persona(&self, input: &PersonaInput) -> Result<Persona, Error> {
        let data = input.validate()?;
        let persona = self.repository.create(data).await?;
        tracing::info!(persona_id = %persona.id, "Persona created");
        Ok(persona)
    }

    /// Overwrite a persona; the input is validated before the store is touched
    pub async fn update_persona(
        &self,
        id: PersonaId,
        input: &PersonaInput,
    ) -> Result<Persona, Error> {
        let data = input.validate()?;
        self.repository.update(id, data).await
    }

    pub async fn delete_persona(&self, id: PersonaId) -> Result<(), Error> {
        self.repository.delete(id).await?;
        tracing::info!(persona_id = %id, "Persona deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::mock::MockStore;

    fn input(nombre: &str) -> PersonaInput {
        PersonaInput {
            nombre: nombre.to_string(),
            apellido_paterno: "Pérez".to_string(),
            apellido_materno: "Soto".to_string(),
            telefono: None,
            fecha_nacimiento: "1970-07-20".to_string(),
            genero: "otro".to_string(),
            direccion: None,
        }
    }

    #[tokio::test]
    async fn test_create_get_and_list() {
        let service = PersonaService::new(Arc::new(MockStore::default()));

        let created = service.create_persona(&input("Eva")).await.unwrap();
        service.create_persona(&input("Raúl")).await.unwrap();

        let fetched = service.get_persona(created.id).await.unwrap();
        assert_eq!(fetched, created);
        assert!(service.persona_exists(created.id).await.unwrap());

        let all = service.list_personas().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].nombre, "Eva");
    }

    #[tokio::test]
    async fn test_update_preserves_id() {
        let service = PersonaService::new(Arc::new(MockStore::default()));
        let created = service.create_persona(&input("Eva")).await.unwrap();

        let updated = service
            .update_persona(created.id, &input("Evangelina"))
            .await
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.nombre, "Evangelina");
        assert_eq!(
            service.get_persona(created.id).await.unwrap().nombre,
            "Evangelina"
        );
    }

    #[tokio::test]
    async fn test_missing_persona_is_not_found() {
        let store = Arc::new(MockStore::default());
        let service = PersonaService::new(store.clone());
        let missing = PersonaId::new(99);

        assert!(
            service
                .get_persona(missing)
                .await
                .unwrap_err()
                .is_not_found()
        );
        assert!(
            service
                .update_persona(missing, &input("Nadie"))
                .await
                .unwrap_err()
                .is_not_found()
        );
        assert!(
            service
                .delete_persona(missing)
                .await
                .unwrap_err()
                .is_not_found()
        );
        assert_eq!(store.persona_count().await, 0);
    }

    #[tokio::test]
    async fn test_invalid_update_is_rejected_before_lookup() {
        let service = PersonaService::new(Arc::new(MockStore::default()));
        let err = service
            .update_persona(PersonaId::new(99), &input(""))
            .await
            .unwrap_err();
        assert!(err.is_validation_error());
    }

    #[tokio::test]
    async fn test_delete_then_get() {
        let service = PersonaService::new(Arc::new(MockStore::default()));
        let created = service.create_persona(&input("Eva")).await.unwrap();

        service.delete_persona(created.id).await.unwrap();
        assert!(
            service
                .get_persona(created.id)
                .await
                .unwrap_err()
                .is_not_found()
        );
        assert!(!service.persona_exists(created.id).await.unwrap());
    }
}
