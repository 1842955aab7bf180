//! In-memory repositories shared by the service tests
use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::{
    Error, NewPersona, NewUsuario, Persona, PersonaId, Usuario, UsuarioId,
    repositories::{PersonaRepository, RegistrationRepository, UnitOfWork, UsuarioRepository},
};

#[derive(Debug, Clone, Default)]
struct State {
    personas: BTreeMap<PersonaId, Persona>,
    usuarios: BTreeMap<UsuarioId, (Usuario, String)>,
    next_persona_id: i64,
    next_usuario_id: i64,
}

impl State {
    fn insert_persona(&mut self, data: NewPersona) -> Persona {
        self.next_persona_id += 1;
        let id = PersonaId::new(self.next_persona_id);
        let persona = Persona::builder()
            .id(id)
            .data(data)
            .build()
            .expect("mock persona is complete");
        self.personas.insert(id, persona.clone());
        persona
    }

    fn check_usuario(&self, data: &NewUsuario, except: Option<UsuarioId>) -> Result<(), Error> {
        if !self.personas.contains_key(&data.persona_id) {
            return Err(Error::not_found("Persona"));
        }
        let taken = self
            .usuarios
            .iter()
            .any(|(id, (u, _))| Some(*id) != except && u.correo == data.correo);
        if taken {
            return Err(Error::conflict("Email already registered"));
        }
        Ok(())
    }

    fn insert_usuario(&mut self, data: NewUsuario) -> Result<Usuario, Error> {
        self.check_usuario(&data, None)?;
        self.next_usuario_id += 1;
        let id = UsuarioId::new(self.next_usuario_id);
        let usuario = Usuario::builder()
            .id(id)
            .persona_id(data.persona_id)
            .rol(data.rol)
            .correo(data.correo)
            .build()
            .expect("mock usuario is complete");
        self.usuarios
            .insert(id, (usuario.clone(), data.password_hash));
        Ok(usuario)
    }
}

/// Every repository trait over one shared in-memory state
#[derive(Clone, Default)]
pub(crate) struct MockStore {
    state: Arc<Mutex<State>>,
}

impl MockStore {
    pub async fn persona_count(&self) -> usize {
        self.state.lock().await.personas.len()
    }

    pub async fn usuario_count(&self) -> usize {
        self.state.lock().await.usuarios.len()
    }

    pub async fn stored_hash(&self, correo: &str) -> Option<String> {
        self.state
            .lock()
            .await
            .usuarios
            .values()
            .find(|(u, _)| u.correo == correo)
            .map(|(_, hash)| hash.clone())
    }
}

#[async_trait]
impl PersonaRepository for MockStore {
    async fn exists(&self, id: PersonaId) -> Result<bool, Error> {
        Ok(self.state.lock().await.personas.contains_key(&id))
    }

    async fn find_by_id(&self, id: PersonaId) -> Result<Option<Persona>, Error> {
        Ok(self.state.lock().await.personas.get(&id).cloned())
    }

    async fn create(&self, persona: NewPersona) -> Result<Persona, Error> {
        Ok(self.state.lock().await.insert_persona(persona))
    }

    async fn update(&self, id: PersonaId, persona: NewPersona) -> Result<Persona, Error> {
        let mut state = self.state.lock().await;
        let existing = state
            .personas
            .get(&id)
            .ok_or_else(|| Error::not_found("Persona"))?;
        let updated = Persona::builder()
            .id(id)
            .data(persona)
            .created_at(existing.created_at)
            .updated_at(Utc::now())
            .build()?;
        state.personas.insert(id, updated.clone());
        Ok(updated)
    }

    async fn delete(&self, id: PersonaId) -> Result<(), Error> {
        let mut state = self.state.lock().await;
        state
            .personas
            .remove(&id)
            .ok_or_else(|| Error::not_found("Persona"))?;
        state.usuarios.retain(|_, (u, _)| u.persona_id != id);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Persona>, Error> {
        let state = self.state.lock().await;
        Ok(state.personas.values().cloned().collect())
    }
}

#[async_trait]
impl UsuarioRepository for MockStore {
    async fn exists_by_correo(&self, correo: &str) -> Result<bool, Error> {
        let state = self.state.lock().await;
        Ok(state.usuarios.values().any(|(u, _)| u.correo == correo))
    }

    async fn exists_by_persona_id(&self, persona_id: PersonaId) -> Result<bool, Error> {
        let state = self.state.lock().await;
        Ok(state
            .usuarios
            .values()
            .any(|(u, _)| u.persona_id == persona_id))
    }

    async fn find_by_id(&self, id: UsuarioId) -> Result<Option<Usuario>, Error> {
        let state = self.state.lock().await;
        Ok(state.usuarios.get(&id).map(|(u, _)| u.clone()))
    }

    async fn find_by_correo(&self, correo: &str) -> Result<Option<Usuario>, Error> {
        let state = self.state.lock().await;
        Ok(state
            .usuarios
            .values()
            .find(|(u, _)| u.correo == correo)
            .map(|(u, _)| u.clone()))
    }

    async fn get_password_hash(&self, id: UsuarioId) -> Result<Option<String>, Error> {
        let state = self.state.lock().await;
        Ok(state.usuarios.get(&id).map(|(_, h)| h.clone()))
    }

    async fn create(&self, usuario: NewUsuario) -> Result<Usuario, Error> {
        self.state.lock().await.insert_usuario(usuario)
    }

    async fn update(&self, id: UsuarioId, usuario: NewUsuario) -> Result<Usuario, Error> {
        let mut state = self.state.lock().await;
        let (existing, _) = state
            .usuarios
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::not_found("Usuario"))?;
        state.check_usuario(&usuario, Some(id))?;
        let updated = Usuario {
            persona_id: usuario.persona_id,
            rol: usuario.rol,
            correo: usuario.correo,
            updated_at: Utc::now(),
            ..existing
        };
        state
            .usuarios
            .insert(id, (updated.clone(), usuario.password_hash));
        Ok(updated)
    }

    async fn delete(&self, id: UsuarioId) -> Result<(), Error> {
        self.state
            .lock()
            .await
            .usuarios
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| Error::not_found("Usuario"))
    }

    async fn list(&self) -> Result<Vec<Usuario>, Error> {
        let state = self.state.lock().await;
        Ok(state.usuarios.values().map(|(u, _)| u.clone()).collect())
    }
}

/// Works on a private copy of the state and publishes it on commit
struct MockUnitOfWork {
    store: MockStore,
    working: State,
}

#[async_trait]
impl UnitOfWork for MockUnitOfWork {
    async fn create_persona(&mut self, persona: NewPersona) -> Result<Persona, Error> {
        Ok(self.working.insert_persona(persona))
    }

    async fn create_usuario(&mut self, usuario: NewUsuario) -> Result<Usuario, Error> {
        self.working.insert_usuario(usuario)
    }

    async fn commit(self: Box<Self>) -> Result<(), Error> {
        *self.store.state.lock().await = self.working;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), Error> {
        Ok(())
    }
}

#[async_trait]
impl RegistrationRepository for MockStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, Error> {
        let working = self.state.lock().await.clone();
        Ok(Box::new(MockUnitOfWork {
            store: self.clone(),
            working,
        }))
    }
}
