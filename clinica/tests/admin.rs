mod common;

use clinica::{PersonaId, Rol, UsuarioId, UsuarioInput};
use common::{persona, setup_clinica};

fn usuario(persona_id: PersonaId, correo: &str) -> UsuarioInput {
    UsuarioInput {
        persona_id: Some(persona_id.as_i64()),
        rol: "medico".to_string(),
        correo: correo.to_string(),
        contrasena: "bata-blanca-1".to_string(),
    }
}

#[tokio::test]
async fn test_persona_crud() {
    let clinica = setup_clinica().await;

    let created = clinica.create_persona(&persona("Jorge")).await.unwrap();
    assert_eq!(
        clinica.get_persona(created.id).await.unwrap().nombre,
        "Jorge"
    );

    let updated = clinica
        .update_persona(created.id, &persona("Jorge Luis"))
        .await
        .unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.nombre, "Jorge Luis");

    clinica.delete_persona(created.id).await.unwrap();
    assert!(
        clinica
            .get_persona(created.id)
            .await
            .unwrap_err()
            .is_not_found()
    );
}

#[tokio::test]
async fn test_missing_ids_are_not_found_without_writes() {
    let clinica = setup_clinica().await;
    let missing_persona = PersonaId::new(77);
    let missing_usuario = UsuarioId::new(77);

    assert!(
        clinica
            .update_persona(missing_persona, &persona("Nadie"))
            .await
            .unwrap_err()
            .is_not_found()
    );
    assert!(
        clinica
            .delete_persona(missing_persona)
            .await
            .unwrap_err()
            .is_not_found()
    );
    assert!(
        clinica
            .delete_usuario(missing_usuario)
            .await
            .unwrap_err()
            .is_not_found()
    );
    assert!(clinica.list_personas().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_usuario_crud() {
    let clinica = setup_clinica().await;
    let owner = clinica.create_persona(&persona("Jorge")).await.unwrap();

    let created = clinica
        .create_usuario(&usuario(owner.id, "jorge@example.com"))
        .await
        .unwrap();
    assert_eq!(created.rol, Rol::Medico);

    let detalle = clinica.get_usuario(created.id).await.unwrap();
    assert_eq!(detalle.persona.id, owner.id);

    let mut change = usuario(owner.id, "dr.jorge@example.com");
    change.rol = "administrador".to_string();
    let updated = clinica.update_usuario(created.id, &change).await.unwrap();
    assert_eq!(updated.correo, "dr.jorge@example.com");
    assert_eq!(updated.rol, Rol::Administrador);

    clinica.delete_usuario(created.id).await.unwrap();
    assert!(
        clinica
            .get_usuario(created.id)
            .await
            .unwrap_err()
            .is_not_found()
    );
}

#[tokio::test]
async fn test_usuario_for_unknown_persona_is_not_found() {
    let clinica = setup_clinica().await;

    let err = clinica
        .create_usuario(&usuario(PersonaId::new(404), "x@example.com"))
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert!(clinica.list_usuarios().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_usuario_with_taken_email_is_conflict() {
    let clinica = setup_clinica().await;
    let a = clinica.create_persona(&persona("A")).await.unwrap();
    let b = clinica.create_persona(&persona("B")).await.unwrap();

    clinica
        .create_usuario(&usuario(a.id, "compartido@example.com"))
        .await
        .unwrap();
    let err = clinica
        .create_usuario(&usuario(b.id, "compartido@example.com"))
        .await
        .unwrap_err();

    assert!(err.is_conflict());
}

#[tokio::test]
async fn test_listed_usuarios_carry_no_hash() {
    let clinica = setup_clinica().await;
    let owner = clinica.create_persona(&persona("Jorge")).await.unwrap();
    clinica
        .create_usuario(&usuario(owner.id, "jorge@example.com"))
        .await
        .unwrap();

    let json = serde_json::to_string(&clinica.list_usuarios().await.unwrap()).unwrap();
    assert!(json.contains("jorge@example.com"));
    assert!(!json.contains("password"));
    assert!(!json.contains("$argon2"));
}

#[tokio::test]
async fn test_migrate_and_health_check() {
    let clinica = setup_clinica().await;
    clinica.migrate().await.unwrap();
    clinica.health_check().await.unwrap();
}
