//! The support tracker's schema history.
//!
//! Seven migration units that evolve the tracker's three collections:
//! `tecnicos` and `departamentos` (the lookup tables), then `historial`
//! (the support log) and its later field additions. Registering them on a
//! fresh runner and applying forward yields the live schema; reverting to
//! version 0 empties the store again.
//!
//! Field and collection ids are stable across environments, so they are
//! spelled out literally here rather than generated.

use soporte_core::SoporteResult;
use soporte_schema::{CollectionDef, FieldDef, FieldKind, SchemaStore};

use crate::migration::Migration;
use crate::runner::MigrationRunner;

/// Collection id of `historial`.
pub const HISTORIAL_ID: &str = "pbc_1119805642";
/// Collection id of `tecnicos`.
pub const TECNICOS_ID: &str = "pbc_1531729310";
/// Collection id of `departamentos`.
pub const DEPARTAMENTOS_ID: &str = "pbc_3315739933";

/// The `asunto` option list as first introduced.
pub const ASUNTO_VALUES_INITIAL: [&str; 3] =
    ["problemas de red", "soporte técnico", "soporte ofimático"];

/// The expanded `asunto` option list.
pub const ASUNTO_VALUES_EXPANDED: [&str; 10] = [
    "soporte técnico",
    "soporte ofimático",
    "falla del saad",
    "falla de conexión",
    "falla de internet",
    "falla de red",
    "mantenimiento correctivo",
    "mantenimiento preventivo",
    "cableado estructurado",
    "soporte de red",
];

/// The system `id` field shared by every collection.
fn id_field() -> FieldDef {
    FieldDef::new(
        "text3208210256",
        "id",
        FieldKind::Text {
            min: Some(15),
            max: Some(15),
            pattern: Some("^[a-z0-9]+$".into()),
            autogenerate_pattern: Some("[a-z0-9]{15}".into()),
            primary_key: true,
        },
    )
    .system()
    .required()
}

/// The `created` autodate field.
fn created_field() -> FieldDef {
    FieldDef::new(
        "autodate2990389176",
        "created",
        FieldKind::Autodate {
            on_create: true,
            on_update: false,
        },
    )
}

/// The `updated` autodate field.
fn updated_field() -> FieldDef {
    FieldDef::new(
        "autodate3332085495",
        "updated",
        FieldKind::Autodate {
            on_create: true,
            on_update: true,
        },
    )
}

fn plain_text(id: &str, name: &str) -> FieldDef {
    FieldDef::new(
        id,
        name,
        FieldKind::Text {
            min: None,
            max: None,
            pattern: None,
            autogenerate_pattern: None,
            primary_key: false,
        },
    )
}

fn asunto_field(values: &[&str]) -> FieldDef {
    FieldDef::new(
        "select1156485628",
        "asunto",
        FieldKind::Select {
            max_select: 1,
            values: values.iter().map(ToString::to_string).collect(),
        },
    )
}

fn tecnicos_collection() -> CollectionDef {
    CollectionDef::new(TECNICOS_ID, "tecnicos")
        .with_field(id_field())
        .with_field(plain_text("text724990059", "nombre").required())
        .with_field(plain_text("text2345121525", "cedula"))
        .with_field(FieldDef::new(
            "select1542800728",
            "cargo",
            FieldKind::Select {
                max_select: 1,
                values: vec!["programador".into(), "tecnico".into(), "jefe".into()],
            },
        ))
        .with_field(created_field())
        .with_field(updated_field())
}

fn departamentos_collection() -> CollectionDef {
    CollectionDef::new(DEPARTAMENTOS_ID, "departamentos")
        .with_field(id_field())
        .with_field(plain_text("text724990059", "nombre").required())
        .with_field(plain_text("text1843675174", "descripcion"))
        .with_field(FieldDef::new(
            "number3632866850",
            "maquinas",
            FieldKind::Number {
                min: None,
                max: None,
                only_int: true,
            },
        ))
        .with_field(FieldDef::new(
            "number2324736937",
            "switchs",
            FieldKind::Number {
                min: None,
                max: None,
                only_int: true,
            },
        ))
        .with_field(plain_text("text103653489", "ubicacions"))
        .with_field(created_field())
        .with_field(updated_field())
}

fn historial_collection() -> CollectionDef {
    CollectionDef::new(HISTORIAL_ID, "historial")
        .with_field(id_field())
        .with_field(FieldDef::new("bool2063623452", "status", FieldKind::Bool))
        .with_field(FieldDef::new(
            "editor26759595",
            "descripcion_problema",
            FieldKind::Editor {
                convert_urls: false,
                max_size: 0,
            },
        ))
        .with_field(FieldDef::new(
            "relation2427026673",
            "tecnicos_asociados",
            FieldKind::Relation {
                collection_id: TECNICOS_ID.into(),
                min_select: 0,
                max_select: 999,
                cascade_delete: false,
            },
        ))
        .with_field(created_field())
        .with_field(updated_field())
}

/// Registers the full schema history on `runner`.
///
/// # Errors
///
/// Returns [`soporte_core::SoporteError::DuplicateVersion`] if any of the
/// catalog versions is already registered.
pub fn register_all(runner: &mut MigrationRunner) -> SoporteResult<()> {
    runner.register(Migration::new(
        1_762_788_340,
        "created_tecnicos",
        |store| store.save_collection(tecnicos_collection()),
        |store| store.delete_collection(TECNICOS_ID),
    ))?;

    runner.register(Migration::new(
        1_762_788_401,
        "created_departamentos",
        |store| store.save_collection(departamentos_collection()),
        |store| store.delete_collection(DEPARTAMENTOS_ID),
    ))?;

    runner.register(Migration::new(
        1_762_788_936,
        "created_historial",
        |store| store.save_collection(historial_collection()),
        |store| store.delete_collection(HISTORIAL_ID),
    ))?;

    runner.register(Migration::new(
        1_763_128_207,
        "updated_historial",
        |store| {
            let mut collection = store.collection(HISTORIAL_ID)?;
            collection.add_field_at(4, asunto_field(&ASUNTO_VALUES_INITIAL))?;
            store.save_collection(collection)
        },
        |store| {
            let mut collection = store.collection(HISTORIAL_ID)?;
            collection.remove_field("select1156485628")?;
            store.save_collection(collection)
        },
    ))?;

    runner.register(Migration::new(
        1_763_128_641,
        "updated_historial",
        |store| {
            let mut collection = store.collection(HISTORIAL_ID)?;
            collection.replace_field_at(4, asunto_field(&ASUNTO_VALUES_EXPANDED));
            store.save_collection(collection)
        },
        |store| {
            let mut collection = store.collection(HISTORIAL_ID)?;
            collection.replace_field_at(4, asunto_field(&ASUNTO_VALUES_INITIAL));
            store.save_collection(collection)
        },
    ))?;

    runner.register(Migration::new(
        1_769_009_758,
        "updated_historial",
        |store| {
            let mut collection = store.collection(HISTORIAL_ID)?;
            collection.add_field_at(
                5,
                FieldDef::new(
                    "relation1088722923",
                    "departamento",
                    FieldKind::Relation {
                        collection_id: DEPARTAMENTOS_ID.into(),
                        min_select: 0,
                        max_select: 1,
                        cascade_delete: false,
                    },
                ),
            )?;
            store.save_collection(collection)
        },
        |store| {
            let mut collection = store.collection(HISTORIAL_ID)?;
            collection.remove_field("relation1088722923")?;
            store.save_collection(collection)
        },
    ))?;

    runner.register(Migration::new(
        1_770_039_471,
        "updated_historial",
        |store| {
            let mut collection = store.collection(HISTORIAL_ID)?;
            collection.add_field_at(
                6,
                FieldDef::new(
                    "date1119911313",
                    "fecha_soporte",
                    FieldKind::Date {
                        min: None,
                        max: None,
                    },
                ),
            )?;
            store.save_collection(collection)
        },
        |store| {
            let mut collection = store.collection(HISTORIAL_ID)?;
            collection.remove_field("date1119911313")?;
            store.save_collection(collection)
        },
    ))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use soporte_schema::MemorySchemaStore;

    #[test]
    fn test_register_all_registers_seven() {
        let mut runner = MigrationRunner::new();
        register_all(&mut runner).unwrap();
        assert_eq!(runner.len(), 7);
    }

    #[test]
    fn test_full_history_produces_live_schema() {
        let mut runner = MigrationRunner::new();
        register_all(&mut runner).unwrap();
        let mut store = MemorySchemaStore::new();
        let applied = runner.apply_forward(&mut store, None).unwrap();
        assert_eq!(applied.len(), 7);

        let historial = store.collection("historial").unwrap();
        assert_eq!(
            historial.field_names(),
            vec![
                "id",
                "status",
                "descripcion_problema",
                "tecnicos_asociados",
                "asunto",
                "departamento",
                "fecha_soporte",
                "created",
                "updated"
            ]
        );
        assert!(store.collection("tecnicos").is_ok());
        assert!(store.collection("departamentos").is_ok());
    }

    #[test]
    fn test_asunto_ends_with_expanded_values() {
        let mut runner = MigrationRunner::new();
        register_all(&mut runner).unwrap();
        let mut store = MemorySchemaStore::new();
        runner.apply_forward(&mut store, None).unwrap();

        let historial = store.collection(HISTORIAL_ID).unwrap();
        let asunto = historial.field("select1156485628").unwrap();
        match &asunto.kind {
            FieldKind::Select { values, max_select } => {
                assert_eq!(*max_select, 1);
                assert_eq!(values.len(), 10);
                assert!(values.contains(&"cableado estructurado".to_string()));
            }
            other => panic!("unexpected kind: {other:?}"),
        }
        assert_eq!(historial.field_position("select1156485628"), Some(4));
    }

    #[test]
    fn test_relations_point_at_catalog_ids() {
        let mut runner = MigrationRunner::new();
        register_all(&mut runner).unwrap();
        let mut store = MemorySchemaStore::new();
        runner.apply_forward(&mut store, None).unwrap();

        let historial = store.collection(HISTORIAL_ID).unwrap();
        match &historial.field_by_name("departamento").unwrap().kind {
            FieldKind::Relation { collection_id, max_select, .. } => {
                assert_eq!(collection_id, DEPARTAMENTOS_ID);
                assert_eq!(*max_select, 1);
            }
            other => panic!("unexpected kind: {other:?}"),
        }
    }
}
