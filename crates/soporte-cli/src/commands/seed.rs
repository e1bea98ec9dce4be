//! The `seed` management command.
//!
//! Loads a small demo data set into an in-memory record store against the
//! migrated schema, then prints the dashboard numbers. Useful as an
//! end-to-end smoke check of the migration history, record validation,
//! and statistics pipeline without touching the configured data
//! directory.

use serde_json::{json, Map, Value};
use soporte_core::{Settings, SoporteError};
use soporte_migrations::{catalog, MigrationRunner};
use soporte_records::{ListOptions, RecordStore};
use soporte_schema::MemorySchemaStore;
use soporte_stats::{counts_by_subject, top_department, top_technician};

use crate::command::ManagementCommand;

/// Seeds an in-memory store with demo records and prints statistics.
pub struct SeedCommand;

fn object(entries: &[(&str, Value)]) -> Map<String, Value> {
    entries
        .iter()
        .map(|(k, v)| ((*k).to_string(), v.clone()))
        .collect()
}

impl ManagementCommand for SeedCommand {
    fn name(&self) -> &str {
        "seed"
    }

    fn help(&self) -> &str {
        "Load demo records in memory and print statistics"
    }

    fn handle(&self, _matches: &clap::ArgMatches, _settings: &Settings) -> Result<(), SoporteError> {
        let mut runner = MigrationRunner::new();
        catalog::register_all(&mut runner)?;
        let mut schema = MemorySchemaStore::new();
        runner.apply_forward(&mut schema, None)?;

        let mut records = RecordStore::new();
        let tecnicos: Vec<_> = [("Ana Pérez", "tecnico"), ("Luis Soto", "programador")]
            .iter()
            .map(|(nombre, cargo)| {
                records.create(
                    &schema,
                    "tecnicos",
                    object(&[("nombre", json!(nombre)), ("cargo", json!(cargo))]),
                )
            })
            .collect::<Result<_, _>>()?;
        let departamento = records.create(
            &schema,
            "departamentos",
            object(&[("nombre", json!("Informática")), ("maquinas", json!(8))]),
        )?;

        let demo_supports = [
            ("falla de red", 0),
            ("falla de red", 1),
            ("soporte técnico", 0),
        ];
        for (asunto, tecnico_idx) in demo_supports {
            records.create(
                &schema,
                "historial",
                object(&[
                    ("status", json!(true)),
                    ("asunto", json!(asunto)),
                    ("tecnicos_asociados", json!([tecnicos[tecnico_idx].id.clone()])),
                    ("departamento", json!(departamento.id.clone())),
                    ("fecha_soporte", json!("2026-08-01 09:00:00.000Z")),
                ]),
            )?;
        }

        let listed = records.list(
            &schema,
            "historial",
            &ListOptions::new()
                .sort("-created")
                .expand("departamento,tecnicos_asociados"),
        )?;

        println!("Seeded {} support record(s)", listed.len());
        for (asunto, count) in counts_by_subject(&listed) {
            println!("  {asunto}: {count}");
        }
        if let Some(top) = top_technician(&listed) {
            println!("Top técnico: {}", top["nombre"]);
        }
        if let Some(top) = top_department(&listed) {
            println!("Top departamento: {}", top["nombre"]);
        }
        Ok(())
    }
}
