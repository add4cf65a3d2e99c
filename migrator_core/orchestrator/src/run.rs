//! Component G: sequences B -> (disable restrictions) -> C -> D ->
//! (restore restrictions), or E, against one session, and assembles the
//! final report (spec.md §4.G).

use crate::error::MigrationError;
use crate::report::MigrationReport;
use crate::restrictions::{disable_stmt, restore_stmt};
use catalog::{MigratedTable, TransferStatus};
use clients::{connect_executor, connect_reflector, S3Client};
use common::config::RdbmsKind;
use sessions::{RelationFilter, Registry, SessionState};
use std::collections::HashMap;
use transfer::{transfer_lobdata, transfer_plaindata, IncrementalWindow, LobDestination};
use types::TypeClass;

fn relation_lists(filter: &RelationFilter) -> (Vec<String>, Vec<String>) {
    match filter {
        RelationFilter::None => (Vec::new(), Vec::new()),
        RelationFilter::Include(names) => (names.clone(), Vec::new()),
        RelationFilter::Exclude(names) => (Vec::new(), names.clone()),
    }
}

fn resolve_overrides(raw: &HashMap<String, String>) -> HashMap<String, TypeClass> {
    let mut overrides = HashMap::with_capacity(raw.len());
    for (column, type_name) in raw {
        match types::name_to_type(type_name) {
            Some(type_class) => {
                overrides.insert(column.clone(), type_class);
            }
            None => tracing::warn!(column = %column, type_name = %type_name, "unknown override type name, ignoring"),
        }
    }
    overrides
}

/// Runs the full migration sequence for `session_id` and returns the final
/// report. Always leaves the session in a terminal state (`Finished` or
/// `Aborted`) before returning, even on error.
pub async fn run_migration(session_id: &str, registry: &Registry) -> Result<MigrationReport, MigrationError> {
    let started_at = chrono::Utc::now();
    registry.update(session_id, |s| s.state = SessionState::Migrating)?;

    let outcome = run_steps(session_id, registry).await;

    let finished_at = chrono::Utc::now();
    let session = registry.get(session_id).ok_or_else(|| sessions::SessionError::not_found(session_id))?;
    let aborted = session.state == SessionState::Aborting;

    let mut errors = session.errors.clone();
    let tables = match outcome {
        Ok(tables) => tables,
        Err(err) => {
            errors.push(err.to_string());
            Vec::new()
        }
    };

    let final_state = if aborted { SessionState::Aborted } else { SessionState::Finished };
    registry.update(session_id, |s| s.state = final_state)?;

    let source_spot = session.source.and_then(|k| session.connections.get(&k)).cloned().unwrap_or_else(default_spot);
    let target_spot = session.target.and_then(|k| session.connections.get(&k)).cloned().unwrap_or_else(default_spot);

    Ok(MigrationReport::new(
        session_id.to_string(),
        started_at,
        finished_at,
        final_state,
        &source_spot,
        &target_spot,
        session.s3.as_ref(),
        session.steps,
        tables,
        errors,
    ))
}

fn default_spot() -> common::config::RdbmsSpotConfig {
    common::config::RdbmsSpotConfig {
        engine: RdbmsKind::Postgres,
        name: String::new(),
        host: String::new(),
        port: 0,
        user: String::new(),
        pwd: String::new(),
        client: None,
        driver: None,
    }
}

async fn run_steps(session_id: &str, registry: &Registry) -> Result<Vec<MigratedTable>, MigrationError> {
    let session = registry.get(session_id).ok_or_else(|| sessions::SessionError::not_found(session_id))?;

    let source_kind = session.source.ok_or_else(|| MigrationError::catalog("session has no source configured"))?;
    let target_kind = session.target.ok_or_else(|| MigrationError::catalog("session has no target configured"))?;
    let source_spot = session.connections.get(&source_kind).ok_or_else(|| MigrationError::catalog("source spot not configured"))?;
    let target_spot = session.connections.get(&target_kind).ok_or_else(|| MigrationError::catalog("target spot not configured"))?;

    let (include, exclude) = relation_lists(&session.specs.relations);
    let overrides = resolve_overrides(&session.specs.override_columns);

    let mut source_reflector = connect_reflector(source_spot).await?;
    let mut target_reflector = connect_reflector(target_spot).await?;
    let mut target_executor = connect_executor(target_spot).await?;

    let mut tables = catalog::migrate_metadata(
        source_reflector.as_mut(),
        target_reflector.as_mut(),
        target_executor.as_mut(),
        source_kind,
        target_kind,
        &session.specs.from_schema,
        &session.specs.to_schema,
        &target_spot.user,
        &include,
        &exclude,
        &overrides,
        session.steps.migrate_metadata,
    )
    .await?;

    let s3_client = match &session.s3 {
        Some(s3_spot) => Some(clients::S3Client::connect(s3_spot).await?),
        None => None,
    };

    let restrictions_active = session.steps.migrate_plaindata || session.steps.migrate_lobdata;
    if restrictions_active {
        if let Some(stmt) = disable_stmt(target_kind) {
            target_executor.as_mut().execute(stmt).await?;
        }
    }

    let run_result = run_per_table(session_id, registry, &session, &mut tables, &s3_client).await;

    if restrictions_active {
        if let Some(stmt) = restore_stmt(target_kind) {
            target_executor.as_mut().execute(stmt).await?;
        }
    }

    run_result?;
    Ok(tables)
}

async fn run_per_table(
    session_id: &str,
    registry: &Registry,
    session: &sessions::Session,
    tables: &mut [MigratedTable],
    s3_client: &Option<S3Client>,
) -> Result<(), MigrationError> {
    let source_kind = session.source.expect("checked by caller");
    let target_kind = session.target.expect("checked by caller");
    let source_spot = &session.connections[&source_kind];
    let target_spot = &session.connections[&target_kind];
    let from_schema = &session.specs.from_schema;
    let to_schema = &session.specs.to_schema;

    // spec.md §4.C.1/§7: a table-level failure records into the table's own
    // status and the session's error list, then the loop moves on to the
    // next table rather than aborting the whole run.
    'tables: for table in tables.iter_mut() {
        if registry.assert_abort(session_id) {
            break;
        }

        if session.steps.migrate_plaindata {
            let window = session
                .specs
                .incremental_migrations
                .get(&table.name)
                .map(|w| IncrementalWindow { count: w.count, offset: w.offset })
                .unwrap_or_default();
            let remove_nulls = session.specs.remove_nulls.contains(&table.name);

            if let Err(err) = transfer_plaindata(
                source_spot,
                target_spot,
                from_schema,
                to_schema,
                table,
                window,
                remove_nulls,
                session.specs.flags.skip_nonempty,
                &session.metrics,
                &session.cancel,
            )
            .await
            {
                table.plain_status = TransferStatus::Error;
                registry.update(session_id, |s| s.errors.push(format!("table '{}' plaindata transfer failed: {err}", table.name)))?;
                continue 'tables;
            }
        }

        if session.steps.migrate_lobdata {
            let destination = match (s3_client, session.target_s3) {
                (Some(client), true) => LobDestination::S3 {
                    client,
                    migration_badge: &session.specs.migration_badge,
                    flatten_storage: session.specs.flags.flatten_storage,
                },
                _ => LobDestination::Rdbms,
            };
            if let Err(err) = transfer_lobdata(
                source_spot,
                target_spot,
                from_schema,
                to_schema,
                table,
                &session.specs.named_lobdata,
                &destination,
                session.specs.flags.skip_nonempty,
                &session.metrics,
                &session.cancel,
            )
            .await
            {
                table.lob_status = TransferStatus::Error;
                registry.update(session_id, |s| s.errors.push(format!("table '{}' lobdata transfer failed: {err}", table.name)))?;
                continue 'tables;
            }
        }

        if session.steps.synchronize_plaindata {
            if let Err(err) = sync::sync_plaindata(source_spot, target_spot, from_schema, to_schema, table, false).await {
                registry.update(session_id, |s| s.errors.push(format!("table '{}' plaindata sync failed: {err}", table.name)))?;
                continue 'tables;
            }

            if let Some(client) = s3_client.as_ref().filter(|_| session.target_s3) {
                let lob_columns: Vec<_> = table.columns.iter().filter(|c| types::is_lob_column(c.type_class)).cloned().collect();
                for column in &lob_columns {
                    let Some(spec) = transfer::lobdata::resolve_lob_spec(table, column, &session.specs.named_lobdata) else {
                        continue;
                    };
                    match sync::sync_lob_column(
                        source_spot,
                        target_spot,
                        from_schema,
                        to_schema,
                        table,
                        column,
                        &spec,
                        client,
                        &session.specs.migration_badge,
                        &session.metrics,
                    )
                    .await
                    {
                        Ok(counts) => {
                            table.sync_inserts += counts.inserted;
                            table.sync_deletes += counts.deleted;
                        }
                        Err(err) => {
                            registry.update(session_id, |s| {
                                s.errors.push(format!("table '{}' column '{}' lob sync failed: {err}", table.name, column.name))
                            })?;
                            continue 'tables;
                        }
                    }
                }
            }
        }
    }

    Ok(())
}
