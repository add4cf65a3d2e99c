use actix_web::{web, HttpRequest, HttpResponse};
use common::config::{RdbmsSpotConfig, S3SpotConfig};
use sessions::{SpecFlags, Specs, Steps};

use crate::client;
use crate::error::ApiError;
use crate::params::{self, MigrateRequest};
use crate::state::AppState;

struct Resolved {
    source: RdbmsSpotConfig,
    target: RdbmsSpotConfig,
    target_s3: Option<S3SpotConfig>,
    specs: Specs,
    steps: Steps,
}

/// Resolves a `MigrateRequest` against the configured spots table, shared
/// by `/migration:verify` (dry run) and `/migrate` (the real thing).
fn resolve(state: &AppState, body: &MigrateRequest) -> Result<Resolved, ApiError> {
    let spots = state.spots.lock();
    let source = spots.get_rdbms(&body.from_rdbms)?.clone();
    let target = spots.get_rdbms(&body.to_rdbms)?.clone();
    let target_s3 = body.to_s3.as_deref().map(|key| spots.get_s3(key)).transpose()?.cloned();
    drop(spots);

    let relations = params::relation_filter(&body.include_relations, &body.exclude_relations)?;
    let incremental_migrations = params::incremental_migrations(&body.incremental_migration)?;
    let override_columns = params::keyed_pairs(&body.override_columns, "override-columns")?;
    let named_lobdata = params::keyed_pairs(&body.named_lobdata, "named-lobdata")?;
    let remove_nulls = params::remove_nulls(&body.remove_nulls);

    let specs = Specs {
        from_schema: body.from_schema.clone(),
        to_schema: body.to_schema.clone(),
        relations,
        exclude_columns: body.exclude_columns.clone(),
        exclude_constraints: body.exclude_constraints.clone(),
        override_columns,
        incremental_migrations,
        named_lobdata,
        remove_nulls,
        flags: SpecFlags {
            flatten_storage: body.flatten_storage,
            reflect_filetype: body.reflect_filetype,
            relax_reflection: body.relax_reflection,
            skip_nonempty: body.skip_nonempty,
            process_indexes: body.process_indexes,
            process_views: body.process_views,
        },
        migration_badge: body.migration_badge.clone().unwrap_or_default(),
    };

    let steps = Steps {
        migrate_metadata: body.migrate_metadata,
        migrate_plaindata: body.migrate_plaindata,
        migrate_lobdata: body.migrate_lobdata,
        synchronize_plaindata: body.synchronize_plaindata,
    };

    Ok(Resolved { source, target, target_s3, specs, steps })
}

/// `POST /migration:verify`: resolves and validates the request without
/// starting a migration, returning the resolved context (spec.md §6:
/// "dry-run validation; returns a context").
pub async fn verify(state: web::Data<AppState>, body: web::Json<MigrateRequest>) -> Result<HttpResponse, ApiError> {
    let resolved = resolve(&state, &body)?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "source": resolved.source.redacted(),
        "target": resolved.target.redacted(),
        "target_s3": resolved.target_s3.as_ref().map(S3SpotConfig::redacted),
    })))
}

/// `POST /migrate`: creates a session for this client, configures it from
/// the request body, and runs the full migration to completion (spec.md
/// §4.G).
pub async fn start(state: web::Data<AppState>, req: HttpRequest, body: web::Json<MigrateRequest>) -> Result<HttpResponse, ApiError> {
    let resolved = resolve(&state, &body)?;

    let (client_id, minted) = client::resolve(&req);
    let session_id = uuid::Uuid::new_v4().to_string();
    state.registry.create(&client_id, &session_id)?;

    state.registry.update(&session_id, |session| {
        session.source = Some(resolved.source.engine);
        session.target = Some(resolved.target.engine);
        session.target_s3 = resolved.target_s3.is_some();
        session.steps = resolved.steps;
        session.specs = resolved.specs;
        session.connections.insert(resolved.source.engine, resolved.source);
        session.connections.insert(resolved.target.engine, resolved.target);
        session.s3 = resolved.target_s3;
    })?;

    let report = orchestrator::run_migration(&session_id, &state.registry).await?;

    let mut response = HttpResponse::Ok();
    if minted {
        response.cookie(client::cookie(&client_id));
    }
    Ok(response.json(report))
}

/// `DELETE /migrate`: marks the client's active migration for abort
/// (spec.md §4.F `abort`, polled by the orchestrator's per-table loop).
pub async fn abort(state: web::Data<AppState>, req: HttpRequest) -> Result<HttpResponse, ApiError> {
    let (client_id, _) = client::resolve(&req);
    let session = state.registry.get_active(&client_id).ok_or_else(|| ApiError::bad_request("no active session"))?;
    state.registry.abort(&session.session_id)?;
    Ok(HttpResponse::Ok().finish())
}
