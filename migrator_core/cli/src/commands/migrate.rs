use std::path::PathBuf;

use clap::Args;
use sessions::{RelationFilter, Steps};

/// Runs one migration to completion directly, without starting the HTTP
/// surface -- a one-shot entry point for scripted/batch use, grounded on
/// `pydb_migration.migrate`'s own direct-invocation form in
/// `original_source/`.
#[derive(Args)]
pub struct MigrateArgs {
    #[arg(long = "spots-file")]
    pub spots_file: Option<PathBuf>,
    #[arg(long = "from-rdbms")]
    pub from_rdbms: String,
    #[arg(long = "from-schema")]
    pub from_schema: String,
    #[arg(long = "to-rdbms")]
    pub to_rdbms: String,
    #[arg(long = "to-schema")]
    pub to_schema: String,
    #[arg(long = "to-s3")]
    pub to_s3: Option<String>,
    #[arg(long = "migrate-metadata")]
    pub migrate_metadata: bool,
    #[arg(long = "migrate-plaindata")]
    pub migrate_plaindata: bool,
    #[arg(long = "migrate-lobdata")]
    pub migrate_lobdata: bool,
    #[arg(long = "synchronize-plaindata")]
    pub synchronize_plaindata: bool,
    #[arg(long = "include-relation")]
    pub include_relations: Vec<String>,
    #[arg(long = "exclude-relation")]
    pub exclude_relations: Vec<String>,
}

pub fn run(args: MigrateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run_async(args))
}

async fn run_async(args: MigrateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let spots_path = args.spots_file.clone().unwrap_or_else(common::config::default_spots_path);
    let spots = common::config::load_spots(Some(&spots_path))?;

    let source = spots.get_rdbms(&args.from_rdbms)?.clone();
    let target = spots.get_rdbms(&args.to_rdbms)?.clone();
    let target_s3 = args.to_s3.as_deref().map(|key| spots.get_s3(key)).transpose()?.cloned();

    let relations = match (args.include_relations.is_empty(), args.exclude_relations.is_empty()) {
        (false, _) => RelationFilter::Include(args.include_relations.clone()),
        (true, false) => RelationFilter::Exclude(args.exclude_relations.clone()),
        (true, true) => RelationFilter::None,
    };

    let registry = sessions::Registry::new();
    let session_id = uuid::Uuid::new_v4().to_string();
    registry.create("cli", &session_id)?;

    registry.update(&session_id, |session| {
        session.source = Some(source.engine);
        session.target = Some(target.engine);
        session.target_s3 = target_s3.is_some();
        session.steps = Steps {
            migrate_metadata: args.migrate_metadata,
            migrate_plaindata: args.migrate_plaindata,
            migrate_lobdata: args.migrate_lobdata,
            synchronize_plaindata: args.synchronize_plaindata,
        };
        session.specs.from_schema = args.from_schema.clone();
        session.specs.to_schema = args.to_schema.clone();
        session.specs.relations = relations;
        session.connections.insert(source.engine, source);
        session.connections.insert(target.engine, target);
        session.s3 = target_s3;
    })?;

    let report = orchestrator::run_migration(&session_id, &registry).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
