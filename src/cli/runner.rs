//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands};
use crate::config::Config;
use crate::entity::Entity;
use crate::error::{Error, Result};
use crate::output::CloudDestination;
use crate::pipeline::Pipeline;
use crate::warehouse::WarehouseEngine;
use bytes::Bytes;
use std::fs;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Run {
                tables,
                upload,
                load,
            } => self.run_pipeline(tables.as_deref(), *upload, *load).await,
            Commands::Check => self.check(),
            Commands::Serve { port } => self.serve(*port).await,
        }
    }

    /// Load configuration, applying CLI overrides
    fn load_config(&self) -> Result<Config> {
        let mut config = match &self.cli.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };
        if let Some(source_dir) = &self.cli.source_dir {
            config.source_dir.clone_from(source_dir);
        }
        Ok(config)
    }

    /// Resolve the table selection (empty = all)
    fn parse_tables(selection: Option<&str>) -> Result<Vec<Entity>> {
        match selection {
            None => Ok(Entity::ALL.to_vec()),
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::parse)
                .collect(),
        }
    }

    /// Run the pipeline for the selected tables.
    ///
    /// Tables are processed independently; a failure in one is logged and
    /// counted while the rest continue. Upload and warehouse load failures
    /// count against their table the same way.
    async fn run_pipeline(&self, tables: Option<&str>, upload: bool, load: bool) -> Result<()> {
        let config = self.load_config()?;
        let entities = Self::parse_tables(tables)?;
        let pipeline = Pipeline::new(&config.source_dir, config.output_dir());

        let destination = if upload {
            let url = config.destination.as_deref().ok_or_else(|| {
                Error::config("Upload requested but no destination configured")
            })?;
            Some(CloudDestination::new(url, &config.storage)?)
        } else {
            None
        };

        let engine = if load {
            Some(match &config.warehouse_path {
                Some(path) => WarehouseEngine::open(path)?,
                None => WarehouseEngine::open_in_memory()?,
            })
        } else {
            None
        };

        let mut failures = 0;
        for entity in entities {
            match self
                .process_entity(&pipeline, entity, destination.as_ref(), engine.as_ref())
                .await
            {
                Ok(()) => {}
                Err(e) => {
                    failures += 1;
                    tracing::error!("Failed to process {} table: {e}", entity.table_name());
                }
            }
        }

        if failures > 0 {
            return Err(Error::Other(format!("{failures} table(s) failed")));
        }
        Ok(())
    }

    async fn process_entity(
        &self,
        pipeline: &Pipeline,
        entity: Entity,
        destination: Option<&CloudDestination>,
        engine: Option<&WarehouseEngine>,
    ) -> Result<()> {
        let report = pipeline.run(entity)?;
        if self.cli.verbose {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }

        if let Some(dest) = destination {
            let data = fs::read(&report.output_path)?;
            dest.upload_csv(entity.table_name(), Bytes::from(data))
                .await?;
        }
        if let Some(engine) = engine {
            engine.load_csv(entity, &report.output_path)?;
        }
        Ok(())
    }

    /// Validate sources, destination, and warehouse connectivity
    fn check(&self) -> Result<()> {
        let config = self.load_config()?;

        for entity in Entity::ALL {
            for file in entity.source_files() {
                let path = config.source_dir.join(file);
                if !path.exists() {
                    return Err(Error::file_not_found(path.display().to_string()));
                }
            }
        }
        tracing::info!("All source files present in {}", config.source_dir.display());

        if let Some(url) = &config.destination {
            let dest = CloudDestination::new(url, &config.storage)?;
            tracing::info!("Destination OK ({} scheme)", dest.scheme());
        }

        let engine = match &config.warehouse_path {
            Some(path) => WarehouseEngine::open(path)?,
            None => WarehouseEngine::open_in_memory()?,
        };
        engine.check_connection()?;
        tracing::info!("Warehouse connection OK");

        Ok(())
    }

    /// Load cleaned CSVs into the warehouse and start the HTTP server
    async fn serve(&self, port: u16) -> Result<()> {
        let config = self.load_config()?;
        let engine = match &config.warehouse_path {
            Some(path) => WarehouseEngine::open(path)?,
            None => WarehouseEngine::open_in_memory()?,
        };

        let pipeline = Pipeline::new(&config.source_dir, config.output_dir());
        for entity in Entity::ALL {
            let path = pipeline.output_path(entity);
            if path.exists() {
                engine.load_csv(entity, &path)?;
            } else {
                tracing::warn!(
                    "No cleaned CSV for {} at {}; run the pipeline first",
                    entity.table_name(),
                    path.display()
                );
            }
        }

        crate::server::serve(engine, port).await
    }
}
