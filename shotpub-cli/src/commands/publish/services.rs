//! Concrete implementations of the service traits.
//!
//! These wrap the shotpub library, reading settings from the loaded
//! configuration and records from the ledger it names.

use std::path::Path;

use super::args::{PublishArgs, VersionUpArgs};
use super::traits::{Output, PublisherService};
use crate::error::CliError;
use shotpub::collector::{Collector, FilesystemInspector};
use shotpub::config::{ConfigFile, LayoutKind};
use shotpub::log::TracingLogger;
use shotpub::publisher::{
    default_plugins, ItemTree, LedgerRegistrar, PublishEnv, PublishErrorPolicy, PublishPlugin,
    PublishReport, PublishSession, Registrar, StoredRecord, VersionUpPlugin,
};
use shotpub::version::Resolution;

// ============================================================================
// Console Output Implementation
// ============================================================================

/// Standard console output implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleOutput;

impl ConsoleOutput {
    /// Create a new console output.
    pub fn new() -> Self {
        Self
    }
}

impl Output for ConsoleOutput {
    fn println(&self, message: &str) {
        println!("{}", message);
    }
}

// ============================================================================
// Default Publisher Service
// ============================================================================

/// Production publisher service backed by the ledger registrar.
pub struct DefaultPublisherService {
    config: ConfigFile,
    logger: TracingLogger,
}

impl DefaultPublisherService {
    pub fn new(config: ConfigFile) -> Self {
        Self {
            config,
            logger: TracingLogger::new(),
        }
    }

    fn registrar(&self) -> LedgerRegistrar {
        LedgerRegistrar::new(&self.config.registrar.ledger)
    }
}

impl PublisherService for DefaultPublisherService {
    fn resolve(
        &self,
        source: &Path,
        root: &Path,
        layout: Option<LayoutKind>,
    ) -> Result<Resolution, CliError> {
        let mut settings = self.config.publish.clone();
        if let Some(kind) = layout {
            settings.layout = kind;
        }
        Ok(settings.resolver().resolve(source, root)?)
    }

    fn publish(&self, args: &PublishArgs) -> Result<PublishReport, CliError> {
        let registrar = self.registrar();
        let env = PublishEnv::new(&self.logger, &self.config.publish, &registrar);
        let collector = Collector::new(&self.logger);
        let mut tree = ItemTree::new();

        if args.session.is_some() || args.files.is_empty() {
            let mut inspector = FilesystemInspector::new(args.host, args.session.clone());
            if let Some(root) = &args.project_root {
                inspector = inspector.with_project_root(root);
            }
            collector.collect_session(&mut tree, &inspector);
        }
        for file in &args.files {
            collector.collect_path(&mut tree, None, file);
        }
        if let Some(comment) = &args.comment {
            tree.set_description(comment);
        }

        let session = PublishSession::new(env, default_plugins());
        let report = if args.dry_run {
            session.validate_all(&mut tree)?
        } else {
            session.run_all(&mut tree, args.policy)?
        };
        Ok(report)
    }

    fn version_up(&self, args: &VersionUpArgs) -> Result<PublishReport, CliError> {
        let registrar = self.registrar();
        let env = PublishEnv::new(&self.logger, &self.config.publish, &registrar);
        let collector = Collector::new(&self.logger);
        let mut tree = ItemTree::new();

        let inspector = FilesystemInspector::new(args.host, Some(args.path.clone()));
        collector.collect_session(&mut tree, &inspector);

        let plugins: Vec<Box<dyn PublishPlugin>> = vec![Box::new(VersionUpPlugin::new())];
        let session = PublishSession::new(env, plugins);
        Ok(session.run_all(&mut tree, PublishErrorPolicy::Abort)?)
    }

    fn records(&self) -> Result<Vec<StoredRecord>, CliError> {
        Ok(self.registrar().records()?)
    }
}
