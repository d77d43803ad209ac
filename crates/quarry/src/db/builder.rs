use super::{Db, Shared};
use crate::{ImportOptions, Inferrer, Result};

use quarry_core::{
    driver::Gateway,
    schema::{Schema, SchemaConfig, TypeRegistry, UnknownTypePolicy},
    stmt::Type,
    Catalog,
};

use indexmap::IndexSet;
use std::sync::Arc;

/// Configures which relations a [`Db`] knows about and how their schemas
/// are inferred.
#[derive(Debug, Default)]
pub struct Builder {
    /// Relations named explicitly
    relations: IndexSet<String>,

    /// Infer every table and view the gateway can see
    infer_all: bool,

    config: SchemaConfig,

    registry: TypeRegistry,

    unknown_types: UnknownTypePolicy,

    import: ImportOptions,
}

impl Builder {
    /// Registers a relation to infer.
    pub fn relation(&mut self, name: impl Into<String>) -> &mut Self {
        self.relations.insert(name.into());
        self
    }

    pub fn relations<T: Into<String>>(&mut self, names: impl IntoIterator<Item = T>) -> &mut Self {
        self.relations.extend(names.into_iter().map(Into::into));
        self
    }

    /// Infers every base table and view.
    pub fn infer_all(&mut self) -> &mut Self {
        self.infer_all = true;
        self
    }

    /// Declarations applied on top of inferred schemas. Relations declared
    /// here are registered too.
    pub fn config(&mut self, config: SchemaConfig) -> &mut Self {
        self.config = config;
        self
    }

    /// Loads declarations from TOML.
    pub fn config_toml(&mut self, src: &str) -> Result<&mut Self> {
        self.config = SchemaConfig::from_toml_str(src)?;
        Ok(self)
    }

    pub fn type_registry(&mut self, registry: TypeRegistry) -> &mut Self {
        self.registry = registry;
        self
    }

    /// Maps a native type name to a semantic type, e.g. a database enum.
    pub fn register_type(&mut self, native: &str, ty: Type) -> &mut Self {
        self.registry.register(native, ty);
        self
    }

    pub fn unknown_type_policy(&mut self, policy: UnknownTypePolicy) -> &mut Self {
        self.unknown_types = policy;
        self
    }

    /// Defaults for [`Relation::import`](crate::Relation::import).
    pub fn import_options(&mut self, options: ImportOptions) -> &mut Self {
        self.import = options;
        self
    }

    pub async fn connect(&mut self, url: &str) -> Result<Db> {
        let gateway = super::connect(url).await?;
        self.build_shared(gateway).await
    }

    pub async fn build(&mut self, gateway: impl Gateway) -> Result<Db> {
        self.build_shared(Arc::new(gateway)).await
    }

    /// Infers and resolves every registered relation.
    ///
    /// A registered relation that does not exist fails the build. Relations
    /// declared with `infer = false` are built from their declarations
    /// alone.
    pub async fn build_shared(&mut self, gateway: Arc<dyn Gateway>) -> Result<Db> {
        let dialect = gateway.dialect();
        let inferrer = Inferrer::new(&*gateway, &self.registry).unknown_types(self.unknown_types);

        let mut names = IndexSet::new();
        if self.infer_all {
            names.extend(inferrer.relations().await?);
        }
        names.extend(self.relations.iter().cloned());
        names.extend(self.config.relations.keys().cloned());

        let mut schemas = Vec::with_capacity(names.len());

        for name in &names {
            let config = self.config.relation(name);

            let builder = match config {
                Some(config) if !config.infer => Schema::builder(&name[..]),
                _ => inferrer.infer(name).await?,
            };

            let builder = match config {
                Some(config) => config.apply(builder, &self.registry, dialect, self.unknown_types)?,
                None => builder,
            };

            schemas.push(builder.build()?);
        }

        let catalog = Catalog::build(schemas, &self.config)?;
        log::debug!("built catalog; relations={}; dialect={dialect:?}", catalog.len());

        Ok(Db {
            shared: Arc::new(Shared {
                gateway,
                catalog,
                import: self.import.clone(),
            }),
        })
    }
}
