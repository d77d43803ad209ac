use super::{NativeType, SemanticType, TypeMeta};
use crate::{driver::Dialect, stmt::Type, Error, Result};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Maps native column types to semantic types.
///
/// Built once at configuration time and shared read-only afterwards. Custom
/// registrations take precedence over the built-in mappings.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    custom: IndexMap<String, Type>,
}

/// What schema inference does with a column whose native type does not
/// resolve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownTypePolicy {
    /// Abort inference with an unknown type error.
    Fail,

    /// Keep the column as an opaque type whose values pass through
    /// untouched, and log a warning.
    #[default]
    Raw,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a semantic type for a native type name, e.g. a database
    /// enum or domain. Names are matched case-insensitively, with or
    /// without parameters.
    pub fn register(&mut self, native: impl AsRef<str>, ty: Type) -> &mut Self {
        self.custom
            .insert(native.as_ref().trim().to_ascii_lowercase(), ty);
        self
    }

    pub fn is_registered(&self, native: &str) -> bool {
        self.custom
            .contains_key(&native.trim().to_ascii_lowercase())
    }

    /// Resolves a native type name for the given dialect.
    ///
    /// Fails with an unknown type error carrying the raw string when the
    /// name is not recognized. SQLite never fails: unrecognized names fall
    /// back to the engine's type affinity rules.
    pub fn resolve(&self, native: &str, dialect: Dialect) -> Result<SemanticType> {
        let parsed = NativeType::parse(native, dialect);
        let ty = self.resolve_parsed(&parsed, dialect)?;

        let meta = match &ty {
            Type::String => TypeMeta {
                max_length: parsed.param(0),
                ..TypeMeta::default()
            },
            Type::Decimal => TypeMeta {
                precision: parsed.param(0),
                scale: parsed.param(1),
                ..TypeMeta::default()
            },
            Type::Time | Type::Timestamp | Type::TimestampTz => TypeMeta {
                precision: parsed.param(0),
                ..TypeMeta::default()
            },
            _ => TypeMeta::default(),
        };

        Ok(SemanticType::new(native, ty).with_meta(meta))
    }

    /// Resolves a native type, applying `policy` when it is unknown.
    pub fn resolve_or(
        &self,
        native: &str,
        dialect: Dialect,
        policy: UnknownTypePolicy,
    ) -> Result<SemanticType> {
        match self.resolve(native, dialect) {
            Err(err) if err.is_unknown_type() && policy == UnknownTypePolicy::Raw => {
                log::warn!("unknown native type `{native}`; keeping values as raw");
                Ok(SemanticType::raw(native))
            }
            res => res,
        }
    }

    fn resolve_parsed(&self, native: &NativeType, dialect: Dialect) -> Result<Type> {
        if let Some(ty) = self
            .custom
            .get(&native.raw.trim().to_ascii_lowercase())
            .or_else(|| self.custom.get(&native.name))
        {
            return Ok(if native.is_array() {
                Type::list(ty.clone())
            } else {
                ty.clone()
            });
        }

        if native.is_array() {
            let element = self.resolve_parsed(&native.element(), dialect)?;
            return Ok(Type::list(element));
        }

        if let Some(ty) = builtin(native, dialect) {
            return Ok(ty);
        }

        match dialect {
            Dialect::Sqlite => Ok(affinity(&native.name)),
            _ => Err(Error::unknown_type(native.raw.clone())),
        }
    }
}

fn builtin(native: &NativeType, dialect: Dialect) -> Option<Type> {
    use Dialect::*;

    let name = &native.name[..];

    Some(match (name, dialect) {
        ("bool" | "boolean", _) => Type::Bool,
        ("tinyint", Mysql) if native.param(0) == Some(1) => Type::Bool,
        ("integer" | "int", Sqlite) => Type::I64,
        ("int" | "integer" | "mediumint", Mysql) if native.unsigned => Type::I64,
        (
            "smallint" | "int2" | "tinyint" | "mediumint" | "int" | "integer" | "int4" | "serial"
            | "smallserial" | "serial4" | "serial2" | "year",
            _,
        ) => Type::I32,
        ("bigint" | "int8" | "bigserial" | "serial8", _) => Type::I64,
        (
            "real" | "float" | "float4" | "float8" | "double" | "double precision",
            _,
        ) => Type::F64,
        ("numeric" | "decimal", _) => Type::Decimal,
        (
            "text" | "varchar" | "character varying" | "char" | "character" | "bpchar" | "name"
            | "citext" | "nvarchar" | "nchar" | "clob",
            _,
        ) => Type::String,
        ("tinytext" | "mediumtext" | "longtext", Mysql) => Type::String,
        ("bytea", Postgresql) => Type::Bytes,
        ("blob" | "binary" | "varbinary" | "tinyblob" | "mediumblob" | "longblob", Mysql | Sqlite) => {
            Type::Bytes
        }
        ("uuid", _) => Type::Uuid,
        ("date", _) => Type::Date,
        ("time" | "time without time zone", _) => Type::Time,
        ("timestamp" | "timestamp without time zone" | "datetime", _) => Type::Timestamp,
        ("timestamptz" | "timestamp with time zone", Postgresql | Sqlite) => Type::TimestampTz,
        ("json", _) | ("jsonb", Postgresql) => Type::Json,
        ("enum", Mysql) => Type::Enum(native.params.clone()),
        ("int4range", Postgresql) => Type::range(Type::I32),
        ("int8range", Postgresql) => Type::range(Type::I64),
        ("numrange", Postgresql) => Type::range(Type::Decimal),
        ("tsrange", Postgresql) => Type::range(Type::Timestamp),
        ("tstzrange", Postgresql) => Type::range(Type::TimestampTz),
        ("daterange", Postgresql) => Type::range(Type::Date),
        (
            "inet" | "cidr" | "macaddr" | "macaddr8" | "point" | "line" | "lseg" | "box" | "path"
            | "polygon" | "circle" | "tsvector" | "tsquery" | "interval" | "money" | "xml"
            | "bit" | "bit varying" | "varbit" | "timetz" | "time with time zone" | "oid",
            Postgresql,
        ) => Type::Custom(name.to_string()),
        ("set" | "bit" | "geometry" | "point" | "polygon", Mysql) => Type::Custom(name.to_string()),
        _ => return None,
    })
}

/// SQLite column affinity rules (section 3.1 of "Datatypes In SQLite").
fn affinity(name: &str) -> Type {
    if name.contains("int") {
        Type::I64
    } else if name.contains("char") || name.contains("clob") || name.contains("text") {
        Type::String
    } else if name.contains("blob") {
        Type::Bytes
    } else if name.contains("real") || name.contains("floa") || name.contains("doub") {
        Type::F64
    } else if name.is_empty() {
        // No declared type: values keep whatever storage class they have
        Type::Custom(String::new())
    } else {
        Type::Decimal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parametrized_types_carry_metadata() {
        let registry = TypeRegistry::new();

        let ty = registry
            .resolve("character varying(120)", Dialect::Postgresql)
            .unwrap();
        assert_eq!(ty.ty, Type::String);
        assert_eq!(ty.meta.max_length, Some(120));

        let ty = registry.resolve("numeric(10,2)", Dialect::Postgresql).unwrap();
        assert_eq!(ty.ty, Type::Decimal);
        assert_eq!((ty.meta.precision, ty.meta.scale), (Some(10), Some(2)));
    }

    #[test]
    fn arrays_nest_their_element_type() {
        let registry = TypeRegistry::new();

        let ty = registry.resolve("_int8", Dialect::Postgresql).unwrap();
        assert_eq!(ty.ty, Type::list(Type::I64));

        let ty = registry.resolve("text[][]", Dialect::Postgresql).unwrap();
        assert_eq!(ty.ty, Type::list(Type::list(Type::String)));
    }

    #[test]
    fn vendor_types() {
        let registry = TypeRegistry::new();

        for (native, ty) in [
            ("jsonb", Type::Json),
            ("tstzrange", Type::range(Type::TimestampTz)),
            ("inet", Type::Custom("inet".into())),
            ("point", Type::Custom("point".into())),
            ("tsvector", Type::Custom("tsvector".into())),
        ] {
            assert_eq!(registry.resolve(native, Dialect::Postgresql).unwrap().ty, ty);
        }

        assert_eq!(
            registry.resolve("tinyint(1)", Dialect::Mysql).unwrap().ty,
            Type::Bool
        );
        assert_eq!(
            registry.resolve("enum('a','b')", Dialect::Mysql).unwrap().ty,
            Type::Enum(vec!["a".into(), "b".into()])
        );
    }

    #[test]
    fn unknown_types_fail_with_raw_string() {
        let registry = TypeRegistry::new();

        let err = registry
            .resolve("geography(Point,4326)", Dialect::Postgresql)
            .unwrap_err();
        assert!(err.is_unknown_type());
        assert_eq!(err.unknown_type_name(), Some("geography(Point,4326)"));
    }

    #[test]
    fn unknown_type_policy() {
        let registry = TypeRegistry::new();

        let ty = registry
            .resolve_or("geography", Dialect::Postgresql, UnknownTypePolicy::Raw)
            .unwrap();
        assert!(ty.is_raw());
        assert_eq!(ty.ty, Type::Custom("geography".into()));

        assert!(registry
            .resolve_or("geography", Dialect::Postgresql, UnknownTypePolicy::Fail)
            .unwrap_err()
            .is_unknown_type());
    }

    #[test]
    fn sqlite_falls_back_to_affinity() {
        let registry = TypeRegistry::new();

        for (native, ty) in [
            ("INTEGER", Type::I64),
            ("BIGINT UNSIGNED", Type::I64),
            ("VARCHAR(20)", Type::String),
            ("NATIVE CHARACTER(70)", Type::String),
            ("FLOATING POINT", Type::I64),
            ("REALNUM", Type::F64),
            ("whatever", Type::Decimal),
            ("", Type::Custom(String::new())),
        ] {
            assert_eq!(registry.resolve(native, Dialect::Sqlite).unwrap().ty, ty, "{native}");
        }
    }

    #[test]
    fn registered_types_take_precedence() {
        let mut registry = TypeRegistry::new();
        registry.register("mood", Type::Enum(vec!["happy".into(), "sad".into()]));

        assert_eq!(
            registry.resolve("MOOD", Dialect::Postgresql).unwrap().ty,
            Type::Enum(vec!["happy".into(), "sad".into()])
        );
        assert_eq!(
            registry.resolve("_mood", Dialect::Postgresql).unwrap().ty,
            Type::list(Type::Enum(vec!["happy".into(), "sad".into()]))
        );
    }
}
