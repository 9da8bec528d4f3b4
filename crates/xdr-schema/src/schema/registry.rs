//! Named struct schemas and reference resolution.

use std::convert::Infallible;
use std::sync::{Arc, Weak};

use rustc_hash::{FxHashMap, FxHashSet};

use crate::codec::Codec;
use crate::error::SchemaError;
use crate::limits::DEFAULT_MAX_DEPTH;
use crate::schema::structure::{Placeholder, StructRef, StructSchema};

/// Placeholder for a struct schema that is looked up by name when the
/// enclosing schema is registered.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    name: Arc<str>,
}

impl Reference {
    pub fn new(name: &str) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A namespace of struct schemas.
///
/// A field may refer to the schema being created (directly or nested in
/// arrays and optionals), to any schema already in the registry, or to a
/// name reserved with [`declare`](Self::declare). Everything else fails with
/// [`SchemaError::UnresolvedReference`].
///
/// Mutually recursive schemas are built by declaring the later names first:
///
/// ```rust
/// use xdr_schema::{Codec, Registry};
///
/// let mut registry = Registry::new();
/// registry.declare("Forest").unwrap();
/// registry
///     .create("Tree", [("children", Codec::option(Codec::reference("Forest")))])
///     .unwrap();
/// registry
///     .create("Forest", [("trees", Codec::var_array(Codec::reference("Tree"), 8))])
///     .unwrap();
/// assert!(registry.pending().next().is_none());
/// ```
#[derive(Debug, Default)]
pub struct Registry {
    schemas: FxHashMap<Arc<str>, Arc<StructSchema>>,
    pending: FxHashMap<Arc<str>, Arc<Placeholder>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves `name` so other schemas can refer to it before it is created.
    ///
    /// References to a declared name do not own the schema; it stays alive
    /// through the registry or any other handle. Declaring a name twice is a
    /// no-op, declaring a registered name is [`SchemaError::DuplicateSchema`].
    pub fn declare(&mut self, name: &str) -> Result<(), SchemaError> {
        if self.schemas.contains_key(name) {
            return Err(SchemaError::DuplicateSchema {
                name: name.to_string(),
            });
        }
        if !self.pending.contains_key(name) {
            tracing::debug!(schema = name, "declared struct schema");
            self.pending.insert(name.into(), Arc::default());
        }
        Ok(())
    }

    /// Declares a struct schema with the default maximum depth.
    pub fn create<N, I>(&mut self, name: &str, fields: I) -> Result<Arc<StructSchema>, SchemaError>
    where
        N: Into<Arc<str>>,
        I: IntoIterator<Item = (N, Codec)>,
    {
        self.create_with_max_depth(name, fields, DEFAULT_MAX_DEPTH)
    }

    pub fn create_with_max_depth<N, I>(
        &mut self,
        name: &str,
        fields: I,
        max_depth: u32,
    ) -> Result<Arc<StructSchema>, SchemaError>
    where
        N: Into<Arc<str>>,
        I: IntoIterator<Item = (N, Codec)>,
    {
        if self.schemas.contains_key(name) {
            return Err(SchemaError::DuplicateSchema {
                name: name.to_string(),
            });
        }

        let mut seen = FxHashSet::default();
        let mut resolved = Vec::new();
        for (field, codec) in fields {
            let field: Arc<str> = field.into();
            if !seen.insert(Arc::clone(&field)) {
                return Err(SchemaError::DuplicateField {
                    schema: name.to_string(),
                    field: field.to_string(),
                });
            }
            resolved.push((field, self.resolve(name, codec)?));
        }

        let name: Arc<str> = name.into();
        let field_count = resolved.len();
        let schema = Arc::new_cyclic(|this: &Weak<StructSchema>| {
            let fields = resolved
                .into_iter()
                .map(|(field, codec)| (field, bind_self(codec, &name, this)))
                .collect();
            StructSchema::new(Arc::clone(&name), fields, max_depth)
        });

        if let Some(placeholder) = self.pending.remove(&name) {
            // Removed from `pending` before filling, so this is the only set
            let _ = placeholder.set(Arc::downgrade(&schema));
        }

        tracing::debug!(
            schema = %name,
            fields = field_count,
            max_depth,
            "registered struct schema"
        );
        self.schemas.insert(name, Arc::clone(&schema));
        Ok(schema)
    }

    /// Replaces references to registered schemas with the schemas themselves
    /// and references to declared names with their placeholders. References
    /// back to `declaring` are left for [`bind_self`].
    fn resolve(&self, declaring: &str, codec: Codec) -> Result<Codec, SchemaError> {
        match codec {
            Codec::Reference(r) if r.name() == declaring => Ok(Codec::Reference(r)),
            Codec::Reference(r) => {
                if let Some(schema) = self.schemas.get(r.name()) {
                    return Ok(Codec::from(schema));
                }
                if let Some((name, placeholder)) = self.pending.get_key_value(r.name()) {
                    let target = StructRef::declared(Arc::clone(name), Arc::clone(placeholder));
                    return Ok(target.into());
                }
                tracing::debug!(
                    referrer = declaring,
                    name = r.name(),
                    "unresolved struct reference"
                );
                Err(SchemaError::UnresolvedReference {
                    referrer: declaring.to_string(),
                    name: r.name().to_string(),
                })
            }
            Codec::Array(a) => a.try_map_child(|c| self.resolve(declaring, c)).map(Codec::Array),
            Codec::VarArray(a) => a
                .try_map_child(|c| self.resolve(declaring, c))
                .map(Codec::VarArray),
            Codec::Option(o) => o.try_map_child(|c| self.resolve(declaring, c)).map(Codec::Option),
            other @ (Codec::Scalar(_) | Codec::Struct(_)) => Ok(other),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<StructSchema>> {
        self.schemas.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Registered schema names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.schemas.keys().map(|name| &**name)
    }

    /// Names declared but not created yet, in no particular order.
    pub fn pending(&self) -> impl Iterator<Item = &str> + '_ {
        self.pending.keys().map(|name| &**name)
    }
}

/// After [`Registry::resolve`] the only references left point at the schema
/// under construction.
fn bind_self(codec: Codec, name: &Arc<str>, this: &Weak<StructSchema>) -> Codec {
    let bind = |c| Ok::<_, Infallible>(bind_self(c, name, this));
    match codec {
        Codec::Reference(_) => StructRef::recursive(Arc::clone(name), this.clone()).into(),
        Codec::Array(a) => {
            let Ok(a) = a.try_map_child(bind);
            Codec::Array(a)
        }
        Codec::VarArray(a) => {
            let Ok(a) = a.try_map_child(bind);
            Codec::VarArray(a)
        }
        Codec::Option(o) => {
            let Ok(o) = o.try_map_child(bind);
            Codec::Option(o)
        }
        other @ (Codec::Scalar(_) | Codec::Struct(_)) => other,
    }
}
