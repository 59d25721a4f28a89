//! Process-wide schema registry.
//!
//! Each entity type resolves its schema through this registry rather than
//! holding it inline, so that [`ElementType::add_field`] can extend one type's
//! wire shape at run time without touching any other type.
//!
//! Readers get an `Arc` snapshot and never block on a mutation in progress.
//! Mutations copy the current schema, edit the copy and swap it in while
//! holding a single mutex, so concurrent extensions never lose each other's
//! changes.

use crate::{ElementType, Field, Fields, ModelResult};
use std::collections::HashMap;
use std::sync::{Arc, LazyLock, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

/// Identity of an entity type: the address of its `static`. Two types may
/// share a `type_name` and still have unrelated schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct TypeKey(usize);

impl TypeKey {
    fn of(ty: &'static ElementType) -> Self {
        Self(std::ptr::from_ref(ty) as usize)
    }
}

type SchemaMap = HashMap<TypeKey, Arc<Fields>>;

static SCHEMAS: LazyLock<RwLock<SchemaMap>> = LazyLock::new(|| RwLock::new(HashMap::new()));
static SCHEMA_LOCK: Mutex<()> = Mutex::new(());

// A panic while holding either lock can't leave a half-written schema
// behind: the map only ever stores complete `Arc`s.
fn read_map() -> RwLockReadGuard<'static, SchemaMap> {
    SCHEMAS.read().unwrap_or_else(PoisonError::into_inner)
}

fn write_map() -> RwLockWriteGuard<'static, SchemaMap> {
    SCHEMAS.write().unwrap_or_else(PoisonError::into_inner)
}

/// Returns the current schema of `ty`, building the declared one on first use.
pub(crate) fn schema(ty: &'static ElementType) -> ModelResult<Arc<Fields>> {
    let key = TypeKey::of(ty);
    if let Some(fields) = read_map().get(&key) {
        return Ok(Arc::clone(fields));
    }
    let declared = Arc::new(ty.declared_fields()?);
    let mut map = write_map();
    Ok(Arc::clone(map.entry(key).or_insert(declared)))
}

/// Applies `edit` to a private copy of the schema of `ty` and publishes it.
fn mutate<T>(ty: &'static ElementType, edit: impl FnOnce(&mut Fields) -> ModelResult<T>) -> ModelResult<T> {
    let _guard = SCHEMA_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    let mut fields = schema(ty)?.copy();
    let out = edit(&mut fields)?;
    write_map().insert(TypeKey::of(ty), Arc::new(fields));
    Ok(out)
}

pub(crate) fn add_field(ty: &'static ElementType, field: Field, after: &str) -> ModelResult<()> {
    let name = field.name().to_string();
    mutate(ty, |fields| {
        let position = fields.index_of(after)? + 1;
        fields.insert_at(position, field)
    })?;
    debug!(type_name = ty.type_name, field = %name, after, "Added field to schema");
    Ok(())
}

pub(crate) fn remove_field(ty: &'static ElementType, name: &str) -> ModelResult<Field> {
    let field = mutate(ty, |fields| fields.remove(name))?;
    debug!(type_name = ty.type_name, field = name, "Removed field from schema");
    Ok(field)
}

pub(crate) fn reset_fields(ty: &'static ElementType) {
    let _guard = SCHEMA_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    if write_map().remove(&TypeKey::of(ty)).is_some() {
        debug!(type_name = ty.type_name, "Reset schema to declared fields");
    }
}
