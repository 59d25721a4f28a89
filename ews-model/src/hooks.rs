use crate::{Element, Hashable, ModelResult};
use ews_types::{Version, XmlElement};

/// Optional per-type behavior layered on top of the generic entity engine.
///
/// Most entity types do NOT need this; the engine validates, marshals and
/// hashes everything from the schema alone.
///
/// Implement it only if the type needs:
/// - Normalization before field validation (e.g. coercing a numeric postal code)
/// - Cross-field invariants (e.g. a date range whose end precedes its start)
/// - A non-structural identity (e.g. mailboxes compare by address)
/// - A wire shape the schema can't describe (e.g. fields read from a wrapper)
pub trait ElementHooks: Send + Sync {
    /// Called before any field is cleaned.
    fn before_clean(&self, element: &mut Element, version: Option<&Version>) -> ModelResult<()> {
        let _ = (element, version);
        Ok(())
    }

    /// Called after every field has been cleaned.
    /// Return an error to reject the element.
    fn after_clean(&self, element: &mut Element, version: Option<&Version>) -> ModelResult<()> {
        let _ = (element, version);
        Ok(())
    }

    /// Called with the raw wire element before fields are extracted.
    fn before_from_wire(&self, wire: &mut XmlElement) -> ModelResult<()> {
        let _ = wire;
        Ok(())
    }

    /// Called on the freshly unmarshalled element.
    fn after_from_wire(&self, element: &mut Element) -> ModelResult<()> {
        let _ = element;
        Ok(())
    }

    /// Replaces the structural hash key. `None` keeps the default.
    fn hash_key(&self, element: &Element) -> Option<Hashable> {
        let _ = element;
        None
    }
}

/// Hooks for types with no custom behavior.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl ElementHooks for NoHooks {}
