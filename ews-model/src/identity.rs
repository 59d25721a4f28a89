//! Identity delegation.
//!
//! Folders, items and some configuration objects carry their `Id`/`ChangeKey`
//! pair on a nested identifier element rather than on themselves. Such types
//! declare an [`IdentitySlot`](crate::IdentitySlot) and expose the pair as the
//! virtual fields `id` and `changekey`.

use crate::{Element, ElementType, FieldValue, ModelError, ModelResult};
use ews_types::{Version, XmlElement};

/// Virtual field name of the delegated id.
pub const ID: &str = "id";
/// Virtual field name of the delegated change key.
pub const CHANGEKEY: &str = "changekey";

/// Capability of entities whose identity lives on a nested element.
///
/// Reads return `None` until the nested element exists; the first write
/// creates it. Each half of the pair is set independently.
pub trait HasDelegatedIdentity {
    fn id(&self) -> Option<&str>;

    fn changekey(&self) -> Option<&str>;

    fn set_id(&mut self, id: impl Into<String>) -> ModelResult<()>;

    fn set_changekey(&mut self, changekey: impl Into<String>) -> ModelResult<()>;

    /// Renders only the nested identity element.
    fn to_id_wire(&mut self, version: &Version) -> ModelResult<XmlElement>;
}

impl HasDelegatedIdentity for Element {
    fn id(&self) -> Option<&str> {
        self.identity()?.get_str(ID)
    }

    fn changekey(&self) -> Option<&str> {
        self.identity()?.get_str(CHANGEKEY)
    }

    fn set_id(&mut self, id: impl Into<String>) -> ModelResult<()> {
        self.set_identity_attr(ID, FieldValue::Text(id.into()))
    }

    fn set_changekey(&mut self, changekey: impl Into<String>) -> ModelResult<()> {
        self.set_identity_attr(CHANGEKEY, FieldValue::Text(changekey.into()))
    }

    fn to_id_wire(&mut self, version: &Version) -> ModelResult<XmlElement> {
        let ty = self.element_type();
        if ty.identity().is_none() {
            return Err(ModelError::InvalidAttribute {
                type_name: ty.type_name,
                name: ID.to_string(),
            });
        }
        match self.identity_mut() {
            Some(identity) => identity.to_wire(version),
            None => Err(ModelError::MissingRequiredField { field: ID.to_string() }),
        }
    }
}

/// Reads `(id, changekey)` straight off a response element of type `ty`
/// without unmarshalling the rest of it.
pub fn id_from_wire(ty: &'static ElementType, wire: &XmlElement) -> ModelResult<(Option<String>, Option<String>)> {
    let slot = ty.identity().ok_or_else(|| ModelError::InvalidAttribute {
        type_name: ty.type_name,
        name: ID.to_string(),
    })?;
    let Some(id_element) = wire.find(&slot.ty.response_tag()) else {
        return Ok((None, None));
    };
    let id_attr = slot.ty.get_field_by_fieldname(ID)?;
    let changekey_attr = slot.ty.get_field_by_fieldname(CHANGEKEY)?;
    Ok((
        id_element.attr(id_attr.wire_name()).map(str::to_string),
        id_element.attr(changekey_attr.wire_name()).map(str::to_string),
    ))
}
