//! User configuration objects: named settings blobs stored on a folder.

use crate::ids::{DISTINGUISHED_FOLDER_ID, FOLDER_ID, ITEM_ID};
use ews_model::{Element, ElementHooks, ElementType, Field, Fields, ModelResult};
use ews_types::{QName, XmlElement};

fn user_configuration_name_fields() -> ModelResult<Fields> {
    Fields::new(vec![
        Field::char("name", "Name").attribute(),
        Field::element("folder", &FOLDER_ID),
    ])
}

/// Responses may name a distinguished folder instead of a regular one. It is
/// read into `folder` as a `FolderId` carrying the distinguished name.
struct UserConfigurationNameHooks;

impl ElementHooks for UserConfigurationNameHooks {
    fn before_from_wire(&self, wire: &mut XmlElement) -> ModelResult<()> {
        if let Some(mut distinguished) = wire.take(&DISTINGUISHED_FOLDER_ID.response_tag()) {
            distinguished.rename(FOLDER_ID.response_tag());
            wire.push(distinguished);
        }
        Ok(())
    }
}

pub static USER_CONFIGURATION_NAME: ElementType =
    ElementType::new("UserConfigurationName", "UserConfigurationName", user_configuration_name_fields)
        .with_hooks(&UserConfigurationNameHooks);
/// The same name element in the messages namespace, as used by request
/// bodies.
pub static USER_CONFIGURATION_NAME_MNS: ElementType =
    ElementType::new("UserConfigurationNameMNS", "UserConfigurationName", user_configuration_name_fields)
        .in_messages()
        .with_hooks(&UserConfigurationNameHooks);

fn user_configuration_fields() -> ModelResult<Fields> {
    Fields::new(vec![
        Field::element("_id", &ITEM_ID),
        Field::element("user_configuration_name", &USER_CONFIGURATION_NAME),
        Field::dictionary("dictionary", "Dictionary"),
        Field::base64("xml_data", "XmlData"),
        Field::base64("binary_data", "BinaryData"),
    ])
}

pub static USER_CONFIGURATION: ElementType =
    ElementType::new("UserConfiguration", "UserConfiguration", user_configuration_fields)
        .in_messages()
        .with_identity("_id", &ITEM_ID);

/// Builds a `UserConfigurationName` for `name` stored on `folder`.
pub fn user_configuration_name(name: &str, folder: Option<Element>) -> ModelResult<Element> {
    let mut element = Element::empty(&USER_CONFIGURATION_NAME);
    element.set("name", name)?;
    if let Some(folder) = folder {
        element.set("folder", folder)?;
    }
    Ok(element)
}
