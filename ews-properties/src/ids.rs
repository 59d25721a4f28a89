//! Item and folder identifiers.
//!
//! Every identifier carries an `id` and an optional `changekey`, each as an
//! XML attribute. Most share the `Id`/`ChangeKey` attribute names and differ
//! only in tag and namespace.

use crate::mailbox::MAILBOX;
use ews_model::identity::{CHANGEKEY, ID};
use ews_model::{Element, ElementHooks, ElementType, Field, Fields, ModelResult};
use ews_types::Version;

/// Distinguished folder id of the public folder root.
pub const PUBLIC_FOLDERS_ROOT: &str = "publicfoldersroot";

fn id_fields(id_attr: &'static str, changekey_attr: &'static str, changekey_required: bool) -> Vec<Field> {
    let changekey = Field::text(CHANGEKEY, changekey_attr).attribute();
    vec![
        Field::text(ID, id_attr).attribute().required(),
        if changekey_required { changekey.required() } else { changekey },
    ]
}

fn item_id_fields() -> ModelResult<Fields> {
    Fields::new(id_fields("Id", "ChangeKey", false))
}

pub static ITEM_ID: ElementType = ElementType::new("ItemId", "ItemId", item_id_fields);
pub static PARENT_ITEM_ID: ElementType = ElementType::new("ParentItemId", "ParentItemId", item_id_fields).in_messages();
pub static ASSOCIATED_CALENDAR_ITEM_ID: ElementType =
    ElementType::new("AssociatedCalendarItemId", "AssociatedCalendarItemId", item_id_fields);
/// The change key is sometimes required by the server for conversations.
pub static CONVERSATION_ID: ElementType = ElementType::new("ConversationId", "ConversationId", item_id_fields);
pub static PARENT_FOLDER_ID: ElementType = ElementType::new("ParentFolderId", "ParentFolderId", item_id_fields);
pub static REFERENCE_ITEM_ID: ElementType = ElementType::new("ReferenceItemId", "ReferenceItemId", item_id_fields);
pub static SOURCE_ID: ElementType = ElementType::new("SourceId", "SourceId", item_id_fields);
pub static FOLDER_ID: ElementType = ElementType::new("FolderId", "FolderId", item_id_fields);
pub static MOVED_ITEM_ID: ElementType = ElementType::new("MovedItemId", "MovedItemId", item_id_fields).in_messages();

fn root_item_id_fields() -> ModelResult<Fields> {
    Fields::new(id_fields("RootItemId", "RootItemChangeKey", true))
}

pub static ROOT_ITEM_ID: ElementType = ElementType::new("RootItemId", "RootItemId", root_item_id_fields).in_messages();

fn recurring_master_item_id_fields() -> ModelResult<Fields> {
    Fields::new(id_fields("OccurrenceId", "ChangeKey", false))
}

pub static RECURRING_MASTER_ITEM_ID: ElementType =
    ElementType::new("RecurringMasterItemId", "RecurringMasterItemId", recurring_master_item_id_fields);

fn occurrence_item_id_fields() -> ModelResult<Fields> {
    let mut fields = id_fields("RecurringMasterId", "ChangeKey", false);
    fields.push(
        Field::integer("instance_index", "InstanceIndex")
            .attribute()
            .required()
            .min(1),
    );
    Fields::new(fields)
}

pub static OCCURRENCE_ITEM_ID: ElementType =
    ElementType::new("OccurrenceItemId", "OccurrenceItemId", occurrence_item_id_fields);

// ── Distinguished folders ────────────────────────────────────────

fn distinguished_folder_id_fields() -> ModelResult<Fields> {
    item_id_fields()?.concat(&Fields::new(vec![Field::element("mailbox", &MAILBOX)])?)
}

struct DistinguishedFolderIdHooks;

impl ElementHooks for DistinguishedFolderIdHooks {
    // The server rejects a mailbox on the public folder root.
    fn after_clean(&self, element: &mut Element, _version: Option<&Version>) -> ModelResult<()> {
        if element.get_str(ID) == Some(PUBLIC_FOLDERS_ROOT) {
            element.unset("mailbox")?;
        }
        Ok(())
    }
}

pub static DISTINGUISHED_FOLDER_ID: ElementType =
    ElementType::new("DistinguishedFolderId", "DistinguishedFolderId", distinguished_folder_id_fields)
        .with_hooks(&DistinguishedFolderIdHooks);

/// Builds an identifier of type `ty` from its id and optional change key.
pub fn new_id(ty: &'static ElementType, id: impl Into<String>, changekey: Option<&str>) -> ModelResult<Element> {
    let mut element = Element::empty(ty);
    element.set(ID, id.into())?;
    if let Some(changekey) = changekey {
        element.set(CHANGEKEY, changekey)?;
    }
    Ok(element)
}
