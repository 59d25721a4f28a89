//! Folder permissions and delegate settings.

use ews_model::{Choice, Element, ElementType, Field, Fields, ModelResult};

fn user_id_fields() -> ModelResult<Fields> {
    Fields::new(vec![
        Field::char("sid", "SID"),
        Field::text("primary_smtp_address", "PrimarySmtpAddress"),
        Field::char("display_name", "DisplayName"),
        Field::choice(
            "distinguished_user",
            "DistinguishedUser",
            vec![Choice::new("Default"), Choice::new("Anonymous")],
        ),
        Field::char("external_user_identity", "ExternalUserIdentity"),
    ])
}

pub static USER_ID: ElementType = ElementType::new("UserId", "UserId", user_id_fields);

const PERMISSION_LEVELS: &[&str] = &[
    "None",
    "Owner",
    "PublishingEditor",
    "Editor",
    "PublishingAuthor",
    "Author",
    "NoneditingAuthor",
    "Reviewer",
    "Contributor",
    "Custom",
];

const CALENDAR_PERMISSION_LEVELS: &[&str] = &[
    "None",
    "Owner",
    "PublishingEditor",
    "Editor",
    "PublishingAuthor",
    "Author",
    "NoneditingAuthor",
    "Reviewer",
    "Contributor",
    "FreeBusyTimeOnly",
    "FreeBusyTimeAndSubjectAndLocation",
    "Custom",
];

fn choices(values: &[&'static str]) -> Vec<Choice> {
    values.iter().copied().map(Choice::new).collect()
}

fn item_access(name: &'static str, wire_name: &'static str) -> Field {
    Field::choice(name, wire_name, choices(&["None", "Owned", "All"])).with_default("None")
}

/// Fields shared by folder and calendar permissions. The level always comes
/// first so calendar permissions can swap it out.
fn permission_fields() -> ModelResult<Fields> {
    Fields::new(vec![
        Field::choice("permission_level", "PermissionLevel", choices(PERMISSION_LEVELS)).with_default("None"),
        Field::boolean("can_create_items", "CanCreateItems").with_default(false),
        Field::boolean("can_create_subfolders", "CanCreateSubfolders").with_default(false),
        Field::boolean("is_folder_owner", "IsFolderOwner").with_default(false),
        Field::boolean("is_folder_visible", "IsFolderVisible").with_default(false),
        Field::boolean("is_folder_contact", "IsFolderContact").with_default(false),
        item_access("edit_items", "EditItems"),
        item_access("delete_items", "DeleteItems"),
        Field::choice("read_items", "ReadItems", choices(&["None", "FullDetails"])).with_default("None"),
        Field::element("user_id", &USER_ID).required(),
    ])
}

pub static PERMISSION: ElementType = ElementType::new("Permission", "Permission", permission_fields);

fn calendar_permission_fields() -> ModelResult<Fields> {
    Fields::new(vec![
        Field::choice(
            "calendar_permission_level",
            "CalendarPermissionLevel",
            choices(CALENDAR_PERMISSION_LEVELS),
        )
        .with_default("None"),
    ])?
    .concat(&permission_fields()?.slice(1..))
}

pub static CALENDAR_PERMISSION: ElementType =
    ElementType::new("CalendarPermission", "CalendarPermission", calendar_permission_fields);

fn permission_set_fields() -> ModelResult<Fields> {
    Fields::new(vec![
        Field::element_list("permissions", "Permissions", &PERMISSION),
        Field::element_list("calendar_permissions", "CalendarPermissions", &CALENDAR_PERMISSION),
        Field::text_list("unknown_entries", "UnknownEntries", "UnknownEntry"),
    ])
}

/// Covers both the folder and the calendar flavor of `PermissionSet`.
pub static PERMISSION_SET: ElementType = ElementType::new("PermissionSet", "PermissionSet", permission_set_fields);

fn effective_rights_fields() -> ModelResult<Fields> {
    Fields::new(vec![
        Field::boolean("create_associated", "CreateAssociated").with_default(false),
        Field::boolean("create_contents", "CreateContents").with_default(false),
        Field::boolean("create_hierarchy", "CreateHierarchy").with_default(false),
        Field::boolean("delete", "Delete").with_default(false),
        Field::boolean("modify", "Modify").with_default(false),
        Field::boolean("read", "Read").with_default(false),
        Field::boolean("view_private_items", "ViewPrivateItems").with_default(false),
    ])
}

pub static EFFECTIVE_RIGHTS: ElementType =
    ElementType::new("EffectiveRights", "EffectiveRights", effective_rights_fields);

/// True if `rights` grants `right`. Absent and unknown rights are not granted.
#[must_use]
pub fn has_right(rights: &Element, right: &str) -> bool {
    rights.get_bool(right).unwrap_or(false)
}

// ── Delegates ────────────────────────────────────────────────────

const DELEGATE_LEVELS: &[&str] = &["None", "Editor", "Reviewer", "Author", "Custom"];

fn delegate_permissions_fields() -> ModelResult<Fields> {
    let folders = [
        ("calendar_folder_permission_level", "CalendarFolderPermissionLevel"),
        ("tasks_folder_permission_level", "TasksFolderPermissionLevel"),
        ("inbox_folder_permission_level", "InboxFolderPermissionLevel"),
        ("contacts_folder_permission_level", "ContactsFolderPermissionLevel"),
        ("notes_folder_permission_level", "NotesFolderPermissionLevel"),
        ("journal_folder_permission_level", "JournalFolderPermissionLevel"),
    ];
    Fields::new(
        folders
            .into_iter()
            .map(|(name, wire_name)| Field::choice(name, wire_name, choices(DELEGATE_LEVELS)).with_default("None"))
            .collect(),
    )
}

pub static DELEGATE_PERMISSIONS: ElementType =
    ElementType::new("DelegatePermissions", "DelegatePermissions", delegate_permissions_fields);

fn delegate_user_fields() -> ModelResult<Fields> {
    Fields::new(vec![
        Field::element("user_id", &USER_ID),
        Field::element("delegate_permissions", &DELEGATE_PERMISSIONS),
        Field::boolean("receive_copies_of_meeting_messages", "ReceiveCopiesOfMeetingMessages").with_default(false),
        Field::boolean("view_private_items", "ViewPrivateItems").with_default(false),
    ])
}

pub static DELEGATE_USER: ElementType =
    ElementType::new("DelegateUser", "DelegateUser", delegate_user_fields).in_messages();
