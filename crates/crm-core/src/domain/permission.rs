// ============================================================================
// CRM Core - Permission Values
// File: crates/crm-core/src/domain/permission.rs
// Description: Group grants per module, legacy boolean or granular record
// ============================================================================

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Action requested against a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    View,
    Edit,
    Delete,
}

impl Action {
    pub const ALL: [Action; 3] = [Action::View, Action::Edit, Action::Delete];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::View => "view",
            Action::Edit => "edit",
            Action::Delete => "delete",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "view" => Some(Action::View),
            "edit" => Some(Action::Edit),
            "delete" => Some(Action::Delete),
            _ => None,
        }
    }
}

/// Granular per-action flags for one module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GranularPermission {
    #[serde(default)]
    pub can_view: bool,
    #[serde(default)]
    pub can_edit: bool,
    #[serde(default)]
    pub can_delete: bool,
}

impl GranularPermission {
    pub fn full_access() -> Self {
        Self {
            can_view: true,
            can_edit: true,
            can_delete: true,
        }
    }

    pub fn read_only() -> Self {
        Self {
            can_view: true,
            can_edit: false,
            can_delete: false,
        }
    }

    pub fn allows(&self, action: Action) -> bool {
        match action {
            Action::View => self.can_view,
            Action::Edit => self.can_edit,
            Action::Delete => self.can_delete,
        }
    }

    /// Reads a stored JSON object. Only a literal `true` sets a flag; other
    /// members are not kept, so a record written back is normalized to the
    /// three boolean flags. Storage only rewrites the module being granted.
    fn from_json_object(object: &serde_json::Map<String, Value>) -> Self {
        let flag = |name: &str| matches!(object.get(name), Some(Value::Bool(true)));
        Self {
            can_view: flag("can_view"),
            can_edit: flag("can_edit"),
            can_delete: flag("can_delete"),
        }
    }
}

/// Grant stored for one module key in a group's permission mapping.
#[derive(Debug, Clone, PartialEq)]
pub enum PermissionValue {
    /// Legacy shape: `true` covers view, edit and delete at once.
    Unrestricted(bool),
    Granular(GranularPermission),
    /// Stored data matching neither shape. Kept verbatim so it survives a
    /// read/write cycle; never grants anything.
    Unrecognized(Value),
}

impl PermissionValue {
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Bool(flag) => PermissionValue::Unrestricted(flag),
            Value::Object(ref object) => {
                PermissionValue::Granular(GranularPermission::from_json_object(object))
            }
            other => PermissionValue::Unrecognized(other),
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, PermissionValue::Unrecognized(_))
    }

    pub fn shape(&self) -> &'static str {
        match self {
            PermissionValue::Unrestricted(_) => "legacy",
            PermissionValue::Granular(_) => "granular",
            PermissionValue::Unrecognized(_) => "unrecognized",
        }
    }
}

impl From<bool> for PermissionValue {
    fn from(flag: bool) -> Self {
        PermissionValue::Unrestricted(flag)
    }
}

impl From<GranularPermission> for PermissionValue {
    fn from(permission: GranularPermission) -> Self {
        PermissionValue::Granular(permission)
    }
}

impl Serialize for PermissionValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PermissionValue::Unrestricted(flag) => serializer.serialize_bool(*flag),
            PermissionValue::Granular(permission) => permission.serialize(serializer),
            PermissionValue::Unrecognized(raw) => raw.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for PermissionValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(PermissionValue::from_json)
    }
}

/// Module key to grant mapping of a permission group.
///
/// Keys are opaque, already-normalized module keys. JSON `null` entries are
/// dropped on read, the same as an absent key.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct PermissionMap(BTreeMap<String, PermissionValue>);

impl PermissionMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, module_key: &str) -> Option<&PermissionValue> {
        self.0.get(module_key)
    }

    pub fn insert(
        &mut self,
        module_key: impl Into<String>,
        value: impl Into<PermissionValue>,
    ) -> Option<PermissionValue> {
        self.0.insert(module_key.into(), value.into())
    }

    pub fn remove(&mut self, module_key: &str) -> Option<PermissionValue> {
        self.0.remove(module_key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &PermissionValue)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Object(Default::default()))
    }

    /// Builds a map from stored JSON. Anything other than an object yields an
    /// empty map.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Object(object) => object
                .into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, PermissionValue::from_json(v)))
                .collect(),
            _ => Self::default(),
        }
    }
}

impl<K: Into<String>, V: Into<PermissionValue>> FromIterator<(K, V)> for PermissionMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<'de> Deserialize<'de> for PermissionMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, Value>::deserialize(deserializer)?;
        Ok(raw
            .into_iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| (k, PermissionValue::from_json(v)))
            .collect())
    }
}
