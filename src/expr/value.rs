use std::fmt;

/// Host object families reachable from a condition.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    // Roots
    Switches,
    Variables,
    Actors,
    Party,
    System,
    Map,
    Player,
    Items,
    Weapons,
    Armors,
    Skills,
    States,
    Classes,
    // Elements
    Actor,
    Item,
    Weapon,
    Armor,
    Skill,
    State,
    Class,
    Event,
}

impl ObjectKind {
    /// Resolve a root name. Host-style globals (`$game_party`,
    /// `$data_items`) are accepted as aliases.
    pub fn root(name: &str) -> Option<Self> {
        let kind = match name {
            "switches" | "$game_switches" => Self::Switches,
            "variables" | "$game_variables" => Self::Variables,
            "actors" | "$game_actors" => Self::Actors,
            "party" | "$game_party" => Self::Party,
            "system" | "$game_system" => Self::System,
            "map" | "$game_map" => Self::Map,
            "player" | "$game_player" => Self::Player,
            "items" | "$data_items" => Self::Items,
            "weapons" | "$data_weapons" => Self::Weapons,
            "armors" | "$data_armors" => Self::Armors,
            "skills" | "$data_skills" => Self::Skills,
            "states" | "$data_states" => Self::States,
            "classes" | "$data_classes" => Self::Classes,
            _ => return None,
        };
        Some(kind)
    }

    /// Element kind produced by indexing a table root.
    pub fn element(&self) -> Option<Self> {
        match self {
            Self::Actors => Some(Self::Actor),
            Self::Items => Some(Self::Item),
            Self::Weapons => Some(Self::Weapon),
            Self::Armors => Some(Self::Armor),
            Self::Skills => Some(Self::Skill),
            Self::States => Some(Self::State),
            Self::Classes => Some(Self::Class),
            _ => None,
        }
    }
}

/// Opaque handle to a host object; `id` is 0 for singletons.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ObjectRef {
    pub kind: ObjectKind,
    pub id: i64,
}

impl ObjectRef {
    pub const fn new(kind: ObjectKind, id: i64) -> Self {
        Self { kind, id }
    }

    pub const fn root(kind: ObjectKind) -> Self {
        Self { kind, id: 0 }
    }

    pub const fn actor(id: i64) -> Self {
        Self::new(ObjectKind::Actor, id)
    }

    pub const fn item(id: i64) -> Self {
        Self::new(ObjectKind::Item, id)
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind.element().is_none() && self.id == 0 {
            write!(f, "{:?}", self.kind)
        } else {
            write!(f, "{:?}#{}", self.kind, self.id)
        }
    }
}

/// A runtime value. Only `Nil` and `Bool(false)` are falsy.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Value {
    Nil,
    Bool(bool),
    Int(i64),
    Str(String),
    List(Vec<Value>),
    Object(ObjectRef),
}

impl Value {
    pub fn truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Int(_) => "integer",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Object(_) => "object",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => f.write_str(""),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Str(s) => f.write_str(s),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Object(obj) => write!(f, "{obj}"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n as i64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<ObjectRef> for Value {
    fn from(obj: ObjectRef) -> Self {
        Value::Object(obj)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Nil, Into::into)
    }
}
