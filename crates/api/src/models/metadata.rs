use super::symbol::{Location, Range};
use serde::{Deserialize, Serialize};

/// Decorators a component class member can carry.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Decorator {
    Api,
    Track,
    Wire,
}

impl Decorator {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "api" => Some(Self::Api),
            "track" => Some(Self::Track),
            "wire" => Some(Self::Wire),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Api => "api",
            Self::Track => "track",
            Self::Wire => "wire",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
    Property,
    Method,
}

/// A field, accessor or method declared on the component class.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClassMember {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: MemberKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decorator: Option<Decorator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loc: Option<Range>,
}

/// Structured result of compiling a component module.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ComponentMetadata {
    #[serde(default)]
    pub decorators: Vec<Decorator>,
    #[serde(default)]
    pub class_members: Vec<ClassMember>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declaration_loc: Option<Range>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

/// Attribute view of a decorated property, as offered to completion/hover.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AttributeInfo {
    pub name: String,
    pub decorator: Option<Decorator>,
    pub documentation: Option<String>,
    pub location: Option<Location>,
}

impl AttributeInfo {
    /// Markdown bullet used in component descriptions.
    pub fn markdown(&self) -> String {
        match (&self.decorator, &self.documentation) {
            (Some(d), Some(doc)) => format!("- **{}**: *@{}* {}", self.name, d.as_str(), doc),
            (Some(d), None) => format!("- **{}**: *@{}*", self.name, d.as_str()),
            (None, Some(doc)) => format!("- **{}** {}", self.name, doc),
            (None, None) => format!("- **{}**", self.name),
        }
    }
}
