//! Snippet Protocol Types
//!
//! Request and response shapes of the interactive snippet protocol. Blocks
//! serialize with a `type` tag and omit absent optional fields.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Protocol version tag carried by every response.
pub const PROTOCOL_VERSION: &str = "2";

/// Customer profile. Only the fields the views read are typed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: Option<String>,
    pub email: Option<String>,
    pub mobile_number: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The customer the snippet is rendered for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnippetUser {
    pub id: String,
    pub member_id: Option<String>,
    pub profile: Option<Profile>,
}

impl SnippetUser {
    fn profile_field(&self, field: impl Fn(&Profile) -> Option<&String>) -> Option<&str> {
        self.profile
            .as_ref()
            .and_then(field)
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }

    pub fn name(&self) -> Option<&str> {
        self.profile_field(|p| p.name.as_ref())
    }

    pub fn email(&self) -> Option<&str> {
        self.profile_field(|p| p.email.as_ref())
    }

    pub fn mobile_number(&self) -> Option<&str> {
        self.profile_field(|p| p.mobile_number.as_ref())
    }
}

/// Reference to a platform object by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdRef {
    pub id: String,
}

/// The manager viewing the snippet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manager {
    pub id: String,
    pub name: String,
}

/// Snippet definition the request was issued for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnippetRef {
    pub id: String,
    pub name: String,
}

/// Interactive snippet request.
///
/// `component_id` is present on submit (button click or form submit) and
/// absent on the initial render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionRequest {
    pub user: SnippetUser,
    pub user_chat: IdRef,
    pub channel: IdRef,
    pub manager: Option<Manager>,
    pub snippet: SnippetRef,
    pub component_id: Option<String>,
    pub submit: Option<HashMap<String, String>>,
}

impl InteractionRequest {
    /// Submitted form value by field id.
    pub fn submitted(&self, field: &str) -> Option<&str> {
        self.submit
            .as_ref()
            .and_then(|s| s.get(field))
            .map(String::as_str)
    }
}

/// Text size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextSize {
    Small,
    Medium,
    Large,
}

/// Text styling; absent fields are left to the renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<TextSize>,
}

/// Button styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonStyle {
    Primary,
    Default,
    Danger,
}

/// One entry of a `select` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

/// A renderable UI unit. Order within a response is top-to-bottom layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Block {
    Text {
        value: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        style: Option<TextStyle>,
    },
    Label {
        title: String,
        value: String,
    },
    Divider,
    Button {
        id: String,
        label: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        style: Option<ButtonStyle>,
    },
    TextInput {
        id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        placeholder: Option<String>,
    },
    Select {
        id: String,
        options: Vec<SelectOption>,
    },
    Image {
        url: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        alt: Option<String>,
    },
}

impl Block {
    /// Unstyled text.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text {
            value: value.into(),
            style: None,
        }
    }

    /// Bold text, optionally sized.
    pub fn bold(value: impl Into<String>, size: Option<TextSize>) -> Self {
        Self::Text {
            value: value.into(),
            style: Some(TextStyle {
                bold: Some(true),
                size,
            }),
        }
    }

    /// Bold, large heading.
    pub fn heading(value: impl Into<String>) -> Self {
        Self::bold(value, Some(TextSize::Large))
    }

    pub fn label(title: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Label {
            title: title.into(),
            value: value.into(),
        }
    }

    pub fn button(id: impl Into<String>, label: impl Into<String>, style: ButtonStyle) -> Self {
        Self::Button {
            id: id.into(),
            label: label.into(),
            style: Some(style),
        }
    }

    pub fn text_input(id: impl Into<String>, placeholder: Option<&str>) -> Self {
        Self::TextInput {
            id: id.into(),
            placeholder: placeholder.map(str::to_string),
        }
    }

    /// Wire tag of this block.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::Label { .. } => "label",
            Self::Divider => "divider",
            Self::Button { .. } => "button",
            Self::TextInput { .. } => "textInput",
            Self::Select { .. } => "select",
            Self::Image { .. } => "image",
        }
    }
}

/// Snippet response: protocol version plus blocks in render order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InteractionResponse {
    pub version: &'static str,
    pub blocks: Vec<Block>,
}

impl InteractionResponse {
    /// Wrap blocks with the current protocol version.
    pub const fn new(blocks: Vec<Block>) -> Self {
        Self {
            version: PROTOCOL_VERSION,
            blocks,
        }
    }
}
