//! Building blocks shared by every form field variant: presentation presets,
//! props, transient UI state, user actions, emitted events and render output.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings.ts")]
pub enum FieldSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl FieldSize {
    pub fn class(&self) -> &'static str {
        match self {
            FieldSize::Small => "px-3 py-1.5 text-sm",
            FieldSize::Medium => "px-4 py-2 text-base",
            FieldSize::Large => "px-4 py-3 text-lg",
        }
    }

    fn icon_class(&self) -> &'static str {
        match self {
            FieldSize::Small => "h-3.5 w-3.5",
            FieldSize::Medium => "h-4 w-4",
            FieldSize::Large => "h-5 w-5",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings.ts")]
pub enum FieldVariant {
    #[default]
    Default,
    Filled,
    Outlined,
}

impl FieldVariant {
    pub fn class(&self) -> &'static str {
        match self {
            FieldVariant::Default => "border-gray-300 dark:border-gray-600 bg-white dark:bg-gray-800",
            FieldVariant::Filled => "border-transparent bg-gray-50 dark:bg-gray-700",
            FieldVariant::Outlined => "border-2 border-gray-300 dark:border-gray-600 bg-transparent",
        }
    }
}

/// Decorations a field can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings.ts")]
pub enum FieldIcon {
    Search,
    Mail,
    Lock,
    Eye,
    EyeOff,
    User,
    Calendar,
    Ruler,
    DollarSign,
    Globe,
    Type,
    ChevronDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings.ts")]
pub struct IconSlot {
    pub icon: FieldIcon,
    /// Clicks are reported as their own event, separate from value changes
    pub clickable: bool,
}

impl IconSlot {
    pub fn decorative(icon: FieldIcon) -> Self {
        Self { icon, clickable: false }
    }

    pub fn clickable(icon: FieldIcon) -> Self {
        Self { icon, clickable: true }
    }
}

/// Caller-owned configuration common to all variants.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings.ts")]
pub struct FieldProps {
    pub label: Option<String>,
    /// `None` means the caller never reports errors for this field; `Some("")` is wired but clean.
    pub error: Option<String>,
    pub helper_text: Option<String>,
    pub left_icon: Option<IconSlot>,
    pub size: FieldSize,
    pub variant: FieldVariant,
    pub full_width: bool,
    pub disabled: bool,
    pub required: bool,
    pub id: Option<String>,
}

impl FieldProps {
    pub fn labeled(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::default()
        }
    }

    fn error_text(&self) -> Option<&str> {
        self.error.as_deref().filter(|e| !e.is_empty())
    }

    fn helper(&self) -> Option<&str> {
        self.helper_text.as_deref().filter(|h| !h.is_empty())
    }
}

/// Transient state a field keeps for itself; never the value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldUiState {
    pub focused: bool,
    pub secret_visible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings.ts")]
pub enum FieldState {
    Pristine,
    Focused,
    Error,
    Disabled,
}

/// Derived from props plus UI state. Error and disabled may hold together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "bindings.ts")]
pub struct FieldStatus {
    pub disabled: bool,
    pub has_error: bool,
    pub focused: bool,
}

impl FieldStatus {
    pub fn of(props: &FieldProps, ui: &FieldUiState) -> Self {
        Self {
            disabled: props.disabled,
            has_error: props.error_text().is_some(),
            focused: ui.focused && !props.disabled,
        }
    }

    /// Dominant state for styling: disabled, then error, then focus
    pub fn primary(&self) -> FieldState {
        if self.disabled {
            FieldState::Disabled
        } else if self.has_error {
            FieldState::Error
        } else if self.focused {
            FieldState::Focused
        } else {
            FieldState::Pristine
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    Input(String),
    Select(String),
    Focus,
    Blur,
    ClickLeftIcon,
    ClickRightIcon,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(tag = "type", content = "value")]
#[ts(export, export_to = "bindings.ts")]
pub enum FieldEvent {
    Change(String),
    LeftIconClick,
    RightIconClick,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "bindings.ts")]
pub struct LabelView {
    pub text: String,
    pub html_for: String,
    pub required_marker: bool,
    pub class: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "bindings.ts")]
pub struct IconView {
    pub icon: FieldIcon,
    pub clickable: bool,
    pub class: String,
}

/// The single auxiliary row under a field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(tag = "kind")]
#[ts(export, export_to = "bindings.ts")]
pub enum AuxText {
    Error { id: String, text: String },
    Helper { id: String, text: String },
}

impl AuxText {
    pub fn id(&self) -> &str {
        match self {
            AuxText::Error { id, .. } | AuxText::Helper { id, .. } => id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "bindings.ts")]
pub struct RenderedOption {
    pub value: String,
    pub label: String,
    pub disabled: bool,
    pub selected: bool,
    pub placeholder: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(tag = "kind")]
#[ts(export, export_to = "bindings.ts")]
pub enum Control {
    Input {
        input_type: String,
        value: String,
        placeholder: Option<String>,
        input_mode: Option<String>,
        pattern: Option<String>,
    },
    Select {
        options: Vec<RenderedOption>,
    },
}

/// Everything a view layer needs to draw one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "bindings.ts")]
pub struct RenderedField {
    pub id: String,
    pub container_class: String,
    pub label: Option<LabelView>,
    pub left_icon: Option<IconView>,
    pub right_icon: Option<IconView>,
    pub control: Control,
    pub control_class: String,
    pub disabled: bool,
    pub required: bool,
    pub aria_invalid: bool,
    pub aria_describedby: Option<String>,
    pub aux: Option<AuxText>,
    pub state: FieldState,
}

// ============================================================================
// Render helpers used by the variants
// ============================================================================

pub(crate) fn class_list<'a>(parts: impl IntoIterator<Item = Option<&'a str>>) -> String {
    parts.into_iter().flatten().collect::<Vec<_>>().join(" ")
}

pub(crate) fn auto_id(prefix: &str) -> String {
    let raw = uuid::Uuid::new_v4().simple().to_string();
    format!("{}-{}", prefix, &raw[..9])
}

pub(crate) fn resolve_id(props: &FieldProps, prefix: &str) -> String {
    props
        .id
        .clone()
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| auto_id(prefix))
}

/// Error wins over helper text; neither yields no row.
pub(crate) fn aux_text(id: &str, props: &FieldProps) -> Option<AuxText> {
    if let Some(error) = props.error_text() {
        return Some(AuxText::Error {
            id: format!("{}-error", id),
            text: error.to_string(),
        });
    }
    props.helper().map(|helper| AuxText::Helper {
        id: format!("{}-helper", id),
        text: helper.to_string(),
    })
}

pub(crate) fn label_view(id: &str, props: &FieldProps) -> Option<LabelView> {
    let text = props.label.as_deref().filter(|l| !l.is_empty())?;
    Some(LabelView {
        text: text.to_string(),
        html_for: id.to_string(),
        required_marker: props.required,
        class: class_list([
            Some("text-sm font-medium text-gray-700 dark:text-gray-300"),
            props.required.then_some(r#"after:content-["*"] after:ml-1 after:text-red-500"#),
        ]),
    })
}

pub(crate) fn icon_view(slot: &IconSlot, size: FieldSize) -> IconView {
    IconView {
        icon: slot.icon,
        clickable: slot.clickable,
        class: class_list([
            Some("text-gray-400"),
            Some(size.icon_class()),
            slot.clickable.then_some("cursor-pointer hover:text-gray-600"),
        ]),
    }
}

pub(crate) fn container_class(props: &FieldProps) -> String {
    class_list([Some("flex flex-col space-y-1"), props.full_width.then_some("w-full")])
}

pub(crate) fn base_control_class(props: &FieldProps) -> Vec<&'static str> {
    let mut classes = vec![
        "w-full rounded-lg transition-all duration-200",
        "focus:outline-none focus:ring-0",
        "disabled:opacity-50 disabled:cursor-not-allowed",
        "text-gray-900 dark:text-white",
        props.size.class(),
        props.variant.class(),
    ];
    if props.error_text().is_some() {
        classes.push("border-red-500 focus:ring-red-500");
    }
    classes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_precedence() {
        let ui = FieldUiState { focused: true, secret_visible: false };
        let mut props = FieldProps::labeled("Amount");
        assert_eq!(FieldStatus::of(&props, &ui).primary(), FieldState::Focused);

        props.error = Some("Required".into());
        assert_eq!(FieldStatus::of(&props, &ui).primary(), FieldState::Error);

        props.disabled = true;
        let status = FieldStatus::of(&props, &ui);
        assert_eq!(status.primary(), FieldState::Disabled);
        assert!(status.has_error, "a disabled field keeps its stale error");
        assert!(!status.focused);

        assert_eq!(
            FieldStatus::of(&FieldProps::default(), &FieldUiState::default()).primary(),
            FieldState::Pristine
        );
    }

    #[test]
    fn test_error_beats_helper() {
        let props = FieldProps {
            error: Some("Too large".into()),
            helper_text: Some("Max 100".into()),
            ..FieldProps::default()
        };
        assert_eq!(
            aux_text("qty", &props),
            Some(AuxText::Error { id: "qty-error".into(), text: "Too large".into() })
        );
    }

    #[test]
    fn test_helper_and_empty_strings() {
        let props = FieldProps {
            error: Some(String::new()),
            helper_text: Some("In meters".into()),
            ..FieldProps::default()
        };
        assert_eq!(aux_text("len", &props).unwrap().id(), "len-helper");
        assert_eq!(aux_text("len", &FieldProps::default()), None);
    }

    #[test]
    fn test_auto_id_shape() {
        let id = auto_id("input");
        assert!(id.starts_with("input-"));
        assert_eq!(id.len(), "input-".len() + 9);
        assert_ne!(id, auto_id("input"));
    }

    #[test]
    fn test_required_marker_on_label() {
        let props = FieldProps {
            required: true,
            ..FieldProps::labeled("Email")
        };
        let label = label_view("email", &props).unwrap();
        assert!(label.required_marker);
        assert!(label.class.contains("after:text-red-500"));
        assert_eq!(label.html_for, "email");
    }

    #[test]
    fn test_size_changes_only_classes() {
        let small = icon_view(&IconSlot::clickable(FieldIcon::Eye), FieldSize::Small);
        let large = icon_view(&IconSlot::clickable(FieldIcon::Eye), FieldSize::Large);
        assert_eq!(small.clickable, large.clickable);
        assert_ne!(small.class, large.class);
    }
}
