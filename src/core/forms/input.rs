use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::field::{
    aux_text, base_control_class, class_list, container_class, icon_view, label_view, resolve_id, Control,
    FieldEvent, FieldIcon, FieldProps, FieldStatus, FieldUiState, IconSlot, RenderedField, UserAction,
};
use super::{check_common_contract, FormField};
use crate::shared::error::AppResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings.ts")]
pub enum InputType {
    #[default]
    Text,
    Number,
    Email,
    Password,
    Search,
    Date,
    Tel,
    Url,
}

impl InputType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputType::Text => "text",
            InputType::Number => "number",
            InputType::Email => "email",
            InputType::Password => "password",
            InputType::Search => "search",
            InputType::Date => "date",
            InputType::Tel => "tel",
            InputType::Url => "url",
        }
    }
}

/// Single-value field. The value is owned by the caller and replaced through
/// `set_value`; user typing only produces `FieldEvent::Change`.
#[derive(Debug, Clone)]
pub struct FormInput {
    props: FieldProps,
    id: String,
    input_type: InputType,
    value: String,
    placeholder: Option<String>,
    right_icon: Option<IconSlot>,
    ui: FieldUiState,
}

impl FormInput {
    pub fn new(props: FieldProps) -> Self {
        let id = resolve_id(&props, "input");
        Self {
            props,
            id,
            input_type: InputType::Text,
            value: String::new(),
            placeholder: None,
            right_icon: None,
            ui: FieldUiState::default(),
        }
    }

    pub fn with_type(mut self, input_type: InputType) -> Self {
        self.input_type = input_type;
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_right_icon(mut self, slot: IconSlot) -> Self {
        self.right_icon = Some(slot);
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    pub fn input_type(&self) -> InputType {
        self.input_type
    }

    pub fn secret_visible(&self) -> bool {
        self.ui.secret_visible
    }

    fn is_password(&self) -> bool {
        self.input_type == InputType::Password
    }

    /// Type attribute as rendered; a revealed password shows as plain text
    fn rendered_type(&self) -> &'static str {
        if self.is_password() && self.ui.secret_visible {
            InputType::Text.as_str()
        } else {
            self.input_type.as_str()
        }
    }

    fn rendered_right_icon(&self) -> Option<IconSlot> {
        let mut slot = self.right_icon?;
        if self.is_password() && matches!(slot.icon, FieldIcon::Eye | FieldIcon::EyeOff) {
            slot.icon = if self.ui.secret_visible { FieldIcon::EyeOff } else { FieldIcon::Eye };
        }
        Some(slot)
    }
}

impl FormField for FormInput {
    fn id(&self) -> &str {
        &self.id
    }

    fn props(&self) -> &FieldProps {
        &self.props
    }

    fn props_mut(&mut self) -> &mut FieldProps {
        &mut self.props
    }

    fn status(&self) -> FieldStatus {
        FieldStatus::of(&self.props, &self.ui)
    }

    fn render(&self) -> RenderedField {
        let props = &self.props;
        let status = self.status();
        let aux = aux_text(&self.id, props);
        let right_icon = self.rendered_right_icon();

        let mut classes = base_control_class(props);
        classes.push("placeholder:text-gray-400 dark:placeholder:text-gray-500");
        let control_class = class_list(
            classes
                .into_iter()
                .map(Some)
                .chain([props.left_icon.map(|_| "pl-10"), right_icon.map(|_| "pr-10")]),
        );

        let numeric = self.input_type == InputType::Number;
        RenderedField {
            id: self.id.clone(),
            container_class: container_class(props),
            label: label_view(&self.id, props),
            left_icon: props.left_icon.as_ref().map(|slot| icon_view(slot, props.size)),
            right_icon: right_icon.as_ref().map(|slot| icon_view(slot, props.size)),
            control: Control::Input {
                input_type: self.rendered_type().to_string(),
                value: self.value.clone(),
                placeholder: self.placeholder.clone(),
                input_mode: numeric.then(|| "numeric".to_string()),
                pattern: numeric.then(|| "[0-9]*".to_string()),
            },
            control_class,
            disabled: props.disabled,
            required: props.required,
            aria_invalid: status.has_error,
            aria_describedby: aux.as_ref().map(|a| a.id().to_string()),
            aux,
            state: status.primary(),
        }
    }

    fn handle(&mut self, action: UserAction) -> Vec<FieldEvent> {
        if self.props.disabled {
            return Vec::new();
        }

        match action {
            UserAction::Input(text) if text != self.value => vec![FieldEvent::Change(text)],
            UserAction::Input(_) | UserAction::Select(_) => Vec::new(),
            UserAction::Focus => {
                self.ui.focused = true;
                Vec::new()
            }
            UserAction::Blur => {
                self.ui.focused = false;
                Vec::new()
            }
            UserAction::ClickLeftIcon => match self.props.left_icon {
                Some(slot) if slot.clickable => vec![FieldEvent::LeftIconClick],
                _ => Vec::new(),
            },
            UserAction::ClickRightIcon => match self.right_icon {
                Some(slot) if slot.clickable => {
                    if self.is_password() {
                        self.ui.secret_visible = !self.ui.secret_visible;
                    }
                    vec![FieldEvent::RightIconClick]
                }
                _ => Vec::new(),
            },
        }
    }

    fn validate(&self) -> AppResult<()> {
        check_common_contract(&self.props)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::forms::field::{AuxText, FieldState};

    fn amount_field() -> FormInput {
        FormInput::new(FieldProps {
            id: Some("amount".into()),
            ..FieldProps::labeled("Amount")
        })
        .with_type(InputType::Number)
        .with_value("10")
    }

    #[test]
    fn test_typing_emits_change_without_mutating() {
        let mut field = amount_field();
        assert_eq!(field.handle(UserAction::Input("12".into())), vec![FieldEvent::Change("12".into())]);
        assert_eq!(field.value(), "10");

        field.set_value("12");
        assert_eq!(field.value(), "12");
        assert!(field.handle(UserAction::Input("12".into())).is_empty());
    }

    #[test]
    fn test_disabled_field_is_silent() {
        let mut field = FormInput::new(FieldProps {
            disabled: true,
            left_icon: Some(IconSlot::clickable(FieldIcon::Search)),
            ..FieldProps::labeled("Query")
        })
        .with_type(InputType::Password)
        .with_right_icon(IconSlot::clickable(FieldIcon::Eye));

        for action in [
            UserAction::Input("x".into()),
            UserAction::Focus,
            UserAction::ClickLeftIcon,
            UserAction::ClickRightIcon,
        ] {
            assert!(field.handle(action).is_empty());
        }
        assert!(!field.secret_visible());
        assert_eq!(field.render().state, FieldState::Disabled);
    }

    #[test]
    fn test_error_precedence_and_aria() {
        let mut field = amount_field();
        field.props_mut().helper_text = Some("Whole numbers only".into());
        field.props_mut().error = Some("Enter a valid number".into());

        let view = field.render();
        assert!(view.aria_invalid);
        assert_eq!(view.aria_describedby.as_deref(), Some("amount-error"));
        assert!(matches!(view.aux, Some(AuxText::Error { ref text, .. }) if text == "Enter a valid number"));
        assert!(view.control_class.contains("border-red-500"));
    }

    #[test]
    fn test_helper_only() {
        let mut field = amount_field();
        field.props_mut().helper_text = Some("Whole numbers only".into());
        let view = field.render();
        assert!(!view.aria_invalid);
        assert_eq!(view.aria_describedby.as_deref(), Some("amount-helper"));
    }

    #[test]
    fn test_number_input_hints() {
        match amount_field().render().control {
            Control::Input { input_type, input_mode, pattern, .. } => {
                assert_eq!(input_type, "number");
                assert_eq!(input_mode.as_deref(), Some("numeric"));
                assert_eq!(pattern.as_deref(), Some("[0-9]*"));
            }
            other => panic!("unexpected control {:?}", other),
        }
    }

    #[test]
    fn test_password_toggle() {
        let mut field = FormInput::new(FieldProps::labeled("Password"))
            .with_type(InputType::Password)
            .with_right_icon(IconSlot::clickable(FieldIcon::Eye));

        assert_eq!(field.handle(UserAction::ClickRightIcon), vec![FieldEvent::RightIconClick]);
        assert!(field.secret_visible());
        let view = field.render();
        assert!(matches!(view.control, Control::Input { ref input_type, .. } if input_type == "text"));
        assert_eq!(view.right_icon.unwrap().icon, FieldIcon::EyeOff);

        field.handle(UserAction::ClickRightIcon);
        assert!(!field.secret_visible());
    }

    #[test]
    fn test_decorative_icons_do_not_click() {
        let mut field = FormInput::new(FieldProps {
            left_icon: Some(IconSlot::decorative(FieldIcon::Search)),
            ..FieldProps::default()
        });
        assert!(field.handle(UserAction::ClickLeftIcon).is_empty());
        assert!(field.handle(UserAction::ClickRightIcon).is_empty());
        assert!(field.render().control_class.contains("pl-10"));
    }

    #[test]
    fn test_focus_tracks_state() {
        let mut field = amount_field();
        field.handle(UserAction::Focus);
        assert_eq!(field.render().state, FieldState::Focused);
        field.handle(UserAction::Blur);
        assert_eq!(field.render().state, FieldState::Pristine);
    }

    #[test]
    fn test_auto_id_is_stable() {
        let field = FormInput::new(FieldProps::labeled("Name"));
        assert!(field.id().starts_with("input-"));
        assert_eq!(field.render().id, field.render().id);
        assert_eq!(field.render().label.unwrap().html_for, field.id());
    }
}
