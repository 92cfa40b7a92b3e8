use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use ts_rs::TS;

use super::field::{
    aux_text, base_control_class, class_list, container_class, icon_view, label_view, resolve_id, Control,
    FieldEvent, FieldIcon, FieldProps, FieldStatus, FieldUiState, IconSlot, RenderedField, RenderedOption,
    UserAction,
};
use super::{check_common_contract, FormField};
use crate::shared::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings.ts")]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    #[serde(default)]
    pub disabled: bool,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            disabled: false,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }
}

/// Enumerated-choice field. Options render in the order given; the optional
/// placeholder comes first with the empty value and can never be chosen.
#[derive(Debug, Clone)]
pub struct FormSelect {
    props: FieldProps,
    id: String,
    options: Vec<SelectOption>,
    placeholder: Option<String>,
    value: String,
    ui: FieldUiState,
}

impl FormSelect {
    pub fn new(props: FieldProps, options: Vec<SelectOption>) -> AppResult<Self> {
        check_unique_values(&options)?;
        let id = resolve_id(&props, "select");
        Ok(Self {
            props,
            id,
            options,
            placeholder: None,
            value: String::new(),
            ui: FieldUiState::default(),
        })
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> AppResult<Self> {
        if self.options.iter().any(|o| o.value.is_empty()) {
            return Err(AppError::FieldContract(
                "an option uses the empty value reserved for the placeholder".to_string(),
            ));
        }
        self.placeholder = Some(placeholder.into());
        Ok(self)
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

    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    /// Whether choosing `value` would be accepted. The placeholder never is.
    pub fn is_selectable(&self, value: &str) -> bool {
        !value.is_empty() && self.options.iter().any(|o| o.value == value && !o.disabled)
    }

    fn rendered_options(&self) -> Vec<RenderedOption> {
        let placeholder = self.placeholder.as_ref().map(|text| RenderedOption {
            value: String::new(),
            label: text.clone(),
            disabled: true,
            selected: self.value.is_empty(),
            placeholder: true,
        });

        placeholder
            .into_iter()
            .chain(self.options.iter().map(|o| RenderedOption {
                value: o.value.clone(),
                label: o.label.clone(),
                disabled: o.disabled,
                selected: o.value == self.value,
                placeholder: false,
            }))
            .collect()
    }
}

fn check_unique_values(options: &[SelectOption]) -> AppResult<()> {
    let mut seen = HashSet::with_capacity(options.len());
    for option in options {
        if !seen.insert(option.value.as_str()) {
            return Err(AppError::FieldContract(format!(
                "option value '{}' appears more than once",
                option.value
            )));
        }
    }
    Ok(())
}

impl FormField for FormSelect {
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

        let mut classes = base_control_class(props);
        classes.push("appearance-none");
        let control_class = class_list(
            classes
                .into_iter()
                .map(Some)
                .chain([props.left_icon.map(|_| "pl-10"), Some("pr-10")]),
        );

        RenderedField {
            id: self.id.clone(),
            container_class: container_class(props),
            label: label_view(&self.id, props),
            left_icon: props.left_icon.as_ref().map(|slot| icon_view(slot, props.size)),
            right_icon: Some(icon_view(&IconSlot::decorative(FieldIcon::ChevronDown), props.size)),
            control: Control::Select {
                options: self.rendered_options(),
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
            UserAction::Select(value) => {
                if value == self.value {
                    Vec::new()
                } else if self.is_selectable(&value) {
                    vec![FieldEvent::Change(value)]
                } else {
                    tracing::debug!(field = %self.id, %value, "ignoring selection of unavailable option");
                    Vec::new()
                }
            }
            UserAction::Input(_) | UserAction::ClickRightIcon => Vec::new(),
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
        }
    }

    fn validate(&self) -> AppResult<()> {
        check_unique_values(&self.options)?;
        check_common_contract(&self.props)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letters() -> FormSelect {
        FormSelect::new(
            FieldProps {
                id: Some("letter".into()),
                ..FieldProps::labeled("Letter")
            },
            vec![SelectOption::new("a", "A"), SelectOption::new("b", "B").disabled()],
        )
        .unwrap()
        .with_placeholder("Pick one")
        .unwrap()
    }

    fn options_of(field: &FormSelect) -> Vec<RenderedOption> {
        match field.render().control {
            Control::Select { options } => options,
            other => panic!("unexpected control {:?}", other),
        }
    }

    #[test]
    fn test_placeholder_and_options_render_in_order() {
        let field = letters();
        let options = options_of(&field);
        assert_eq!(options.len(), 3);
        assert!(options[0].placeholder && options[0].selected && options[0].disabled);
        assert_eq!(options[1].value, "a");
        assert!(options[2].disabled);

        let selectable: Vec<&str> = options
            .iter()
            .filter(|o| field.is_selectable(&o.value))
            .map(|o| o.label.as_str())
            .collect();
        assert_eq!(selectable, vec!["A"]);
    }

    #[test]
    fn test_disabled_and_unknown_options_are_suppressed() {
        let mut field = letters();
        assert!(field.handle(UserAction::Select("b".into())).is_empty());
        assert!(field.handle(UserAction::Select("zzz".into())).is_empty());
        assert_eq!(field.handle(UserAction::Select("a".into())), vec![FieldEvent::Change("a".into())]);
    }

    #[test]
    fn test_placeholder_cannot_be_chosen() {
        let mut field = letters().with_value("a");
        assert!(!field.is_selectable(""));
        assert!(field.handle(UserAction::Select(String::new())).is_empty());
        assert_eq!(field.value(), "a");

        let options = options_of(&field);
        assert!(options[0].placeholder && options[0].disabled && !options[0].selected);
        assert!(options[1].selected);
    }

    #[test]
    fn test_duplicate_values_rejected() {
        let err = FormSelect::new(
            FieldProps::default(),
            vec![SelectOption::new("m", "Meters"), SelectOption::new("m", "Metres")],
        )
        .unwrap_err();
        assert!(matches!(err, AppError::FieldContract(_)));
    }

    #[test]
    fn test_empty_option_value_conflicts_with_placeholder() {
        let err = FormSelect::new(FieldProps::default(), vec![SelectOption::new("", "None")])
            .unwrap()
            .with_placeholder("Choose")
            .unwrap_err();
        assert!(matches!(err, AppError::FieldContract(_)));
    }

    #[test]
    fn test_disabled_select_is_silent() {
        let mut field = letters();
        field.props_mut().disabled = true;
        assert!(field.handle(UserAction::Select("a".into())).is_empty());
        assert!(field.handle(UserAction::ClickLeftIcon).is_empty());
    }

    #[test]
    fn test_chevron_and_error_row() {
        let mut field = letters();
        field.props_mut().error = Some("Required".into());
        field.props_mut().helper_text = Some("Any letter".into());
        let view = field.render();
        assert_eq!(view.right_icon.unwrap().icon, FieldIcon::ChevronDown);
        assert_eq!(view.aria_describedby.as_deref(), Some("letter-error"));
        assert!(view.control_class.contains("pr-10"));
    }

    #[test]
    fn test_auto_id_prefix() {
        let field = FormSelect::new(FieldProps::default(), vec![]).unwrap();
        assert!(field.id().starts_with("select-"));
    }
}
