//! Form field models
//!
//! Fields are stateless with respect to their value: the caller owns it, feeds
//! it in, and receives `FieldEvent`s back. Only focus and password visibility
//! live inside a field.

use crate::shared::error::{AppError, AppResult};
use enum_dispatch::enum_dispatch;

pub mod field;
pub mod input;
pub mod select;

use field::{FieldEvent, FieldProps, FieldStatus, RenderedField, UserAction};
pub use input::{FormInput, InputType};
pub use select::{FormSelect, SelectOption};

#[enum_dispatch]
pub trait FormField {
    fn id(&self) -> &str;

    fn props(&self) -> &FieldProps;

    fn props_mut(&mut self) -> &mut FieldProps;

    fn status(&self) -> FieldStatus;

    fn render(&self) -> RenderedField;

    /// Apply one user action. Disabled fields always return no events.
    fn handle(&mut self, action: UserAction) -> Vec<FieldEvent>;

    fn validate(&self) -> AppResult<()>;
}

#[enum_dispatch(FormField)]
#[derive(Debug, Clone)]
pub enum Field {
    Input(FormInput),
    Select(FormSelect),
}

/// Contract every variant shares: a required field needs an error slot the
/// caller writes into, otherwise a missing value can never be reported.
pub(crate) fn check_common_contract(props: &FieldProps) -> AppResult<()> {
    if props.required && props.error.is_none() {
        return Err(AppError::FieldContract(
            "required field has no error-reporting path".to_string(),
        ));
    }
    Ok(())
}

/// Render a whole form, failing on the first field that breaks its contract.
pub fn render_all(fields: &[Field]) -> AppResult<Vec<RenderedField>> {
    fields
        .iter()
        .map(|f| {
            f.validate()?;
            Ok(f.render())
        })
        .collect()
}
