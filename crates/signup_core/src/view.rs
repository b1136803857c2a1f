//! Render model consumed by the view layer.

use serde::{Deserialize, Serialize};

use crate::controller::FormController;
use crate::fields::{FieldName, UiFlags};
use crate::state::SubmissionState;

/// Copy shown next to the agreement checkbox.
pub const AGREEMENT_TEXT: &str = "I agree to receive email notification(s). We will only send emails \
with important information, like project start dates. We will not sell your information!";

/// Label of the submit button.
pub const SUBMIT_LABEL: &str = "Sign up";

/// How an input should be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    Text,
    Password,
}

/// One rendered field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldView {
    pub name: FieldName,
    pub label: String,
    pub value: String,
    pub input_type: InputType,
    pub touched: bool,
    pub invalid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Everything the view needs to draw the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSnapshot {
    pub fields: Vec<FieldView>,
    pub flags: UiFlags,
    pub state: SubmissionState,
    pub can_submit: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    pub agreement_text: String,
    pub submit_label: String,
}

impl FormSnapshot {
    pub fn field(&self, name: FieldName) -> Option<&FieldView> {
        self.fields.iter().find(|field| field.name == name)
    }
}

impl FormController {
    /// Capture the current render model.
    pub fn snapshot(&self) -> FormSnapshot {
        let flags = self.flags();
        let fields = FieldName::ALL
            .into_iter()
            .map(|name| {
                let error = self.visible_error(name).map(str::to_string);
                FieldView {
                    name,
                    label: name.label().to_string(),
                    value: self.display_value(name),
                    input_type: if name.is_masked() && !flags.password_visible {
                        InputType::Password
                    } else {
                        InputType::Text
                    },
                    touched: self.is_touched(name),
                    invalid: error.is_some(),
                    error,
                }
            })
            .collect();

        FormSnapshot {
            fields,
            flags,
            state: self.state(),
            can_submit: self.can_submit(),
            notice: self.notice().map(str::to_string),
            agreement_text: AGREEMENT_TEXT.to_string(),
            submit_label: SUBMIT_LABEL.to_string(),
        }
    }
}
