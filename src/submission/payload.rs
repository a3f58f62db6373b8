use reqwest::multipart::{Form, Part};

use crate::wizard::{ContractConfig, ContractContent, FileHandle};

pub const PRIMARY_COLOR_FIELD: &str = "primaryColor";
pub const LOGO_FIELD: &str = "logo";

/// One multipart field, independent of any HTTP client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue {
    Text(String),
    File(FileHandle),
}

/// The fields sent to the formatting service, in wire order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionPayload {
    fields: Vec<(&'static str, FormValue)>,
}

impl SubmissionPayload {
    /// Build the payload from a config snapshot. Returns None if there is no content.
    pub fn from_config(config: &ContractConfig) -> Option<Self> {
        let content = config.content.as_ref().filter(|c| c.is_present())?;

        let mut fields = Vec::with_capacity(3);
        let value = match content {
            ContractContent::Text(text) => FormValue::Text(text.clone()),
            ContractContent::File(file) => FormValue::File(file.clone()),
        };
        fields.push((content.form_field(), value));
        fields.push((
            PRIMARY_COLOR_FIELD,
            FormValue::Text(config.primary_color.to_string()),
        ));
        if let Some(logo) = &config.logo {
            fields.push((LOGO_FIELD, FormValue::File(logo.clone())));
        }

        Some(Self { fields })
    }

    pub fn fields(&self) -> &[(&'static str, FormValue)] {
        &self.fields
    }

    /// A fresh multipart form. Forms are consumed by the request, so every
    /// candidate attempt needs its own.
    pub fn to_form(&self) -> reqwest::Result<Form> {
        let mut form = Form::new();
        for (name, value) in &self.fields {
            form = match value {
                FormValue::Text(text) => form.text(*name, text.clone()),
                FormValue::File(file) => {
                    let part = Part::bytes(file.bytes.to_vec())
                        .file_name(file.name.clone())
                        .mime_str(file.mime)?;
                    form.part(*name, part)
                }
            };
        }
        Ok(form)
    }
}

#[cfg(test)]
impl SubmissionPayload {
    fn field(&self, name: &str) -> Option<&FormValue> {
        self.fields.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }
}
