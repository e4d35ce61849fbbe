use crate::template::EventTemplate;
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone)]
pub struct TemplateValidationError {
    message: String,
}

impl TemplateValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for TemplateValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for TemplateValidationError {}

pub fn validate_template(template: &EventTemplate) -> Result<(), TemplateValidationError> {
    if template.duration_minutes == 0 {
        return Err(TemplateValidationError::new(format!(
            "template {} has zero duration",
            template.id
        )));
    }
    if template.team_size == 0 {
        return Err(TemplateValidationError::new(format!(
            "template {} has zero team size",
            template.id
        )));
    }
    if let Err(err) = template.recurrence.validate() {
        return Err(TemplateValidationError::new(format!(
            "template {} has an invalid recurrence: {err}",
            template.id
        )));
    }
    Ok(())
}

pub fn validate_template_collection(
    templates: &[EventTemplate],
) -> Result<(), TemplateValidationError> {
    let mut seen_ids = HashSet::with_capacity(templates.len());
    for template in templates {
        if !seen_ids.insert(template.id) {
            return Err(TemplateValidationError::new(format!(
                "duplicate template id {}",
                template.id
            )));
        }
        validate_template(template)?;
    }
    Ok(())
}
