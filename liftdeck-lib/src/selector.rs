//src/selector.rs
//! The template picker. It holds no state: it lists what can be picked and
//! relays the user's choice to the owner.
use anyhow::Result;

use crate::model::CustomWorkoutTemplate;
use crate::presets::PresetTemplate;

/// One row of the selector, in display order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectorEntry<'a> {
    Preset(PresetTemplate),
    Custom(&'a CustomWorkoutTemplate),
    CreateCustom,
}

impl SelectorEntry<'_> {
    pub fn label(&self) -> &str {
        match self {
            Self::Preset(preset) => preset.label(),
            Self::Custom(template) => template.name.as_str(),
            Self::CreateCustom => "+ Create custom workout",
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }
}

/// Presets, then the custom section (only if there are custom templates), then "create".
pub fn entries(custom_templates: &[CustomWorkoutTemplate]) -> Vec<SelectorEntry<'_>> {
    PresetTemplate::all()
        .map(SelectorEntry::Preset)
        .chain(custom_templates.iter().map(SelectorEntry::Custom))
        .chain(std::iter::once(SelectorEntry::CreateCustom))
        .collect()
}

/// Answer to the "Delete this workout?" prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

impl From<bool> for Confirmation {
    fn from(value: bool) -> Self {
        if value {
            Self::Confirmed
        } else {
            Self::Declined
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectorAction {
    SelectPreset(PresetTemplate),
    SelectCustom(CustomWorkoutTemplate),
    EditCustom(CustomWorkoutTemplate),
    DeleteCustom(CustomWorkoutTemplate, Confirmation),
    CreateCustom,
    Dismiss,
}

pub trait TemplateSelectorDelegate {
    /// `label` is a preset label or a custom template's name.
    fn on_select_template(&mut self, label: &str) -> Result<()>;
    fn on_create_custom(&mut self) -> Result<()>;
    fn on_edit_template(&mut self, template: &CustomWorkoutTemplate) -> Result<()>;
    fn on_delete_template(&mut self, id: i64) -> Result<()>;
    fn on_close(&mut self) -> Result<()>;
}

/// Forwards an action to the owner. A declined delete emits nothing.
///
/// # Errors
/// Whatever the delegate returns.
pub fn dispatch(action: SelectorAction, delegate: &mut dyn TemplateSelectorDelegate) -> Result<()> {
    match action {
        SelectorAction::SelectPreset(preset) => delegate.on_select_template(preset.label()),
        SelectorAction::SelectCustom(template) => delegate.on_select_template(&template.name),
        SelectorAction::EditCustom(template) => delegate.on_edit_template(&template),
        SelectorAction::DeleteCustom(template, Confirmation::Confirmed) => {
            delegate.on_delete_template(template.id)
        }
        SelectorAction::DeleteCustom(template, Confirmation::Declined) => {
            log::debug!("Delete of '{}' declined", template.name);
            Ok(())
        }
        SelectorAction::CreateCustom => delegate.on_create_custom(),
        SelectorAction::Dismiss => delegate.on_close(),
    }
}
