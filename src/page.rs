/// Page elements
///
/// The page is built once at startup from validated bindings. Handlers
/// receive the elements they touch as arguments instead of looking them up.

use iced::widget::text_input;
use std::path::{Path, PathBuf};

use crate::config::{Bindings, Question, Questions};
use crate::error::BindingError;
use crate::preview::PreviewElement;
use crate::quiz::ResultBlock;

/// The file-selection control. Remembers the file last taken from a selection.
#[derive(Debug, Clone)]
pub struct FileInput {
    id: String,
    selected: Option<PathBuf>,
}

impl FileInput {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            selected: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn selected(&self) -> Option<&Path> {
        self.selected.as_deref()
    }

    pub fn select(&mut self, path: &Path) {
        self.selected = Some(path.to_path_buf());
    }
}

/// One quiz answer
///
/// With options the field is a pick list; without, free text. Either way
/// `None` means unanswered.
#[derive(Debug, Clone)]
pub struct FormField {
    id: String,
    label: String,
    options: Vec<String>,
    value: Option<String>,
}

impl FormField {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            options: Vec::new(),
            value: None,
        }
    }

    pub fn with_options(mut self, options: Vec<String>) -> Self {
        self.options = options;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Widget id for the iced text input
    pub fn widget_id(&self) -> text_input::Id {
        text_input::Id::new(self.id.clone())
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn selected(&self) -> Option<&String> {
        self.value.as_ref()
    }

    /// Current answer; empty when unanswered
    pub fn value(&self) -> &str {
        self.value.as_deref().unwrap_or_default()
    }

    /// An empty value clears the answer
    pub fn set_value(&mut self, value: impl Into<String>) {
        let value = value.into();
        self.value = if value.is_empty() { None } else { Some(value) };
    }

    pub fn clear(&mut self) {
        self.value = None;
    }
}

/// Holds the latest summary. Each write replaces the previous content.
#[derive(Debug, Clone)]
pub struct ResultContainer {
    id: String,
    block: Option<ResultBlock>,
    content: String,
}

impl ResultContainer {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            block: None,
            content: String::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Rendered markup of the latest summary
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn block(&self) -> Option<&ResultBlock> {
        self.block.as_ref()
    }

    pub fn replace(&mut self, block: ResultBlock, content: String) {
        self.block = Some(block);
        self.content = content;
    }
}

/// Every element the handlers are bound to
#[derive(Debug, Clone)]
pub struct Page {
    pub image_upload: FileInput,
    pub image_preview: PreviewElement,
    pub skin_type: FormField,
    pub acne_severity: FormField,
    pub result: ResultContainer,
}

impl Page {
    /// Build the page from `bindings`, failing if any element cannot be bound
    pub fn bind(bindings: &Bindings, questions: &Questions) -> Result<Self, BindingError> {
        bindings.validate()?;

        Ok(Self {
            image_upload: FileInput::new(&bindings.image_upload),
            image_preview: PreviewElement::new(&bindings.image_preview),
            skin_type: field(&bindings.skin_type, &questions.skin_type),
            acne_severity: field(&bindings.acne_severity, &questions.acne_severity),
            result: ResultContainer::new(&bindings.result),
        })
    }
}

fn field(id: &str, question: &Question) -> FormField {
    FormField::new(id, &question.label).with_options(question.options.clone())
}
