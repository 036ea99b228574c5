use iced::event::{self, Event};
use iced::font::{self, Font};
use iced::widget::{
    button, column, container, pick_list, row, scrollable, text, text_input, Column, Image,
};
use iced::{clipboard, window, Alignment, Element, Length, Subscription, Task, Theme};
use rfd::FileDialog;
use std::path::PathBuf;

mod config;
mod error;
mod page;
mod preview;
mod quiz;

use config::Settings;
use error::{AppError, BindingError, ConfigError, PreviewError};
use page::{FormField, Page};
use preview::{DropBatch, LoadedImage, ReadId};
use quiz::ResultBlock;

/// Main application state
struct DermaSoul {
    settings: Settings,
    /// Elements bound at startup
    page: Page,
    /// Id handed to the next file read
    next_read: ReadId,
    /// Files from a drop gesture still in progress
    dropped: DropBatch,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// User clicked the "Choose image" button
    ChooseImage,
    /// The file selection changed
    FilesSelected(Vec<PathBuf>),
    /// One file of a drop gesture landed on the window
    FileDropped(PathBuf),
    /// The drop gesture is over
    DropSettled,
    /// Background read finished
    ImageLoaded(ReadId, Result<LoadedImage, PreviewError>),
    SkinTypeChanged(String),
    AcneSeverityChanged(String),
    /// User clicked "Analyze"
    Analyze,
    ClearAnswers,
    /// Put the summary markup on the clipboard
    CopySummary,
}

impl DermaSoul {
    /// Create a new instance of the application, binding the page elements
    fn new(settings: Settings) -> Result<Self, BindingError> {
        let page = Page::bind(&settings.bindings, &settings.questions)?;

        log::info!(
            "Page bound: upload=#{}, preview=#{}, fields=#{}/#{}, result=#{}",
            page.image_upload.id(),
            page.image_preview.id(),
            page.skin_type.id(),
            page.acne_severity.id(),
            page.result.id()
        );

        Ok(DermaSoul {
            settings,
            page,
            next_read: ReadId::default(),
            dropped: DropBatch::default(),
        })
    }

    fn title(&self) -> String {
        self.settings.window_title.clone()
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::ChooseImage => {
                // Show the native file picker; cancelling is an empty selection
                let files = FileDialog::new()
                    .set_title("Select an image to preview")
                    .pick_files()
                    .unwrap_or_default();

                self.on_file_change(files)
            }
            Message::FilesSelected(files) => self.on_file_change(files),
            Message::FileDropped(path) => {
                if self.dropped.push(path) {
                    return Task::perform(preview::drop_settled(), |_| Message::DropSettled);
                }

                Task::none()
            }
            Message::DropSettled => {
                let files = self.dropped.take();
                self.on_file_change(files)
            }
            Message::ImageLoaded(id, Ok(loaded)) => {
                log::info!(
                    "Read {:?} finished: {} ({} bytes as {}, {} encoded)",
                    id,
                    loaded.path.display(),
                    loaded.size,
                    loaded.source.mime().unwrap_or("unknown"),
                    loaded.source.as_str().len()
                );

                if let Err(e) = self.page.image_preview.show(loaded.source) {
                    log::warn!("Read {:?} produced an unusable preview: {}", id, e);
                }

                Task::none()
            }
            Message::ImageLoaded(id, Err(e)) => {
                // Failed reads leave the preview as it was
                log::warn!("Read {:?} failed: {}", id, e);
                Task::none()
            }
            Message::SkinTypeChanged(value) => {
                self.page.skin_type.set_value(value);
                Task::none()
            }
            Message::AcneSeverityChanged(value) => {
                self.page.acne_severity.set_value(value);
                Task::none()
            }
            Message::Analyze => {
                quiz::analyze(
                    &self.page.skin_type,
                    &self.page.acne_severity,
                    &mut self.page.result,
                    self.settings.markup_policy,
                );
                Task::none()
            }
            Message::ClearAnswers => {
                self.page.skin_type.clear();
                self.page.acne_severity.clear();
                Task::none()
            }
            Message::CopySummary => match self.summary() {
                Some(markup) => clipboard::write(markup),
                None => Task::none(),
            },
        }
    }

    /// Markup of the latest summary, if Analyze has run
    fn summary(&self) -> Option<String> {
        self.page
            .result
            .block()
            .map(|_| self.page.result.content().to_owned())
    }

    /// Start reading the first selected file, if there is one
    fn on_file_change(&mut self, selection: Vec<PathBuf>) -> Task<Message> {
        let Some(path) = preview::first_selected(&selection) else {
            log::debug!("#{}: empty selection, nothing to preview", self.page.image_upload.id());
            return Task::none();
        };

        let id = self.next_read;
        self.next_read = id.next();
        self.page.image_upload.select(path);

        if selection.len() > 1 {
            log::debug!("Ignoring {} extra selected files", selection.len() - 1);
        }
        log::info!("Read {:?} started: {}", id, path.display());

        Task::perform(preview::read_data_url(path.to_path_buf()), move |result| {
            Message::ImageLoaded(id, result)
        })
    }

    /// Files dropped on the window count as a new selection, one per gesture
    fn subscription(&self) -> Subscription<Message> {
        event::listen_with(|event, _status, _window| match event {
            Event::Window(window::Event::FileDropped(path)) => Some(Message::FileDropped(path)),
            _ => None,
        })
    }

    /// Build the user interface
    fn view(&self) -> Element<'_, Message> {
        let page = &self.page;

        let mut content: Column<Message> = column![
            text(&self.settings.window_title).size(36),
            button("Choose image")
                .on_press(Message::ChooseImage)
                .padding(10),
        ]
        .spacing(20)
        .padding(40)
        .align_x(Alignment::Center);

        let preview = &page.image_preview;
        if let (true, Some(handle), Some(source)) =
            (preview.is_visible(), preview.handle(), preview.source())
        {
            content = content.push(
                column![
                    Image::new(handle.clone()).width(Length::Fixed(320.0)),
                    text(source.mime().unwrap_or("unknown type")).size(12),
                ]
                .spacing(4)
                .align_x(Alignment::Center),
            );
        }

        content = content
            .push(answer_field(&page.skin_type, Message::SkinTypeChanged))
            .push(answer_field(&page.acne_severity, Message::AcneSeverityChanged))
            .push(
                row![
                    button("Analyze").on_press(Message::Analyze).padding(10),
                    button("Clear answers")
                        .on_press(Message::ClearAnswers)
                        .padding(10),
                ]
                .spacing(10),
            );

        if let Some(block) = page.result.block() {
            content = content.push(result_view(block)).push(
                button("Copy summary")
                    .on_press(Message::CopySummary)
                    .padding(10),
            );
        }

        container(scrollable(content))
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        self.settings.theme.to_theme()
    }
}

/// Labelled input for one quiz answer: a pick list when the question has
/// options, free text otherwise
fn answer_field(field: &FormField, on_input: fn(String) -> Message) -> Element<'_, Message> {
    let input: Element<'_, Message> = if field.options().is_empty() {
        text_input(field.label(), field.value())
            .id(field.widget_id())
            .on_input(on_input)
            .padding(8)
            .into()
    } else {
        pick_list(field.options(), field.selected(), on_input)
            .placeholder(quiz::NOT_ANSWERED)
            .width(Length::Fill)
            .padding(8)
            .into()
    };

    column![text(field.label()).size(16), input]
        .spacing(6)
        .width(Length::Fixed(360.0))
        .into()
}

/// Summary lines drawn as a bold caption followed by the plain answer
fn result_view(block: &ResultBlock) -> Element<'_, Message> {
    let bold = Font {
        weight: font::Weight::Bold,
        ..Font::DEFAULT
    };

    Column::with_children(block.lines.iter().map(|line| {
        Element::from(row![text(line.caption).font(bold), text(&line.value)].spacing(6))
    }))
    .spacing(8)
    .into()
}

fn main() -> Result<(), AppError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings_path = Settings::default_path();
    log::info!("Starting DermaSoul (settings: {})", settings_path.display());

    let settings = Settings::load(&settings_path)
        .inspect_err(|e| log::error!("Cannot start: {}", e))?;

    let app = DermaSoul::new(settings)
        .map_err(ConfigError::from)
        .inspect_err(|e| log::error!("Cannot start: {}", e))?;

    iced::application(DermaSoul::title, DermaSoul::update, DermaSoul::view)
        .theme(DermaSoul::theme)
        .subscription(DermaSoul::subscription)
        .centered()
        .run_with(move || (app, Task::none()))?;

    Ok(())
}
