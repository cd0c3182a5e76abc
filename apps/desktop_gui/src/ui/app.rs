use eframe::egui;

use crate::controller::{BookController, Dialog, Page, UiEvent};

use super::{
    theme::{visuals_for_palette, Palette},
    widgets::{form_text_field, page_heading, primary_button, row_button, submitted_with_enter},
};

pub const BANNER: &str = "Library Management System";
pub const NO_BOOKS_MESSAGE: &str = "No books found. Click the button below to add a new book.";
const COLUMN_HEADERS: [&str; 6] = ["ISBN", "Title", "Author", "Year", "Price", "Actions"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormMode {
    Add,
    Edit,
}

pub struct BookshelfApp {
    controller: BookController,
    palette: Palette,
    theme_applied: bool,
}

impl BookshelfApp {
    pub fn new(controller: BookController) -> Self {
        Self {
            controller,
            palette: Palette::macchiato(),
            theme_applied: false,
        }
    }

    fn apply_theme_if_needed(&mut self, ctx: &egui::Context) {
        if self.theme_applied {
            return;
        }
        ctx.set_visuals(visuals_for_palette(self.palette));
        ctx.style_mut(|style| {
            style.spacing.item_spacing = egui::vec2(10.0, 10.0);
            style.spacing.button_padding = egui::vec2(16.0, 8.0);
        });
        self.theme_applied = true;
    }

    fn show_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.small(egui::RichText::new(self.controller.state().status()).weak());
            });
        });
    }

    fn show_landing_page(&self, ui: &mut egui::Ui) -> Option<UiEvent> {
        let mut action = None;
        let top_space = (ui.available_height() * 0.3).clamp(24.0, 220.0);
        ui.add_space(top_space);
        page_heading(ui, self.palette, BANNER, 32.0);
        ui.add_space(24.0);
        if primary_button(ui, self.palette, "Start").clicked() {
            action = Some(UiEvent::Start);
        }
        action
    }

    fn show_list_page(&self, ui: &mut egui::Ui) -> Option<UiEvent> {
        let mut action = None;
        let books = self.controller.state().books();

        if books.is_empty() {
            ui.add_space((ui.available_height() * 0.35).clamp(24.0, 200.0));
            page_heading(ui, self.palette, NO_BOOKS_MESSAGE, 24.0);
            ui.add_space(24.0);
        } else {
            let table_height = (ui.available_height() - 56.0).max(80.0);
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .max_height(table_height)
                .show(ui, |ui| {
                    egui::Grid::new("books_table")
                        .num_columns(COLUMN_HEADERS.len())
                        .striped(true)
                        .min_row_height(40.0)
                        .spacing([24.0, 8.0])
                        .show(ui, |ui| {
                            for header in COLUMN_HEADERS {
                                ui.strong(header);
                            }
                            ui.end_row();

                            for book in books {
                                ui.label(book.isbn.as_str());
                                ui.label(book.title.as_str());
                                ui.label(book.author.as_str());
                                ui.label(book.year_published.to_string());
                                ui.label(book.price.to_string());
                                ui.horizontal(|ui| {
                                    if row_button(ui, self.palette, "Edit").clicked() {
                                        action = Some(UiEvent::OpenEdit(book.isbn.clone()));
                                    }
                                    if row_button(ui, self.palette, "Delete").clicked() {
                                        action = Some(UiEvent::RequestDelete(book.isbn.clone()));
                                    }
                                });
                                ui.end_row();
                            }
                        });
                });
        }

        ui.add_space(8.0);
        if primary_button(ui, self.palette, "Add New Book").clicked() {
            action = Some(UiEvent::OpenAdd);
        }
        action
    }

    fn show_form_page(&mut self, ui: &mut egui::Ui, mode: FormMode) -> Option<UiEvent> {
        let mut action = None;
        let palette = self.palette;
        let (heading, submit) = match mode {
            FormMode::Add => ("Add New Book", UiEvent::SubmitAdd),
            FormMode::Edit => ("Edit Book", UiEvent::SubmitEdit),
        };

        ui.add_space(12.0);
        page_heading(ui, palette, heading, 24.0);
        ui.add_space(12.0);

        let form = self.controller.state_mut().form_mut();
        let mut entered = false;
        let isbn = form_text_field(
            ui,
            "book_isbn",
            "ISBN",
            &mut form.isbn,
            mode == FormMode::Edit,
        );
        entered |= submitted_with_enter(ui, &isbn);
        let title = form_text_field(ui, "book_title", "Title", &mut form.title, false);
        entered |= submitted_with_enter(ui, &title);
        let author = form_text_field(ui, "book_author", "Author", &mut form.author, false);
        entered |= submitted_with_enter(ui, &author);
        ui.columns(2, |columns| {
            let year = form_text_field(
                &mut columns[0],
                "book_year",
                "Year Published",
                &mut form.year,
                false,
            );
            entered |= submitted_with_enter(&columns[0], &year);
            let price =
                form_text_field(&mut columns[1], "book_price", "Price", &mut form.price, false);
            entered |= submitted_with_enter(&columns[1], &price);
        });

        ui.add_space(8.0);
        ui.columns(2, |columns| {
            if primary_button(&mut columns[0], palette, "Back").clicked() {
                action = Some(UiEvent::Back);
            }
            if primary_button(&mut columns[1], palette, "Submit").clicked() {
                action = Some(submit.clone());
            }
        });

        if entered && action.is_none() {
            action = Some(submit);
        }
        action
    }

    fn show_dialog(&self, ctx: &egui::Context) -> Option<UiEvent> {
        let dialog = self.controller.state().dialog()?;
        let mut action = None;

        let title_color = if dialog.is_error() {
            self.palette.danger
        } else {
            self.palette.accent
        };
        let window_frame = egui::Frame::NONE
            .fill(self.palette.surface)
            .stroke(egui::Stroke::new(1.0, title_color))
            .corner_radius(8.0)
            .inner_margin(egui::Margin::symmetric(16, 12));

        egui::Window::new(dialog.title())
            .id(egui::Id::new("bookshelf_dialog"))
            .title_bar(false)
            .frame(window_frame)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(
                    egui::RichText::new(dialog.title())
                        .strong()
                        .size(16.0)
                        .color(title_color),
                );
                ui.separator();
                ui.label(dialog.message());
                ui.add_space(8.0);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    match dialog {
                        Dialog::ConfirmDelete { .. } => {
                            // Listed right to left; "No" is the default answer.
                            let no = ui.button("No");
                            if ui.button("Yes").clicked() {
                                action = Some(UiEvent::ConfirmDelete);
                            }
                            if no.clicked() {
                                action = Some(UiEvent::CancelDelete);
                            }
                        }
                        _ => {
                            if ui.button("OK").clicked() {
                                action = Some(UiEvent::DismissDialog);
                            }
                        }
                    }
                });
            });

        let (escape, enter) =
            ctx.input(|i| (i.key_pressed(egui::Key::Escape), i.key_pressed(egui::Key::Enter)));
        if action.is_none() {
            action = match dialog {
                Dialog::ConfirmDelete { .. } if escape || enter => Some(UiEvent::CancelDelete),
                Dialog::ConfirmDelete { .. } => None,
                _ if escape || enter => Some(UiEvent::DismissDialog),
                _ => None,
            };
        }
        action
    }
}

impl eframe::App for BookshelfApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_theme_if_needed(ctx);
        self.show_status_bar(ctx);

        let page = self.controller.state().page().clone();
        let modal_open = self.controller.state().dialog().is_some();
        let mut action = None;

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_enabled_ui(!modal_open, |ui| {
                action = match page {
                    Page::Landing => self.show_landing_page(ui),
                    Page::List => self.show_list_page(ui),
                    Page::Add => self.show_form_page(ui, FormMode::Add),
                    Page::Edit { .. } => self.show_form_page(ui, FormMode::Edit),
                };
            });
        });

        if let Some(dialog_action) = self.show_dialog(ctx) {
            action = Some(dialog_action);
        }

        if let Some(event) = action {
            self.controller.dispatch(event);
        }
    }
}
