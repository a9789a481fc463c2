pub mod dashboard;
pub mod definition_panel;
pub mod menu;
pub mod progress_bar;
pub mod word_card;
