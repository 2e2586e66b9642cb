pub mod mini_menu;
pub mod prompt;
pub mod text_entry;
