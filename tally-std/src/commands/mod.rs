//! Built-in commands

mod arithmetic;
mod history;
mod menu;

pub use arithmetic::{Arithmetic, add, subtract, multiply, divide};
pub use history::{SaveHistory, LoadHistory, ClearHistory, DeleteHistory, PrintHistory, save, load, clear, delete, print};
pub use menu::{Menu, MENU_NAME, menu};
