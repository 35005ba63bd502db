pub mod actions;
mod app_state;
mod bubble;
mod bubble_list;
mod chat_state;
pub mod events;
mod scroll;

pub use app_state::*;
pub use bubble::*;
pub use bubble_list::*;
pub use chat_state::*;
pub use scroll::*;
