//! Game rules for tic-tac-toe.
//!
//! Pure functions over a [`Board`](crate::Board). Rules are kept apart from
//! board storage so the game and the invariant checks share one definition
//! of "won" and "full".

pub mod draw;
pub mod win;

pub use draw::{is_draw, is_full};
pub use win::{LINES, check_winner};
