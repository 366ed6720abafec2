//! Pointer gestures over the board: click vs. drag, edge resize, and the
//! drop intents they produce.

pub mod dnd;
pub mod gesture;
pub mod resize;
#[cfg(test)]
mod tests;
