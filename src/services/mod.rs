// Bookmark board services
// Services hold the board engine: normalization, rendering, drag and change reconciliation, edits, settings.

pub mod board_renderer;
pub mod board_service;
pub mod change_reconciler;
pub mod column_editor;
pub mod drag_reconciler;
pub mod render_gate;
pub mod settings_engine;
pub mod tree_adapter;
