// Session and analysis bookkeeping.
// The store is injected through AppState; nothing here reaches into global state.

pub mod handlers;
pub mod store;
