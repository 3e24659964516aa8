// handlers/protected/mod.rs - Protected handlers (session required)
//
// Mounted behind ResolveSession + RequireUser, so every handler here can
// take `CurrentUser` and act only on that user's data.
pub mod items;
