// handlers/mod.rs - Two-tier handler layout
//
// Public (no session) -> Protected (session resolved and required by the
// pipeline in front of every route). Handlers only carry the business
// flow; rendering goes through the router's Presentation.
pub mod protected; // GET/POST /items, GET /items/new
pub mod public;    // GET/POST /signin
