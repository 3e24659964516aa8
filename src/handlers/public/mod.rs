// handlers/public/mod.rs - Public handlers (no session required)
//
// Sign-in is the only way to obtain a session token. Unknown emails and
// wrong passwords are reported identically.
pub mod signin;
