/// Middleware modules for the API server
///
/// Bearer authentication lives in `app` as a `from_fn_with_state` layer;
/// this module holds the tower layers.

pub mod security;
