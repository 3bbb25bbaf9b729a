//! Tests for the Grid HTTP server

mod support;
