//! Entry handler tests
