//! Unit tests for raggraph-cli, organized by module.
//!
//! Each submodule documents the behaviour under test.
