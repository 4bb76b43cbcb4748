//! Integration tests for the path index

mod cli_contracts;
mod properties;
mod scenarios;
mod support;
