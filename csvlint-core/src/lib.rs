//! # csvlint-core - CSV validation engine
//!
//! The engine behind the `csvlint` command-line tool. It loads schema
//! descriptors (JSON Table Schema or CSVW table groups), reads CSV data from
//! local files or URLs, and reports problems as typed findings.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use csvlint_core::prelude::*;
//! use csvlint_core::validator::CsvValidator;
//!
//! # async fn example() -> Result<()> {
//! let schema = Schema::load_from_uri("schema.json").await?;
//! let input = InputHandle::open("data.csv")?;
//!
//! let outcome = CsvValidator::new().validate(input, Some(&schema), None).await?;
//! for error in &outcome.errors {
//!     println!("{} at row {:?}", error.kind, error.row);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - **`core`**: inputs, findings and outcomes
//! - **`schema`**: schema descriptors and their loader
//! - **`validator`**: the `Validator` trait and the built-in `CsvValidator`
//! - **`fetch`**: reading local files and downloading URLs

pub mod core;
pub mod error;
pub mod fetch;
pub mod prelude;
pub mod schema;
pub mod validator;
