//! Sigletter
//!
//! Vector signature compositing and the client side of a congratulatory
//! letter generator.
//!
//! # Features
//!
//! - **Signature compositor**: freehand strokes captured on a resizable
//!   surface are merged into one cumulative SVG, each batch scaled into the
//!   stored document's coordinate frame
//! - **Letter form**: recipient model, `DD.MM.YYYY` date validation and the
//!   JSON payload expected by the letter server
//! - **Client** (default `client` feature): blocking HTTP client that requests
//!   generation and downloads the PDF; `async` adds a worker-backed async front
//!
//! # Example
//!
//! ```
//! use sigletter::signature::{AuthoringSurface, PenConfig, SignatureState};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut surface = AuthoringSurface::new(300.0, PenConfig::default())?;
//! let mut state = SignatureState::new();
//!
//! surface.pointer_down(10.0, 10.0);
//! surface.pointer_move(40.0, 25.0);
//! if let Some(batch) = surface.pointer_up() {
//!     state = state.apply_stroke(&batch);
//! }
//!
//! surface.resize(150.0)?;
//! surface.pointer_down(5.0, 5.0);
//! surface.pointer_move(20.0, 30.0);
//! if let Some(batch) = surface.pointer_up() {
//!     state = state.apply_stroke(&batch);
//! }
//!
//! let doc = state.document().expect("two strokes merged");
//! assert_eq!(doc.width(), Some("300"));
//! assert_eq!(doc.content().len(), 2);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub use error::{Error, Result};

pub mod letter;
pub mod signature;

// HTTP client for the letter server
#[cfg(feature = "client")]
pub mod client;

// Async-friendly client (worker-thread backed)
#[cfg(feature = "async")]
pub mod async_api;

#[cfg(feature = "client")]
pub use client::{ClientConfig, GeneratedLetter, LetterClient};

#[cfg(feature = "async")]
pub use async_api::AsyncLetterClient;

pub use letter::{EntityType, Gender, LetterForm, LetterRequest, Recipient};
pub use signature::{SignatureDocument, SignatureState, StrokeBatch};
