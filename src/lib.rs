//! Etch is a compile once, render many template engine.
//!
//! Source text containing literal runs and `{{ name }}` tags is
//! compiled into a [`Template`], an immutable sequence of blocks. The
//! `Template` may then be rendered any number of times, against
//! different [`Context`] data and from multiple threads at once, with
//! output written through a growable [`Sink`].
//!
//! ```
//! use etch::{compile, render_to_vec, Store};
//!
//! let template = compile("hello, {{ name }}!").unwrap();
//!
//! let store = Store::new().with_text("name", "taylor");
//! let output = render_to_vec(&template, &store);
//! assert_eq!(output.unwrap(), b"hello, taylor!");
//! ```
//!
//! Tags may carry a format token and a culture token, divided by `:`,
//! which direct how formattable values become text:
//!
//! ```
//! use etch::{compile, render_to_vec, Store};
//!
//! let template = compile("{{ total:F2:de-DE }}").unwrap();
//!
//! let store = Store::new().with_must("total", 1234.5);
//! assert_eq!(render_to_vec(&template, &store).unwrap(), b"1234,50");
//! ```
mod compile;
mod format;
mod log;
mod pipe;
mod region;
mod render;
mod scan;
mod sink;
mod store;

pub use compile::{compile, Block, BlockKind, Parser, Template, BEGIN_TAG, END_TAG};
pub use format::Culture;
pub use log::{Error, ErrorKind, Pointer, Visual};
pub use pipe::Pipe;
pub use region::Region;
pub use render::{render, render_to_vec, Renderer};
pub use sink::{Pool, PooledSink, Sink};
pub use store::{Context, Key, Store, Value};
