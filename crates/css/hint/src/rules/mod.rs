//! Lint rules. Each rule exposes a `register` entry point that subscribes an
//! observer on an [`EventParser`](crate::EventParser).

pub mod min_font_size;
