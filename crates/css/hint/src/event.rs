//! Property events and the listener registry that fires them while walking a
//! stylesheet.

use css_syntax::{Declaration, PropertyValue, parse_stylesheet};
use log::{debug, trace};

/// One declaration as seen by listeners. Borrowed from the parsed stylesheet
/// for the duration of a single dispatch.
#[derive(Clone, Copy, Debug)]
pub struct PropertyEvent<'decl> {
    /// Property name, ASCII-lowercased by the syntax layer. Rules comparing
    /// against a literal such as `font-size` therefore also match `FONT-SIZE`,
    /// which a comparison against the name as written would ignore.
    pub property: &'decl str,
    pub value: &'decl PropertyValue,
    pub important: bool,
    /// 1-based position of the property name.
    pub line: u32,
    pub col: u32,
}

impl<'decl> From<&'decl Declaration> for PropertyEvent<'decl> {
    fn from(decl: &'decl Declaration) -> Self {
        Self {
            property: &decl.name,
            value: &decl.value,
            important: decl.important,
            line: decl.line,
            col: decl.col,
        }
    }
}

/// Reaction to property declarations.
pub trait PropertyObserver {
    fn on_property(&mut self, event: &PropertyEvent<'_>);
}

impl<F> PropertyObserver for F
where
    F: FnMut(&PropertyEvent<'_>),
{
    fn on_property(&mut self, event: &PropertyEvent<'_>) {
        self(event);
    }
}

/// Walks stylesheets and fires a property event per declaration to every
/// registered listener, in registration order.
#[derive(Default)]
pub struct EventParser {
    listeners: Vec<Box<dyn PropertyObserver>>,
}

impl EventParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `observer` for the lifetime of the parser.
    pub fn add_listener<O>(&mut self, observer: O)
    where
        O: PropertyObserver + 'static,
    {
        self.listeners.push(Box::new(observer));
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Deliver one event to every listener.
    pub fn fire(&mut self, event: &PropertyEvent<'_>) {
        for listener in &mut self.listeners {
            listener.on_property(event);
        }
    }

    /// Parse `css` and fire an event for each declaration in source order.
    /// Returns the number of declarations walked.
    pub fn parse(&mut self, css: &str) -> usize {
        let sheet = parse_stylesheet(css);
        let mut walked: usize = 0;
        for decl in sheet.declarations() {
            trace!("property `{}` at {}:{}", decl.name, decl.line, decl.col);
            self.fire(&PropertyEvent::from(decl));
            walked += 1;
        }
        debug!(
            "walked {walked} declarations across {} rules for {} listeners",
            sheet.rules.len(),
            self.listeners.len()
        );
        walked
    }
}
