//! Fluent construction of a [`super::Diagnostic`].

use super::{Diagnostic, Handler};
use crate::SourceLoc;

pub struct DiagnosticBuilder {
    message: String,
    loc: SourceLoc,
}

impl DiagnosticBuilder {
    pub fn error(message: impl Into<String>) -> Self {
        Self { message: message.into(), loc: SourceLoc::START }
    }

    pub fn loc(mut self, loc: SourceLoc) -> Self {
        self.loc = loc;
        self
    }

    pub fn emit(self, handler: &mut Handler) {
        handler.push(Diagnostic { message: self.message, loc: self.loc });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_emits_with_given_location() {
        let mut handler = Handler::new();
        DiagnosticBuilder::error("bad").loc(SourceLoc::new(4, 2)).emit(&mut handler);
        assert_eq!(handler.diagnostics()[0].loc, SourceLoc::new(4, 2));
    }
}
