//! `miette` integration so taxonomy errors render cleanly at a terminal.

#![cfg(feature = "diagnostic")]

use std::fmt::Display;

use crate::{HubError, Visibility};

impl miette::Diagnostic for HubError {
    fn code<'a>(&'a self) -> Option<Box<dyn Display + 'a>> {
        Some(Box::new(format!("hub::{}", self.name())))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(match self.visibility() {
            Visibility::Reportable => miette::Severity::Error,
            Visibility::Silent => miette::Severity::Warning,
        })
    }

    fn help<'a>(&'a self) -> Option<Box<dyn Display + 'a>> {
        self.help().map(|h| Box::new(h) as Box<dyn Display + 'a>)
    }
}

#[cfg(test)]
mod tests {
    use miette::Diagnostic;

    use crate::HubError;

    #[test]
    fn code_and_help_are_exposed() {
        let err = HubError::legacy_module_not_installed("legacy-v0");
        let code = Diagnostic::code(&err).unwrap().to_string();
        assert_eq!(code, "hub::LegacyModuleNotInstalled");
        assert!(Diagnostic::help(&err).unwrap().to_string().contains("legacy-v0"));
    }
}
