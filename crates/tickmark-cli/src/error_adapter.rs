//! Error adapter for converting TickmarkError to miette diagnostics.
//!
//! Each parser diagnostic (E001 to E004 from the lexer, E100 and E101 from
//! the parser) becomes its own report with a labelled source snippet. All
//! other errors are reported as a single message with a `tickmark::*` code.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use tickmark::TickmarkError;
use tickmark_parser::error::Diagnostic;

/// A parser diagnostic together with the source it points into.
#[derive(Debug)]
struct ParseReport<'a> {
    diag: &'a Diagnostic,
    src: &'a str,
}

impl fmt::Display for ParseReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.diag.message())
    }
}

impl std::error::Error for ParseReport<'_> {}

impl MietteDiagnostic for ParseReport<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .code()
            .map(|c| Box::new(c) as Box<dyn fmt::Display>)
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .help()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        Some(Box::new(self.diag.labels().iter().map(|label| {
            let span = SourceSpan::new(label.span().start().into(), label.span().len());
            LabeledSpan::new_primary_with_span(Some(label.message().to_string()), span)
        })))
    }
}

/// Any other [`TickmarkError`], reported without a snippet.
#[derive(Debug)]
struct ErrorReport<'a>(&'a TickmarkError);

impl fmt::Display for ErrorReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.0, f)
    }
}

impl std::error::Error for ErrorReport<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorReport<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match self.0 {
            TickmarkError::Io(_) => "tickmark::io",
            TickmarkError::Parse { .. } => return None,
            TickmarkError::NotFound(_) => "tickmark::signal",
            TickmarkError::Backend(_) => "tickmark::backend",
            TickmarkError::Configuration(_) => "tickmark::config",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self.0 {
            TickmarkError::Configuration(_) => Some(Box::new(
                "check the command-line flags and the [render] and [style] tables",
            )),
            _ => None,
        }
    }
}

/// Convert a [`TickmarkError`] into the reports miette renders.
///
/// [`TickmarkError::Parse`] yields one report per diagnostic; every other
/// variant yields exactly one.
pub fn to_reportables(err: &TickmarkError) -> Vec<Box<dyn MietteDiagnostic + '_>> {
    match err {
        TickmarkError::Parse { err: parse_err, src } => parse_err
            .diagnostics()
            .iter()
            .map(|diag| Box::new(ParseReport { diag, src }) as Box<dyn MietteDiagnostic + '_>)
            .collect(),
        _ => vec![Box::new(ErrorReport(err))],
    }
}

#[cfg(test)]
mod tests {
    use tickmark::{TimingBuilder, draw::BackendError};

    use super::*;

    #[test]
    fn test_every_diagnostic_is_reported() {
        let src = "a=1 $.\nb=\"open\n";
        let err = TimingBuilder::default().parse(src).unwrap_err();

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 2);

        let codes: Vec<_> = reportables
            .iter()
            .map(|r| r.code().unwrap().to_string())
            .collect();
        assert_eq!(codes, ["E002", "E001"]);
        assert!(reportables[1].help().is_some());
    }

    #[test]
    fn test_labels_keep_spans() {
        let err = TimingBuilder::default().parse("clk=1 $.").unwrap_err();
        let reportables = to_reportables(&err);

        let labels: Vec<_> = reportables[0].labels().unwrap().collect();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].offset(), 6);
        assert_eq!(labels[0].len(), 1);
        assert!(labels[0].primary());
        assert!(reportables[0].source_code().is_some());
    }

    #[test]
    fn test_backend_error_code() {
        let err = TickmarkError::Backend(BackendError::UnknownColor("mauvish".to_string()));

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 1);
        assert_eq!(
            reportables[0].code().unwrap().to_string(),
            "tickmark::backend"
        );
        assert!(reportables[0].source_code().is_none());
    }

    #[test]
    fn test_configuration_error_has_help() {
        let err = TickmarkError::Configuration("scale must be positive".to_string());

        let reportables = to_reportables(&err);
        assert_eq!(
            reportables[0].code().unwrap().to_string(),
            "tickmark::config"
        );
        assert!(reportables[0].help().is_some());
    }
}
