//! Applies parsed statements to a [`Dataset`].

use log::{debug, trace};

use tickmark_core::waveform::{Dataset, SignalValue};

use crate::parser_types::{Cause, Clause, Statement};

/// Accumulates one or more descriptions into a single dataset.
///
/// Every statement is one time step. The step counter carries over between
/// calls to [`Timeline::extend`], so several files can describe one diagram.
/// [`Timeline::finish`] pads every signal to the number of completed steps.
///
/// ```
/// use tickmark_parser::Timeline;
///
/// let mut timeline = Timeline::new();
/// timeline.extend("clk=0, en=1.").unwrap();
/// timeline.extend("clk=1.").unwrap();
/// assert_eq!(timeline.step(), 2);
///
/// let dataset = timeline.finish();
/// assert_eq!(dataset.find("en").unwrap().len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct Timeline {
    dataset: Dataset,
    step: usize,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of completed time steps.
    pub fn step(&self) -> usize {
        self.step
    }

    /// The dataset built so far, before padding.
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Parses `source` and appends its time steps.
    ///
    /// On error nothing from `source` is applied.
    pub fn extend(&mut self, source: &str) -> Result<(), crate::error::ParseError> {
        let tokens = crate::lexer::tokenize(source)?;
        let statements = crate::parser::build_statements(&tokens)?;
        debug!(statements = statements.len(), first_step = self.step; "Applying statements");

        for statement in &statements {
            self.apply(statement);
        }
        Ok(())
    }

    /// Pads all signals to the completed step count and returns the dataset.
    pub fn finish(mut self) -> Dataset {
        self.dataset.pad(self.step);
        self.dataset
    }

    fn apply(&mut self, statement: &Statement<'_>) {
        for clause in &statement.clauses {
            self.apply_clause(clause);
        }
        self.step += 1;
    }

    fn apply_clause(&mut self, clause: &Clause<'_>) {
        for change in &clause.changes {
            let name = *change.signal.inner();
            trace!(signal = name, step = self.step, value = change.value.inner().as_str(); "Setting value");
            self.dataset
                .set_value(name, self.step, SignalValue::new(change.value.inner().as_str()));
        }

        let Some(cause) = &clause.cause else {
            return;
        };
        for change in &clause.changes {
            let effect = *change.signal.inner();
            match cause {
                Cause::Dependency(triggers) => {
                    let triggers: Vec<&str> = triggers.iter().map(|t| *t.inner()).collect();
                    self.dataset.add_dependencies(effect, &triggers);
                }
                Cause::Delay { trigger, label } => {
                    self.dataset.add_delay(effect, trigger.inner(), label.inner());
                }
            }
        }
    }
}
