//! Waveform data model.
//!
//! A [`Dataset`] owns every [`Signal`] of a diagram together with the
//! dependency and delay edges declared between them. Signals are created on
//! first reference and keep their insertion order, which is also the order
//! of the rows in the rendered diagram.
//!
//! Step indices are zero-based. An edge captures the *last already recorded*
//! step of each signal at the moment it is declared, so a description that
//! sets a value and then declares its cause points the edge at that new
//! transition.

use std::fmt;

use indexmap::IndexMap;
use log::trace;
use thiserror::Error;

/// Classification of a waveform value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// No value. Used as the predecessor of the first step.
    Undefined,
    Zero,
    One,
    /// Unknown level, drawn as a crossed band.
    Unknown,
    /// High impedance, drawn at mid level.
    Tristate,
    Pulse,
    Tick,
    /// A bus or state value carrying its own label text.
    State,
}

impl ValueKind {
    /// Classifies raw description text.
    ///
    /// ```
    /// # use tickmark_core::waveform::ValueKind;
    /// assert_eq!(ValueKind::classify("true"), ValueKind::One);
    /// assert_eq!(ValueKind::classify("Z"), ValueKind::Tristate);
    /// assert_eq!(ValueKind::classify("IDLE"), ValueKind::State);
    /// ```
    pub fn classify(text: &str) -> Self {
        match text {
            "0" | "false" => Self::Zero,
            "1" | "true" => Self::One,
            "pulse" => Self::Pulse,
            "tick" => Self::Tick,
            "X" => Self::Unknown,
            "Z" => Self::Tristate,
            _ => Self::State,
        }
    }
}

/// One value of a signal at one time step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalValue {
    kind: ValueKind,
    text: String,
}

impl SignalValue {
    /// Creates a value from description text, classifying it.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let kind = ValueKind::classify(&text);
        Self { kind, text }
    }

    /// Creates a value with an explicit kind, bypassing classification.
    pub fn with_kind(text: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    /// The implicit predecessor of the first step of every signal.
    pub fn undefined() -> Self {
        Self::with_kind("", ValueKind::Undefined)
    }

    /// The value used to fill a signal that has no recorded steps.
    pub fn unknown() -> Self {
        Self::with_kind("X", ValueKind::Unknown)
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// The value repeated when a gap after `self` is filled.
    ///
    /// A pulse is a single-step event, so it repeats as logic zero.
    fn fill_value(&self) -> Self {
        match self.kind {
            ValueKind::Pulse => Self::with_kind("0", ValueKind::Zero),
            _ => self.clone(),
        }
    }
}

impl fmt::Display for SignalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// A named signal and its values over time.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    name: String,
    values: Vec<SignalValue>,
    active_delay_slots: u32,
    max_delay_slots: u32,
}

impl Signal {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: Vec::new(),
            active_delay_slots: 0,
            max_delay_slots: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Values in step order.
    pub fn values(&self) -> &[SignalValue] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Delay slots opened below this signal since its last value change.
    pub fn active_delay_slots(&self) -> u32 {
        self.active_delay_slots
    }

    /// High-water mark of [`Signal::active_delay_slots`]; each slot adds a
    /// delay annotation row below the signal.
    pub fn max_delay_slots(&self) -> u32 {
        self.max_delay_slots
    }

    /// Index of the last recorded step, or 0 for an empty signal.
    fn last_step(&self) -> usize {
        self.values.len().saturating_sub(1)
    }

    fn fill_to(&mut self, len: usize) {
        let fill = self
            .values
            .last()
            .map_or_else(SignalValue::unknown, SignalValue::fill_value);
        while self.values.len() < len {
            self.values.push(fill.clone());
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{value}")?;
        }
        Ok(())
    }
}

/// A causal arrow from one signal transition to another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyEdge {
    trigger: String,
    trigger_step: usize,
    effect: String,
    effect_step: usize,
}

impl DependencyEdge {
    pub fn trigger(&self) -> &str {
        &self.trigger
    }

    pub fn trigger_step(&self) -> usize {
        self.trigger_step
    }

    pub fn effect(&self) -> &str {
        &self.effect
    }

    pub fn effect_step(&self) -> usize {
        self.effect_step
    }
}

impl fmt::Display for DependencyEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({}) => {}({})",
            self.trigger, self.trigger_step, self.effect, self.effect_step
        )
    }
}

/// A dependency annotated with a delay label, drawn as a bracket in one of the
/// trigger's delay slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelayEdge {
    edge: DependencyEdge,
    text: String,
    offset: u32,
}

impl DelayEdge {
    pub fn edge(&self) -> &DependencyEdge {
        &self.edge
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// The delay slot below the trigger row this annotation occupies.
    pub fn offset(&self) -> u32 {
        self.offset
    }
}

impl fmt::Display for DelayEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({}) -{}-> {}({}) [slot {}]",
            self.edge.trigger,
            self.edge.trigger_step,
            self.text,
            self.edge.effect,
            self.edge.effect_step,
            self.offset
        )
    }
}

/// Returned by [`Dataset::find`] for a name that was never referenced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("signal \"{name}\" not found")]
pub struct SignalNotFound {
    name: String,
}

impl SignalNotFound {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// All signals and edges of one timing diagram.
///
/// # Examples
///
/// ```
/// use tickmark_core::waveform::{Dataset, SignalValue, ValueKind};
///
/// let mut data = Dataset::new();
/// data.set_value("clk", 0, SignalValue::new("0"));
/// data.set_value("clk", 1, SignalValue::new("1"));
/// data.set_value("data", 1, SignalValue::new("READ"));
/// data.add_dependency("data", "clk");
/// data.pad(3);
///
/// let signal = data.find("data").unwrap();
/// assert_eq!(signal.values()[0].kind(), ValueKind::Unknown);
/// assert_eq!(signal.len(), 3);
/// assert_eq!(data.dependencies()[0].trigger_step(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    signals: IndexMap<String, Signal>,
    dependencies: Vec<DependencyEdge>,
    delays: Vec<DelayEdge>,
    max_length: usize,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Signals in row order.
    pub fn signals(&self) -> impl ExactSizeIterator<Item = &Signal> {
        self.signals.values()
    }

    pub fn signal_count(&self) -> usize {
        self.signals.len()
    }

    pub fn dependencies(&self) -> &[DependencyEdge] {
        &self.dependencies
    }

    pub fn delays(&self) -> &[DelayEdge] {
        &self.delays
    }

    /// Length of the longest signal, or the largest padding target if larger.
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Row index of a signal in rendering order.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.signals.get_index_of(name)
    }

    /// Looks a signal up, creating an empty one at the end of the row order
    /// if it does not exist yet.
    pub fn find_or_create(&mut self, name: &str) -> &mut Signal {
        if !self.signals.contains_key(name) {
            trace!(name; "Creating signal");
        }
        self.signals
            .entry(name.to_string())
            .or_insert_with(|| Signal::new(name))
    }

    /// Looks a signal up without creating it.
    pub fn find(&self, name: &str) -> Result<&Signal, SignalNotFound> {
        self.signals
            .get(name)
            .ok_or_else(|| SignalNotFound::new(name))
    }

    /// Records that the current transition of `effect` is caused by the
    /// current transition of `trigger`.
    pub fn add_dependency(&mut self, effect: &str, trigger: &str) {
        let effect_step = self.find_or_create(effect).last_step();
        let trigger_step = self.find_or_create(trigger).last_step();
        let edge = DependencyEdge {
            trigger: trigger.to_string(),
            trigger_step,
            effect: effect.to_string(),
            effect_step,
        };
        trace!(edge:%; "Adding dependency");
        self.dependencies.push(edge);
    }

    /// Adds one dependency of `effect` on each trigger, in order.
    pub fn add_dependencies<S: AsRef<str>>(&mut self, effect: &str, triggers: &[S]) {
        for trigger in triggers {
            self.add_dependency(effect, trigger.as_ref());
        }
    }

    /// Records a delay annotation between the current transitions of
    /// `trigger` and `effect`.
    ///
    /// A signal may delay itself: the trigger then refers to the step before
    /// the effect. The trigger only opens a new delay slot when the two
    /// endpoints are in different columns.
    pub fn add_delay(&mut self, effect: &str, trigger: &str, text: &str) {
        let effect_step = self.find_or_create(effect).last_step();
        let trigger_signal = self.find_or_create(trigger);
        let offset = trigger_signal.active_delay_slots;
        let mut trigger_step = trigger_signal.last_step();

        if effect == trigger && trigger_step > 0 {
            trigger_step -= 1;
        }

        if trigger_step != effect_step {
            trigger_signal.active_delay_slots += 1;
            trigger_signal.max_delay_slots = trigger_signal
                .max_delay_slots
                .max(trigger_signal.active_delay_slots);
        }

        let delay = DelayEdge {
            edge: DependencyEdge {
                trigger: trigger.to_string(),
                trigger_step,
                effect: effect.to_string(),
                effect_step,
            },
            text: text.to_string(),
            offset,
        };
        trace!(delay:%; "Adding delay");
        self.delays.push(delay);
    }

    /// Sets the value of `name` at `step`.
    ///
    /// Steps skipped since the last recorded value repeat that value (a
    /// pulse repeats as logic zero, an empty signal fills with `X`). The
    /// value is appended after the filled gap, so a `step` lower than the
    /// signal's length simply appends.
    pub fn set_value(&mut self, name: &str, step: usize, value: SignalValue) {
        let signal = self.find_or_create(name);
        signal.fill_to(step);
        signal.values.push(value);
        signal.active_delay_slots = 0;

        let len = signal.len();
        self.max_length = self.max_length.max(len);
    }

    /// Extends every signal to at least `len` steps using the fill rule of
    /// [`Dataset::set_value`].
    pub fn pad(&mut self, len: usize) {
        self.max_length = self.max_length.max(len);
        let target = self.max_length;
        for signal in self.signals.values_mut() {
            signal.fill_to(target);
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "signals:")?;
        for signal in self.signals.values() {
            writeln!(f, "  {}: {}", signal.name, signal)?;
        }

        writeln!(f)?;
        writeln!(f, "dependencies:")?;
        for dependency in &self.dependencies {
            writeln!(f, "  {dependency}")?;
        }

        if !self.delays.is_empty() {
            writeln!(f)?;
            writeln!(f, "delays:")?;
            for delay in &self.delays {
                writeln!(f, "  {delay}")?;
            }
        }
        Ok(())
    }
}
